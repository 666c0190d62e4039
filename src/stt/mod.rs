//! Speech-to-text backends.
//!
//! `RecognitionEngine` is the seam between the streaming pipeline and
//! the actual model; `WhisperEngine` implements it with whisper-rs when
//! the `whisper` feature is enabled.

pub mod engine;
pub mod whisper;

pub use engine::{MockRecognitionEngine, RecognitionEngine, RecognitionParams};
pub use whisper::{WhisperEngine, WhisperEngineConfig};
