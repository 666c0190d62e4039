//! streamscribe - streaming speech-to-text buffering pipeline
//!
//! Accepts small, frequent chunks of compressed audio, buffers them to
//! a byte threshold, transcodes via ffmpeg and recognizes via a
//! Whisper-style engine, emitting text incrementally. Ingestion never
//! blocks on a pass in progress; work that becomes ready while the
//! engine is busy is dropped, not queued.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod session;
pub mod stt;
pub mod streaming;
pub mod transcode;

// Core traits (transcode → recognize seams)
pub use stt::engine::{MockRecognitionEngine, RecognitionEngine, RecognitionParams};
pub use transcode::{
    AudioTranscoder, CommandExecutor, FfmpegTranscoder, MockTranscoder, SystemCommandExecutor,
};

// Streaming core
pub use streaming::buffer::{RecognitionUnit, StreamingBuffer};
pub use streaming::gate::{GateGuard, TranscriptionGate};
pub use streaming::recognizer::StreamingRecognizer;

// Session boundary
pub use session::{TranscriptEvent, TranscriptSession};

// Whisper backend (stub without the `whisper` feature)
pub use stt::whisper::{WhisperEngine, WhisperEngineConfig};

// Error handling
pub use error::{Result, StreamscribeError};

// Config
pub use config::Config;
