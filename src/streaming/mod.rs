//! Streaming ingestion core.
//!
//! ```text
//! ┌──────────┐  append   ┌─────────────────┐  unit ready  ┌───────────────┐
//! │  client  │──────────▶│ StreamingBuffer │─────────────▶│Transcription  │
//! │  chunks  │           │ (byte threshold)│              │Gate (try/drop)│
//! └──────────┘           └─────────────────┘              └──────┬────────┘
//!                                                                │ entered
//!                                                                ▼
//!                                              spawn_blocking: temp files →
//!                                              ffmpeg transcode → recognize
//! ```
//!
//! Ingestion never blocks on a transcription in flight; units that
//! become ready while the gate is held are dropped, not queued.

pub mod buffer;
pub mod gate;
pub mod recognizer;

pub use buffer::{RecognitionUnit, StreamingBuffer};
pub use gate::{GateGuard, TranscriptionGate};
pub use recognizer::StreamingRecognizer;
