//! Streaming recognizer facade.
//!
//! Composes the buffer, the gate and the external collaborators into a
//! single operation: accept a chunk of compressed audio, possibly
//! produce text. The blocking transcode+inference work runs on
//! tokio's blocking thread pool so ingestion of further chunks is
//! never delayed by a pass in progress.

use crate::config::Config;
use crate::defaults;
use crate::error::Result;
use crate::stt::engine::{RecognitionEngine, RecognitionParams};
use crate::streaming::buffer::{RecognitionUnit, StreamingBuffer};
use crate::streaming::gate::TranscriptionGate;
use crate::transcode::AudioTranscoder;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Facade over the streaming transcription pipeline.
///
/// One instance per connection, or shared per process behind an `Arc`;
/// all internal state is synchronized. Availability of the external
/// collaborators is probed once at construction and never changes.
pub struct StreamingRecognizer<T: AudioTranscoder, R: RecognitionEngine> {
    transcoder: Arc<T>,
    engine: Arc<R>,
    params: RecognitionParams,
    buffer: Mutex<StreamingBuffer>,
    gate: TranscriptionGate,
    available: bool,
    notified: AtomicBool,
}

impl<T, R> StreamingRecognizer<T, R>
where
    T: AudioTranscoder + 'static,
    R: RecognitionEngine + 'static,
{
    /// Creates a recognizer with default buffering and parameters.
    pub fn new(transcoder: T, engine: R) -> Self {
        let available = transcoder.is_available() && engine.is_ready();
        Self {
            transcoder: Arc::new(transcoder),
            engine: Arc::new(engine),
            params: RecognitionParams::default(),
            buffer: Mutex::new(StreamingBuffer::new()),
            gate: TranscriptionGate::new(),
            available,
            notified: AtomicBool::new(false),
        }
    }

    /// Creates a recognizer taking threshold and language from config.
    pub fn with_config(transcoder: T, engine: R, config: &Config) -> Self {
        let mut recognizer = Self::new(transcoder, engine);
        recognizer.buffer = Mutex::new(StreamingBuffer::with_threshold(
            config.buffering.min_chunk_bytes,
        ));
        recognizer.params.language = config
            .recognition
            .language_override()
            .map(|lang| lang.to_string());
        recognizer
    }

    /// Override the recognition parameters.
    pub fn with_params(mut self, params: RecognitionParams) -> Self {
        self.params = params;
        self
    }

    /// Whether transcoder and engine were both functional at construction.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Whether a transcription pass is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Accept one chunk of compressed audio, possibly producing text.
    ///
    /// Never fails. Returns the transcript strings produced by this
    /// chunk: usually empty, one joined transcript when a buffered unit
    /// completed a pass, or the one-time not-ready placeholder.
    ///
    /// Units that become ready while a pass is in flight are discarded
    /// entirely; deliberate load shedding, see module docs.
    pub async fn accept_audio(&self, chunk: &[u8]) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }

        if !self.available {
            if !self.notified.swap(true, Ordering::SeqCst) {
                return vec![defaults::NOT_READY_PLACEHOLDER.to_string()];
            }
            return Vec::new();
        }

        // Single mutual-exclusion point for the buffer-and-gate check.
        let (unit, guard) = {
            // A poisoned buffer is still structurally valid; keep going.
            let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
            let Some(unit) = buffer.append(chunk) else {
                return Vec::new();
            };
            match self.gate.try_enter() {
                Some(guard) => (unit, guard),
                None => {
                    debug!(
                        dropped_bytes = unit.len(),
                        "transcription in flight, dropping ready unit"
                    );
                    return Vec::new();
                }
            }
        };

        let transcoder = self.transcoder.clone();
        let engine = self.engine.clone();
        let params = self.params.clone();

        let text = tokio::task::spawn_blocking(move || {
            // Guard travels into the worker so the gate stays held for
            // the whole blocking pass and releases on every exit path.
            let _gate = guard;
            transcribe_unit(&*transcoder, &*engine, &params, unit)
        })
        .await
        .unwrap_or_else(|e| {
            warn!("transcription task panicked: {}", e);
            String::new()
        });

        if text.is_empty() {
            Vec::new()
        } else {
            vec![text]
        }
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pending_len()
    }
}

/// Run one blocking transcription pass, recovering every failure into
/// an empty result. Nothing from here reaches the ingestion caller.
fn transcribe_unit(
    transcoder: &dyn AudioTranscoder,
    engine: &dyn RecognitionEngine,
    params: &RecognitionParams,
    unit: RecognitionUnit,
) -> String {
    match run_pipeline(transcoder, engine, params, unit) {
        Ok(text) => text,
        Err(e) => {
            warn!("transcription pass failed: {}", e);
            String::new()
        }
    }
}

/// Write the unit to a temp container file, transcode to a temp WAV,
/// recognize, join. Both temp files are removed on drop regardless of
/// outcome.
fn run_pipeline(
    transcoder: &dyn AudioTranscoder,
    engine: &dyn RecognitionEngine,
    params: &RecognitionParams,
    unit: RecognitionUnit,
) -> Result<String> {
    let mut src = tempfile::Builder::new()
        .prefix("streamscribe-src-")
        .suffix(".webm")
        .tempfile()?;
    src.write_all(unit.bytes())?;
    src.flush()?;

    let decoded = tempfile::Builder::new()
        .prefix("streamscribe-dec-")
        .suffix(".wav")
        .tempfile()?
        .into_temp_path();

    transcoder.transcode(src.path(), &decoded)?;
    let segments = engine.recognize(&decoded, params)?;

    Ok(join_segments(&segments))
}

/// Trim segments, drop empty ones, join the remainder with single
/// spaces in original order.
fn join_segments(segments: &[String]) -> String {
    segments
        .iter()
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
