//! Transcript event boundary for the transport layer.
//!
//! The transport (WebSocket, usually) is out of scope; it consumes
//! this narrow surface: push raw chunk bytes in, get zero or more
//! `{text, speaker}` events back to send as JSON messages.

use crate::stt::engine::RecognitionEngine;
use crate::streaming::recognizer::StreamingRecognizer;
use crate::transcode::AudioTranscoder;
use serde::{Deserialize, Serialize};

/// One outgoing transcript message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEvent {
    pub text: String,
    pub speaker: String,
}

impl TranscriptEvent {
    /// Serialize the event to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize an event from a JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Binds a recognizer to a speaker label for one connection.
pub struct TranscriptSession<T: AudioTranscoder, R: RecognitionEngine> {
    recognizer: StreamingRecognizer<T, R>,
    speaker: String,
}

impl<T, R> TranscriptSession<T, R>
where
    T: AudioTranscoder + 'static,
    R: RecognitionEngine + 'static,
{
    /// Creates a session emitting events under the given speaker label.
    pub fn new(recognizer: StreamingRecognizer<T, R>, speaker: impl Into<String>) -> Self {
        Self {
            recognizer,
            speaker: speaker.into(),
        }
    }

    /// The speaker label attached to every event.
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Access the underlying recognizer.
    pub fn recognizer(&self) -> &StreamingRecognizer<T, R> {
        &self.recognizer
    }

    /// Push one chunk of compressed audio; returns the events it produced.
    pub async fn push_audio(&self, chunk: &[u8]) -> Vec<TranscriptEvent> {
        self.recognizer
            .accept_audio(chunk)
            .await
            .into_iter()
            .map(|text| TranscriptEvent {
                text,
                speaker: self.speaker.clone(),
            })
            .collect()
    }
}
