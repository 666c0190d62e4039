//! Byte accumulator for incoming compressed audio.
//!
//! Chunks from the transport layer carry no duration metadata, so the
//! hand-off policy is purely byte-count based: accumulate until the
//! configured threshold, then snapshot everything as one atomic unit.

use crate::defaults;

/// One atomic batch of buffered bytes, consumed by exactly one
/// transcription attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionUnit {
    bytes: Vec<u8>,
}

impl RecognitionUnit {
    /// The buffered compressed-audio bytes, in arrival order.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes in the unit.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the unit, yielding the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Append-only byte accumulator with a hand-off threshold.
#[derive(Debug)]
pub struct StreamingBuffer {
    data: Vec<u8>,
    threshold: usize,
}

impl StreamingBuffer {
    /// Creates a buffer with the default threshold.
    pub fn new() -> Self {
        Self::with_threshold(defaults::MIN_CHUNK_BYTES)
    }

    /// Creates a buffer with a custom threshold in bytes.
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            data: Vec::new(),
            threshold,
        }
    }

    /// Appends a chunk; returns a unit when the threshold is crossed.
    ///
    /// Below the threshold, returns `None`. At or above it, the entire
    /// accumulated content is snapshotted as one `RecognitionUnit` and
    /// the accumulator is cleared. An empty chunk is a no-op.
    pub fn append(&mut self, chunk: &[u8]) -> Option<RecognitionUnit> {
        if chunk.is_empty() {
            return None;
        }

        self.data.extend_from_slice(chunk);
        if self.data.len() < self.threshold {
            return None;
        }

        Some(RecognitionUnit {
            bytes: std::mem::take(&mut self.data),
        })
    }

    /// Bytes currently accumulated and not yet handed off.
    pub fn pending_len(&self) -> usize {
        self.data.len()
    }

    /// The configured hand-off threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for StreamingBuffer {
    fn default() -> Self {
        Self::new()
    }
}
