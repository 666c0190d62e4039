//! At-most-one in-flight transcription enforcement.
//!
//! The gate is a non-blocking try-acquire primitive: callers either
//! enter immediately or decide to drop their work. Release is tied to
//! guard drop so every exit path (success, empty result, failure,
//! panic in the worker) releases exactly once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Non-blocking gate around the recognition engine.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionGate {
    busy: Arc<AtomicBool>,
}

impl TranscriptionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to enter the gate without blocking.
    ///
    /// Returns a guard on success; `None` means a transcription is
    /// already in flight and the caller should drop its unit.
    pub fn try_enter(&self) -> Option<GateGuard> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(GateGuard {
                busy: self.busy.clone(),
            })
        } else {
            None
        }
    }

    /// Returns true if a transcription is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Guard representing a successful gate entry.
///
/// The gate is released when the guard is dropped. Owns an `Arc` so it
/// can move into a blocking worker task.
#[derive(Debug)]
pub struct GateGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
