//! Default configuration constants for streamscribe.
//!
//! Shared across the config types and the recognition backends so the
//! fixed invocation parameters live in exactly one place.

/// Sample rate of decoded audio handed to the recognition engine, in Hz.
///
/// 16kHz mono is the standard input format for Whisper-family models;
/// the transcoder downmixes and resamples everything to this.
pub const SAMPLE_RATE: u32 = 16_000;

/// Minimum number of buffered compressed-audio bytes before a
/// transcription pass is attempted.
///
/// Bounds latency while still giving the engine enough audio for a
/// meaningful pass. Browser-side MediaRecorder chunks are typically a
/// few KB each, so this is on the order of a couple seconds of speech.
pub const MIN_CHUNK_BYTES: usize = 20_000;

/// Beam width for decoding.
pub const BEAM_SIZE: usize = 3;

/// Sampling temperature for decoding.
pub const TEMPERATURE: f32 = 0.2;

/// Minimum silence gap for voice-activity filtering, in milliseconds.
pub const VAD_MIN_SILENCE_MS: u32 = 500;

/// Default Whisper model size/variant.
pub const DEFAULT_MODEL: &str = "small";

/// Default device selector.
pub const DEFAULT_DEVICE: &str = "auto";

/// Language value that triggers automatic language detection.
pub const AUTO_LANGUAGE: &str = "auto";

/// Default speaker label attached to outgoing transcript events.
pub const DEFAULT_SPEAKER: &str = "protagonist";

/// Minimum RMS energy for decoded audio to be worth recognizing.
///
/// Units below this across every VAD window are silence/ambient noise;
/// skip inference entirely rather than let the model hallucinate.
pub const MIN_ENERGY_FOR_RECOGNITION: f32 = 0.001;

/// Placeholder emitted once per session when the recognition backend
/// is not operational.
pub const NOT_READY_PLACEHOLDER: &str = "recognition not ready — check external dependencies";

/// Report the GPU backend compiled into this build.
///
/// Returns a human-readable name based on the compile-time feature flags.
/// Only one GPU backend can be active at a time; if none is enabled, returns "CPU".
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") {
        "CUDA"
    } else if cfg!(feature = "vulkan") {
        "Vulkan"
    } else if cfg!(feature = "hipblas") {
        "HipBLAS (AMD)"
    } else if cfg!(feature = "openblas") {
        "OpenBLAS"
    } else {
        "CPU"
    }
}
