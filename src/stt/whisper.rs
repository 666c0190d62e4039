//! Whisper-based recognition engine.
//!
//! Implements `RecognitionEngine` over whisper-rs, reading the decoded
//! 16kHz mono WAV produced by the transcoder.
//!
//! # Feature Gate
//!
//! This module requires the `whisper` feature to be enabled and cmake to be installed.
//! To build with Whisper support:
//!
//! ```bash
//! cargo build --features whisper
//! ```

use crate::defaults;
use crate::error::{Result, StreamscribeError};
use crate::stt::engine::{RecognitionEngine, RecognitionParams};
use std::path::{Path, PathBuf};

#[cfg(feature = "whisper")]
use std::sync::{Mutex, Once};
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the Whisper engine.
#[derive(Debug, Clone)]
pub struct WhisperEngineConfig {
    /// Path to the ggml model file
    pub model_path: PathBuf,
    /// Default language when a pass does not override it ("auto" to detect)
    pub language: String,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
}

impl Default for WhisperEngineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(format!("models/ggml-{}.bin", defaults::DEFAULT_MODEL)),
            language: defaults::AUTO_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

/// Whisper-based recognition engine.
///
/// The WhisperContext is wrapped in a Mutex; the streaming gate already
/// prevents overlapping passes, the mutex covers direct callers.
///
/// # Feature Gate
///
/// This type is only available when the `whisper` feature is enabled.
#[cfg(feature = "whisper")]
pub struct WhisperEngine {
    context: Mutex<WhisperContext>,
    config: WhisperEngineConfig,
    model_name: String,
}

#[cfg(feature = "whisper")]
impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("config", &self.config)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

/// Whisper engine placeholder (without whisper feature).
///
/// Reports not-ready and errors on use, driving the pipeline's
/// degraded placeholder path. Enable the `whisper` feature for real
/// recognition.
#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperEngine {
    config: WhisperEngineConfig,
    model_name: String,
}

fn model_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(feature = "whisper")]
impl WhisperEngine {
    /// Create a new Whisper engine.
    ///
    /// # Errors
    /// Returns `RecognitionModelNotFound` if the model file doesn't exist,
    /// `RecognitionFailed` if model loading fails.
    pub fn new(config: WhisperEngineConfig) -> Result<Self> {
        // Install logging hooks to suppress whisper.cpp output (only once)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(StreamscribeError::RecognitionModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_from_path(&config.model_path);

        let context_params = WhisperContextParameters::default();
        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| StreamscribeError::RecognitionFailed {
                    message: "Invalid UTF-8 in model path".to_string(),
                })?,
            context_params,
        )
        .map_err(|e| StreamscribeError::RecognitionFailed {
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        Ok(Self {
            context: Mutex::new(context),
            config,
            model_name,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperEngineConfig {
        &self.config
    }
}

#[cfg(not(feature = "whisper"))]
impl WhisperEngine {
    /// Create a new Whisper engine (stub implementation).
    pub fn new(config: WhisperEngineConfig) -> Result<Self> {
        if !config.model_path.exists() {
            return Err(StreamscribeError::RecognitionModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_from_path(&config.model_path);

        Ok(Self { config, model_name })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperEngineConfig {
        &self.config
    }
}

/// Read a WAV file into f32 samples normalized to [-1.0, 1.0].
///
/// Stereo input is downmixed to mono. The transcoder already emits
/// 16kHz mono, this keeps the engine robust to hand-fed files.
pub fn read_wav_samples(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path).map_err(|e| StreamscribeError::AudioDecode {
        message: format!("Failed to parse WAV file: {}", e),
    })?;

    let channels = reader.spec().channels;

    let raw_samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StreamscribeError::AudioDecode {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    let mono_samples: Vec<i16> = if channels == 2 {
        raw_samples
            .chunks_exact(2)
            .map(|pair| {
                let left = pair[0] as i32;
                let right = pair[1] as i32;
                ((left + right) / 2) as i16
            })
            .collect()
    } else {
        raw_samples
    };

    Ok(mono_samples
        .iter()
        .map(|&sample| sample as f32 / 32768.0)
        .collect())
}

/// Voice-activity gate: true if any window of `min_silence_ms` worth of
/// samples carries enough RMS energy to plausibly contain speech.
pub fn has_voice_activity(samples: &[f32], sample_rate: u32, min_silence_ms: u32) -> bool {
    if samples.is_empty() {
        return false;
    }

    let window = ((sample_rate as u64 * min_silence_ms as u64) / 1000).max(1) as usize;

    samples.chunks(window).any(|chunk| {
        let energy: f32 = chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
        energy.sqrt() >= defaults::MIN_ENERGY_FOR_RECOGNITION
    })
}

#[cfg(feature = "whisper")]
impl RecognitionEngine for WhisperEngine {
    fn recognize(&self, audio_path: &Path, params: &RecognitionParams) -> Result<Vec<String>> {
        let audio = read_wav_samples(audio_path)?;

        if params.vad_filter
            && !has_voice_activity(&audio, defaults::SAMPLE_RATE, params.vad_min_silence_ms)
        {
            return Ok(Vec::new());
        }

        let context = self
            .context
            .lock()
            .map_err(|e| StreamscribeError::RecognitionFailed {
                message: format!("Failed to acquire context lock: {}", e),
            })?;

        let mut state =
            context
                .create_state()
                .map_err(|e| StreamscribeError::RecognitionFailed {
                    message: format!("Failed to create Whisper state: {}", e),
                })?;

        let mut full_params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: params.beam_size as i32,
            patience: -1.0,
        });
        full_params.set_temperature(params.temperature);

        let language = params.language.as_deref().or_else(|| {
            if self.config.language == defaults::AUTO_LANGUAGE {
                None
            } else {
                Some(self.config.language.as_str())
            }
        });
        full_params.set_language(language);

        if let Some(threads) = self.config.threads {
            full_params.set_n_threads(threads as i32);
        }

        // Disable printing to stdout/stderr
        full_params.set_print_special(false);
        full_params.set_print_progress(false);
        full_params.set_print_realtime(false);
        full_params.set_print_timestamps(false);

        state
            .full(full_params, &audio)
            .map_err(|e| StreamscribeError::RecognitionFailed {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let segments = state.as_iter().map(|segment| segment.to_string()).collect();

        Ok(segments)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(not(feature = "whisper"))]
impl RecognitionEngine for WhisperEngine {
    fn recognize(&self, _audio_path: &Path, _params: &RecognitionParams) -> Result<Vec<String>> {
        Err(StreamscribeError::RecognitionFailed {
            message: concat!(
                "Whisper feature not enabled. This binary was built without speech recognition.\n",
                "To fix: cargo build --features whisper\n",
                "If build fails with cmake errors, install: sudo apt install cmake"
            )
            .to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        false
    }
}
