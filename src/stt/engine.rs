use crate::defaults;
use crate::error::{Result, StreamscribeError};
use std::path::Path;
use std::sync::Arc;

/// Fixed invocation parameters for a recognition pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionParams {
    /// Beam width for decoding
    pub beam_size: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Whether to skip inference on silent audio
    pub vad_filter: bool,
    /// Minimum silence gap considered by the VAD filter, in milliseconds
    pub vad_min_silence_ms: u32,
    /// Language code, or None for automatic detection
    pub language: Option<String>,
}

impl Default for RecognitionParams {
    fn default() -> Self {
        Self {
            beam_size: defaults::BEAM_SIZE,
            temperature: defaults::TEMPERATURE,
            vad_filter: true,
            vad_min_silence_ms: defaults::VAD_MIN_SILENCE_MS,
            language: None,
        }
    }
}

/// Trait for speech recognition over a decoded audio file.
///
/// This trait allows swapping implementations (real Whisper vs mock).
/// Implementations are blocking and are not required to tolerate
/// concurrent invocations; the caller serializes access through the
/// transcription gate.
pub trait RecognitionEngine: Send + Sync {
    /// Recognize speech in a 16kHz mono WAV file.
    ///
    /// # Returns
    /// Zero or more text segments in the order the engine produced them.
    fn recognize(&self, audio_path: &Path, params: &RecognitionParams) -> Result<Vec<String>>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;

    /// Check if the engine is ready
    fn is_ready(&self) -> bool;
}

/// Implement RecognitionEngine for Arc<T> to allow sharing across sessions.
impl<T: RecognitionEngine> RecognitionEngine for Arc<T> {
    fn recognize(&self, audio_path: &Path, params: &RecognitionParams) -> Result<Vec<String>> {
        (**self).recognize(audio_path, params)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Mock recognition engine for testing
#[derive(Debug, Clone)]
pub struct MockRecognitionEngine {
    model_name: String,
    segments: Vec<String>,
    should_fail: bool,
}

impl MockRecognitionEngine {
    /// Create a new mock engine with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            segments: vec!["mock segment".to_string()],
            should_fail: false,
        }
    }

    /// Configure the mock to return specific segments
    pub fn with_segments(mut self, segments: &[&str]) -> Self {
        self.segments = segments.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Configure the mock to fail on recognize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl RecognitionEngine for MockRecognitionEngine {
    fn recognize(&self, _audio_path: &Path, _params: &RecognitionParams) -> Result<Vec<String>> {
        if self.should_fail {
            Err(StreamscribeError::RecognitionFailed {
                message: "mock recognition failure".to_string(),
            })
        } else {
            Ok(self.segments.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_recognition_params_defaults() {
        let params = RecognitionParams::default();
        assert_eq!(params.beam_size, 3);
        assert_eq!(params.temperature, 0.2);
        assert!(params.vad_filter);
        assert_eq!(params.vad_min_silence_ms, 500);
        assert_eq!(params.language, None);
    }

    #[test]
    fn test_mock_engine_returns_segments() {
        let engine = MockRecognitionEngine::new("test-model").with_segments(&["hello", "world"]);

        let result = engine.recognize(Path::new("/tmp/audio.wav"), &RecognitionParams::default());

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), vec!["hello", "world"]);
    }

    #[test]
    fn test_mock_engine_returns_error_when_configured() {
        let engine = MockRecognitionEngine::new("test-model").with_failure();

        let result = engine.recognize(Path::new("/tmp/audio.wav"), &RecognitionParams::default());

        assert!(result.is_err());
        match result {
            Err(StreamscribeError::RecognitionFailed { message }) => {
                assert_eq!(message, "mock recognition failure");
            }
            _ => panic!("Expected RecognitionFailed error"),
        }
    }

    #[test]
    fn test_mock_engine_empty_segments() {
        let engine = MockRecognitionEngine::new("test-model").with_segments(&[]);

        let result = engine
            .recognize(Path::new("/tmp/audio.wav"), &RecognitionParams::default())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_mock_engine_model_name() {
        let engine = MockRecognitionEngine::new("whisper-small");
        assert_eq!(engine.model_name(), "whisper-small");
    }

    #[test]
    fn test_mock_engine_is_ready() {
        assert!(MockRecognitionEngine::new("m").is_ready());
        assert!(!MockRecognitionEngine::new("m").with_failure().is_ready());
    }

    #[test]
    fn test_engine_trait_is_object_safe() {
        let engine: Box<dyn RecognitionEngine> =
            Box::new(MockRecognitionEngine::new("test-model").with_segments(&["boxed"]));

        assert_eq!(engine.model_name(), "test-model");
        assert!(engine.is_ready());

        let result = engine
            .recognize(&PathBuf::from("/tmp/a.wav"), &RecognitionParams::default())
            .unwrap();
        assert_eq!(result, vec!["boxed"]);
    }

    #[test]
    fn test_arc_engine_delegates() {
        let engine = Arc::new(MockRecognitionEngine::new("shared").with_segments(&["one"]));

        assert_eq!(engine.model_name(), "shared");
        let result = engine
            .recognize(Path::new("/tmp/a.wav"), &RecognitionParams::default())
            .unwrap();
        assert_eq!(result, vec!["one"]);
    }

    #[test]
    fn test_mock_engine_builder_pattern() {
        let engine = MockRecognitionEngine::new("model")
            .with_segments(&["first"])
            .with_segments(&["second"]);

        let result = engine
            .recognize(Path::new("/tmp/a.wav"), &RecognitionParams::default())
            .unwrap();
        assert_eq!(result, vec!["second"]);
    }
}
