use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub recognition: RecognitionConfig,
    pub buffering: BufferingConfig,
    pub output: OutputConfig,
}

/// Recognition backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Model size/variant (e.g. "small", "base", "large-v3")
    pub model: String,
    /// Device selector ("auto", "cpu", "cuda")
    pub device: String,
    /// Compute precision override; derived from device when unset
    pub compute_type: Option<String>,
    /// Language code, or "auto" for automatic detection
    pub language: String,
}

/// Ingestion buffering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BufferingConfig {
    /// Compressed-audio bytes accumulated before a transcription pass
    pub min_chunk_bytes: usize,
}

/// Output event configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Speaker label attached to every transcript event
    pub speaker: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            device: defaults::DEFAULT_DEVICE.to_string(),
            compute_type: None,
            language: defaults::AUTO_LANGUAGE.to_string(),
        }
    }
}

impl Default for BufferingConfig {
    fn default() -> Self {
        Self {
            min_chunk_bytes: defaults::MIN_CHUNK_BYTES,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            speaker: defaults::DEFAULT_SPEAKER.to_string(),
        }
    }
}

impl RecognitionConfig {
    /// Effective compute precision for the engine.
    ///
    /// An explicit `compute_type` wins; otherwise int8 quantization on
    /// CPU and mixed int8/float16 on accelerators.
    pub fn effective_compute_type(&self) -> &str {
        match &self.compute_type {
            Some(compute_type) => compute_type,
            None if self.device == "cpu" => "int8",
            None => "int8_float16",
        }
    }

    /// Language to pass to the engine, `None` meaning auto-detect.
    pub fn language_override(&self) -> Option<&str> {
        if self.language == defaults::AUTO_LANGUAGE {
            None
        } else {
            Some(&self.language)
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file is missing
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - STREAMSCRIBE_MODEL → recognition.model
    /// - STREAMSCRIBE_DEVICE → recognition.device
    /// - STREAMSCRIBE_COMPUTE_TYPE → recognition.compute_type
    /// - STREAMSCRIBE_LANGUAGE → recognition.language
    /// - STREAMSCRIBE_MIN_CHUNK_BYTES → buffering.min_chunk_bytes
    /// - STREAMSCRIBE_SPEAKER → output.speaker
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("STREAMSCRIBE_MODEL")
            && !model.is_empty()
        {
            self.recognition.model = model;
        }

        if let Ok(device) = std::env::var("STREAMSCRIBE_DEVICE")
            && !device.is_empty()
        {
            self.recognition.device = device;
        }

        if let Ok(compute_type) = std::env::var("STREAMSCRIBE_COMPUTE_TYPE")
            && !compute_type.is_empty()
        {
            self.recognition.compute_type = Some(compute_type);
        }

        if let Ok(language) = std::env::var("STREAMSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.recognition.language = language;
        }

        if let Ok(min_chunk) = std::env::var("STREAMSCRIBE_MIN_CHUNK_BYTES")
            && let Ok(bytes) = min_chunk.parse::<usize>()
            && bytes > 0
        {
            self.buffering.min_chunk_bytes = bytes;
        }

        if let Ok(speaker) = std::env::var("STREAMSCRIBE_SPEAKER")
            && !speaker.is_empty()
        {
            self.output.speaker = speaker;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_streamscribe_env() {
        remove_env("STREAMSCRIBE_MODEL");
        remove_env("STREAMSCRIBE_DEVICE");
        remove_env("STREAMSCRIBE_COMPUTE_TYPE");
        remove_env("STREAMSCRIBE_LANGUAGE");
        remove_env("STREAMSCRIBE_MIN_CHUNK_BYTES");
        remove_env("STREAMSCRIBE_SPEAKER");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.recognition.model, "small");
        assert_eq!(config.recognition.device, "auto");
        assert_eq!(config.recognition.compute_type, None);
        assert_eq!(config.recognition.language, "auto");

        assert_eq!(config.buffering.min_chunk_bytes, 20_000);

        assert_eq!(config.output.speaker, "protagonist");
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [recognition]
            model = "large-v3"
            device = "cuda"
            compute_type = "float16"
            language = "ja"

            [buffering]
            min_chunk_bytes = 48000

            [output]
            speaker = "narrator"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.recognition.model, "large-v3");
        assert_eq!(config.recognition.device, "cuda");
        assert_eq!(config.recognition.compute_type, Some("float16".to_string()));
        assert_eq!(config.recognition.language, "ja");
        assert_eq!(config.buffering.min_chunk_bytes, 48000);
        assert_eq!(config.output.speaker, "narrator");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let toml_content = r#"
            [recognition]
            model = "base"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.recognition.model, "base");
        assert_eq!(config.recognition.device, "auto");
        assert_eq!(config.buffering.min_chunk_bytes, 20_000);
        assert_eq!(config.output.speaker, "protagonist");
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not = valid = toml").unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_invalid_toml_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not = valid = toml").unwrap();

        let result = Config::load_or_default(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_effective_compute_type_cpu() {
        let config = RecognitionConfig {
            device: "cpu".to_string(),
            ..Default::default()
        };
        assert_eq!(config.effective_compute_type(), "int8");
    }

    #[test]
    fn test_effective_compute_type_accelerator() {
        let config = RecognitionConfig::default();
        assert_eq!(config.effective_compute_type(), "int8_float16");
    }

    #[test]
    fn test_effective_compute_type_explicit_override() {
        let config = RecognitionConfig {
            compute_type: Some("float32".to_string()),
            device: "cpu".to_string(),
            ..Default::default()
        };
        assert_eq!(config.effective_compute_type(), "float32");
    }

    #[test]
    fn test_language_override() {
        let auto = RecognitionConfig::default();
        assert_eq!(auto.language_override(), None);

        let fixed = RecognitionConfig {
            language: "en".to_string(),
            ..Default::default()
        };
        assert_eq!(fixed.language_override(), Some("en"));
    }

    #[test]
    fn test_env_overrides_applied() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_streamscribe_env();

        set_env("STREAMSCRIBE_MODEL", "medium");
        set_env("STREAMSCRIBE_LANGUAGE", "zh");
        set_env("STREAMSCRIBE_MIN_CHUNK_BYTES", "32000");
        set_env("STREAMSCRIBE_SPEAKER", "companion");

        let config = Config::default().with_env_overrides();

        assert_eq!(config.recognition.model, "medium");
        assert_eq!(config.recognition.language, "zh");
        assert_eq!(config.buffering.min_chunk_bytes, 32000);
        assert_eq!(config.output.speaker, "companion");

        clear_streamscribe_env();
    }

    #[test]
    fn test_env_overrides_ignore_empty_and_invalid() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_streamscribe_env();

        set_env("STREAMSCRIBE_MODEL", "");
        set_env("STREAMSCRIBE_MIN_CHUNK_BYTES", "not-a-number");

        let config = Config::default().with_env_overrides();

        assert_eq!(config.recognition.model, "small");
        assert_eq!(config.buffering.min_chunk_bytes, 20_000);

        clear_streamscribe_env();
    }

    #[test]
    fn test_env_override_zero_chunk_bytes_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_streamscribe_env();

        set_env("STREAMSCRIBE_MIN_CHUNK_BYTES", "0");

        let config = Config::default().with_env_overrides();
        assert_eq!(config.buffering.min_chunk_bytes, 20_000);

        clear_streamscribe_env();
    }

    #[test]
    fn test_config_roundtrip_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
