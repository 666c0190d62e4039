//! Audio transcoding with testable command execution.
//!
//! Converts compressed container chunks (WebM/Opus from a browser
//! MediaRecorder, typically) into 16kHz mono WAV for the recognition
//! engine, by shelling out to ffmpeg.
//!
//! The `CommandExecutor` trait enables full testability without external dependencies.

use crate::defaults;
use crate::error::{Result, StreamscribeError};
use std::path::Path;
use std::process::Command;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
/// Enables testability by allowing mock implementations.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    /// Returns an error if the command fails or is not found.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StreamscribeError::TranscodeToolNotFound {
                    tool: command.to_string(),
                }
            } else {
                StreamscribeError::TranscodeFailed {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StreamscribeError::TranscodeFailed {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command, output.status, stderr
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Trait for converting a compressed audio container into decoded
/// waveform audio the recognition engine can consume.
pub trait AudioTranscoder: Send + Sync {
    /// Transcode `src` into a mono, fixed-sample-rate WAV at `dst`.
    ///
    /// A non-zero exit status from the external tool is an error.
    fn transcode(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Whether the external tool was found at construction time.
    fn is_available(&self) -> bool;
}

/// ffmpeg-based transcoder using CommandExecutor for system interaction.
pub struct FfmpegTranscoder<E: CommandExecutor> {
    executor: E,
    sample_rate: u32,
    available: bool,
}

impl<E: CommandExecutor> FfmpegTranscoder<E> {
    /// Create a new transcoder with the given executor.
    ///
    /// Probes for ffmpeg once; availability is fixed for the lifetime
    /// of the instance.
    pub fn new(executor: E) -> Self {
        let available = match executor.execute("ffmpeg", &["-version"]) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("ffmpeg not available: {}", e);
                false
            }
        };
        Self {
            executor,
            sample_rate: defaults::SAMPLE_RATE,
            available,
        }
    }

    /// Override the output sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
}

impl<E: CommandExecutor> AudioTranscoder for FfmpegTranscoder<E> {
    fn transcode(&self, src: &Path, dst: &Path) -> Result<()> {
        let src = src.to_string_lossy();
        let dst = dst.to_string_lossy();
        let rate = self.sample_rate.to_string();

        self.executor.execute(
            "ffmpeg",
            &[
                "-loglevel", "error", "-y", "-i", &src, "-ac", "1", "-ar", &rate, &dst,
            ],
        )?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

impl FfmpegTranscoder<SystemCommandExecutor> {
    /// Create a transcoder with the system command executor.
    pub fn system() -> Self {
        Self::new(SystemCommandExecutor::new())
    }
}

/// Mock transcoder for testing.
///
/// Writes a canned WAV payload to the destination path, or fails when
/// configured to simulate a non-zero ffmpeg exit.
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    output: Vec<u8>,
    should_fail: bool,
    available: bool,
}

impl MockTranscoder {
    /// Create a mock that copies the source bytes to the destination.
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            should_fail: false,
            available: true,
        }
    }

    /// Configure the bytes written to the destination file.
    pub fn with_output(mut self, output: Vec<u8>) -> Self {
        self.output = output;
        self
    }

    /// Configure the mock to fail on transcode.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to report ffmpeg as missing.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioTranscoder for MockTranscoder {
    fn transcode(&self, src: &Path, dst: &Path) -> Result<()> {
        if self.should_fail {
            return Err(StreamscribeError::TranscodeFailed {
                message: "mock transcode failure".to_string(),
            });
        }
        if self.output.is_empty() {
            std::fs::copy(src, dst)?;
        } else {
            std::fs::write(dst, &self.output)?;
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
