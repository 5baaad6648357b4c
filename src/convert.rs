//! Transcodes compressed voice notes into linear PCM WAV for the recognizer.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error};

/// Sample rate the recognizers are fed with.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Extension of the converted artifact.
pub const WAVEFORM_EXTENSION: &str = "wav";

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("audio toolchain not available ({binary}): {source}")]
    ToolchainMissing {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("decoder exited with {status}: {stderr}")]
    DecoderFailed { status: String, stderr: String },

    #[error("decoder produced no output at {0}")]
    EmptyOutput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[async_trait]
pub trait FormatConverter: Send + Sync {
    /// Decodes `input` and writes a mono 16-bit WAV to `output`.
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;
}

/// [`FormatConverter`] backed by an `ffmpeg` subprocess.
#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    binary: String,
}

impl FfmpegConverter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn spawn_error(&self, source: io::Error) -> ConversionError {
        if source.kind() == io::ErrorKind::NotFound {
            ConversionError::ToolchainMissing {
                binary: self.binary.clone(),
                source,
            }
        } else {
            ConversionError::Io(source)
        }
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl FormatConverter for FfmpegConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let rate = TARGET_SAMPLE_RATE.to_string();
        let result = Command::new(&self.binary)
            .arg("-hide_banner")
            .args(["-loglevel", "error"])
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-ac", "1"])
            .args(["-ar", rate.as_str()])
            .args(["-acodec", "pcm_s16le"])
            .args(["-f", "wav"])
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            error!(input = %input.display(), stderr = %stderr, "ffmpeg conversion failed");
            return Err(ConversionError::DecoderFailed {
                status: result.status.to_string(),
                stderr,
            });
        }

        let written = tokio::fs::metadata(output).await.map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(ConversionError::EmptyOutput(output.to_path_buf()));
        }
        debug!(output = %output.display(), bytes = written, "audio converted to wav");
        Ok(())
    }
}

/// Verifies that `binary` can be executed.
pub async fn check_ffmpeg_binary(binary: &str) -> Result<(), ConversionError> {
    let output = Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match output {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(ConversionError::DecoderFailed {
            status: status.to_string(),
            stderr: "version probe failed".to_string(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ConversionError::ToolchainMissing {
            binary: binary.to_string(),
            source: e,
        }),
        Err(e) => Err(ConversionError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("voice-relay-convert-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn ffmpeg_available() -> bool {
        std::process::Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn write_wav(path: &Path, sample_rate: u32, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[tokio::test]
    async fn missing_binary_reports_toolchain_error() {
        let dir = temp_dir();
        let converter = FfmpegConverter::new("definitely-not-ffmpeg-7c1f");
        let err = converter
            .convert(&dir.join("in.ogg"), &dir.join("out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::ToolchainMissing { .. }));

        let err = check_ffmpeg_binary("definitely-not-ffmpeg-7c1f").await.unwrap_err();
        assert!(matches!(err, ConversionError::ToolchainMissing { .. }));
    }

    #[tokio::test]
    async fn malformed_input_is_a_decoder_failure() {
        if !ffmpeg_available() {
            return;
        }
        let dir = temp_dir();
        let input = dir.join("garbage.ogg");
        std::fs::write(&input, b"this is not an ogg container").unwrap();

        let err = FfmpegConverter::default()
            .convert(&input, &dir.join("garbage.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::DecoderFailed { .. }));
    }

    #[tokio::test]
    async fn stereo_44k_becomes_mono_16k() {
        if !ffmpeg_available() {
            return;
        }
        let dir = temp_dir();
        let input = dir.join("stereo.wav");
        let output = dir.join("mono.wav");
        write_wav(&input, 44_100, &vec![0i16; 4_410]);

        FfmpegConverter::default().convert(&input, &output).await.unwrap();

        let reader = hound::WavReader::open(&output).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, TARGET_SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);
    }
}
