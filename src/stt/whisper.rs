//! Whisper-compatible transcription backend (`/v1/audio/transcriptions`).

use super::types::Transcription;
use super::SpeechRecognizer;
use crate::config::SttConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_WHISPER_URL: &str = "https://api.openai.com";
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";
const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";

/// Recognizer for OpenAI-compatible transcription endpoints.
pub struct WhisperRecognizer {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: String,
}

impl WhisperRecognizer {
    /// Builds the recognizer from the `stt` section of the relay config.
    pub fn from_config(stt: &SttConfig, timeout: Duration) -> Result<Self> {
        let api_key = stt.whisper_api_key.clone().ok_or_else(|| {
            Error::configuration_with_context(
                "API key required for whisper recognizer",
                ErrorContext::new().with_field_path("stt.whisper_api_key"),
            )
        })?;
        let base_url = stt.whisper_base_url.as_deref().unwrap_or(DEFAULT_WHISPER_URL);
        let endpoint = Url::parse(base_url)
            .and_then(|u| u.join(TRANSCRIPTIONS_PATH))
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid whisper endpoint: {}", e),
                    ErrorContext::new()
                        .with_field_path("stt.whisper_base_url")
                        .with_details(base_url),
                )
            })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint,
            model: stt
                .whisper_model
                .clone()
                .unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string()),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn transcribe(&self, audio: &[u8], language: &str) -> std::result::Result<String, String> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("voice.wav")
            .mime_str("audio/wav")
            .map_err(|e| format!("invalid mime: {}", e))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", language.to_string())
            .text("response_format", "json");

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read response: {}", e.without_url()))?;
        if !status.is_success() {
            debug!(status = status.as_u16(), body = %body.trim(), "whisper error body");
            return Err(format!("HTTP {}", status.as_u16()));
        }
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| format!("malformed response: {}", e))?;
        Ok(json
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string())
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn recognize(&self, waveform: &[u8], locale: &str) -> Transcription {
        // Whisper wants ISO-639-1, not a full locale.
        let language = locale.split('-').next().unwrap_or(locale);
        match self.transcribe(waveform, language).await {
            Ok(text) => {
                debug!(model = %self.model, chars = text.len(), "whisper transcription completed");
                Transcription::from_text(text)
            }
            Err(detail) => {
                warn!(model = %self.model, error = %detail, "whisper transcription failed");
                Transcription::ServiceError(detail)
            }
        }
    }
}
