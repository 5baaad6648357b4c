//! Google web speech (v2) recognizer.
//!
//! The endpoint takes raw big-endian 16-bit PCM (`audio/l16`) and answers
//! with one JSON object per line; the first is usually an empty result set.

use super::types::Transcription;
use super::SpeechRecognizer;
use crate::config::SttConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://www.google.com";
const RECOGNIZE_PATH: &str = "/speech-api/v2/recognize";

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    result: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternative: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: Option<String>,
    confidence: Option<f64>,
}

/// Mono L16 payload extracted from a WAV container.
struct L16Audio {
    sample_rate: u32,
    body: Vec<u8>,
}

fn wav_to_l16(waveform: &[u8]) -> std::result::Result<L16Audio, String> {
    let reader =
        hound::WavReader::new(Cursor::new(waveform)).map_err(|e| format!("invalid waveform: {}", e))?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(format!(
            "unsupported waveform: {} bit {:?}",
            spec.bits_per_sample, spec.sample_format
        ));
    }
    let channels = spec.channels.max(1) as usize;
    let samples = reader
        .into_samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid waveform: {}", e))?;

    let mut body = Vec::with_capacity(samples.len() / channels * 2);
    for frame in samples.chunks(channels) {
        let mono = frame.iter().map(|&s| s as i32).sum::<i32>() / frame.len() as i32;
        body.extend_from_slice(&(mono as i16).to_be_bytes());
    }
    Ok(L16Audio {
        sample_rate: spec.sample_rate,
        body,
    })
}

/// Picks the transcript from the line-delimited response, or `None` when
/// nothing was recognised.
fn best_transcript(body: &str) -> std::result::Result<Option<String>, String> {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let parsed: RecognizeResponse =
            serde_json::from_str(line).map_err(|e| format!("malformed response: {}", e))?;
        let Some(result) = parsed.result.into_iter().find(|r| !r.alternative.is_empty()) else {
            continue;
        };
        let has_confidence = result.alternative.iter().any(|a| a.confidence.is_some());
        let best = if has_confidence {
            result.alternative.into_iter().max_by(|a, b| {
                let a = a.confidence.unwrap_or(0.0);
                let b = b.confidence.unwrap_or(0.0);
                a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
            })
        } else {
            result.alternative.into_iter().next()
        };
        return Ok(best.and_then(|a| a.transcript));
    }
    Ok(None)
}

pub struct GoogleSpeechRecognizer {
    http_client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl GoogleSpeechRecognizer {
    /// Builds the recognizer from the `stt` section of the relay config.
    pub fn from_config(stt: &SttConfig, timeout: Duration) -> Result<Self> {
        let api_key = stt.google_api_key.clone().ok_or_else(|| {
            Error::configuration_with_context(
                "API key required for google speech recognizer",
                ErrorContext::new().with_field_path("stt.google_api_key"),
            )
        })?;
        let base_url = stt.google_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let endpoint = Url::parse(base_url)
            .and_then(|u| u.join(RECOGNIZE_PATH))
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid speech endpoint: {}", e),
                    ErrorContext::new()
                        .with_field_path("stt.google_base_url")
                        .with_details(base_url),
                )
            })?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            endpoint,
            api_key,
        })
    }

    async fn request(&self, audio: L16Audio, locale: &str) -> std::result::Result<String, String> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", "chromium")
            .append_pair("lang", locale)
            .append_pair("key", &self.api_key)
            .append_pair("pFilter", "0");

        let response = self
            .http_client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("audio/l16; rate={}", audio.sample_rate),
            )
            .body(audio.body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read response: {}", e.without_url()))?;
        if !status.is_success() {
            debug!(status = status.as_u16(), body = %body.trim(), "google speech error body");
            return Err(format!("HTTP {}", status.as_u16()));
        }
        Ok(body)
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    fn name(&self) -> &str {
        "google"
    }

    async fn recognize(&self, waveform: &[u8], locale: &str) -> Transcription {
        let audio = match wav_to_l16(waveform) {
            Ok(audio) => audio,
            Err(detail) => return Transcription::ServiceError(detail),
        };
        let body = match self.request(audio, locale).await {
            Ok(body) => body,
            Err(detail) => {
                warn!(locale, error = %detail, "google speech request failed");
                return Transcription::ServiceError(detail);
            }
        };
        match best_transcript(&body) {
            Ok(Some(text)) => {
                debug!(locale, chars = text.len(), "google speech transcription completed");
                Transcription::from_text(text)
            }
            Ok(None) => Transcription::Unintelligible,
            Err(detail) => Transcription::ServiceError(detail),
        }
    }
}
