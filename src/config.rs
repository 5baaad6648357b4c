//! Relay configuration.
//!
//! Precedence: environment variables, then the YAML file named by
//! `VOICE_RELAY_CONFIG`, then built-in defaults.

use crate::translate::DEFAULT_PROVIDERS;
use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SttProvider {
    Google,
    Whisper,
}

impl SttProvider {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Some(SttProvider::Google),
            "whisper" => Some(SttProvider::Whisper),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    pub provider: SttProvider,
    pub google_api_key: Option<String>,
    pub google_base_url: Option<String>,
    pub whisper_api_key: Option<String>,
    pub whisper_base_url: Option<String>,
    pub whisper_model: Option<String>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            provider: SttProvider::Google,
            google_api_key: None,
            google_base_url: None,
            whisper_api_key: None,
            whisper_base_url: None,
            whisper_model: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Chat platform access token. Required.
    pub bot_token: Option<String>,
    pub telegram_api_url: String,
    pub scratch_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub poll_timeout_secs: u64,
    pub ffmpeg_path: String,
    pub stt: SttConfig,
    /// Translation providers in priority order.
    pub translators: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            telegram_api_url: crate::telegram::DEFAULT_API_URL.to_string(),
            scratch_dir: PathBuf::from("downloads"),
            http_timeout_secs: 30,
            poll_timeout_secs: 30,
            ffmpeg_path: "ffmpeg".to_string(),
            stt: SttConfig::default(),
            translators: DEFAULT_PROVIDERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        Error::configuration_with_context(
            format!("{} must be a whole number of seconds", key),
            ErrorContext::new()
                .with_field_path(key)
                .with_details(value.to_string()),
        )
    })
}

impl RelayConfig {
    /// Loads from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = match var("VOICE_RELAY_CONFIG") {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };

        if let Some(token) = var("TELEGRAM_BOT_TOKEN") {
            config.bot_token = Some(token);
        }
        if let Some(url) = var("TELEGRAM_API_URL") {
            config.telegram_api_url = url;
        }
        if let Some(dir) = var("VOICE_RELAY_SCRATCH_DIR") {
            config.scratch_dir = PathBuf::from(dir);
        }
        if let Some(v) = var("VOICE_RELAY_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = parse_secs("VOICE_RELAY_HTTP_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = var("VOICE_RELAY_POLL_TIMEOUT_SECS") {
            config.poll_timeout_secs = parse_secs("VOICE_RELAY_POLL_TIMEOUT_SECS", &v)?;
        }
        if let Some(path) = var("VOICE_RELAY_FFMPEG") {
            config.ffmpeg_path = path;
        }
        if let Some(provider) = var("VOICE_RELAY_STT_PROVIDER") {
            config.stt.provider = SttProvider::parse(&provider).ok_or_else(|| {
                Error::configuration_with_context(
                    format!("Unknown speech provider '{}'", provider),
                    ErrorContext::new()
                        .with_field_path("stt.provider")
                        .with_details("expected google or whisper"),
                )
            })?;
        }
        if let Some(key) = var("GOOGLE_SPEECH_API_KEY") {
            config.stt.google_api_key = Some(key);
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            config.stt.whisper_api_key = Some(key);
        }
        if let Some(url) = var("VOICE_RELAY_WHISPER_URL") {
            config.stt.whisper_base_url = Some(url);
        }
        if let Some(list) = var("VOICE_RELAY_TRANSLATORS") {
            config.translators = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    fn from_yaml_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("Cannot read config file: {}", e),
                ErrorContext::new().with_details(path.to_string()).with_source("config"),
            )
        })?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    fn validate(&self) -> Result<()> {
        if self.bot_token.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err(Error::configuration_with_context(
                "TELEGRAM_BOT_TOKEN is not set",
                ErrorContext::new().with_field_path("bot_token").with_source("config"),
            ));
        }
        let key_missing = match self.stt.provider {
            SttProvider::Google => self.stt.google_api_key.is_none().then_some("stt.google_api_key"),
            SttProvider::Whisper => self.stt.whisper_api_key.is_none().then_some("stt.whisper_api_key"),
        };
        if let Some(field) = key_missing {
            return Err(Error::configuration_with_context(
                "Speech recognizer API key is not set",
                ErrorContext::new().with_field_path(field).with_source("config"),
            ));
        }
        if self.translators.is_empty() {
            return Err(Error::configuration_with_context(
                "At least one translation provider is required",
                ErrorContext::new().with_field_path("translators"),
            ));
        }
        Ok(())
    }

    /// Bot token; only call after a successful load.
    pub fn token(&self) -> &str {
        self.bot_token.as_deref().unwrap_or_default()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}
