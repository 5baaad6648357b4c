//! STT（语音转文字）模块：将 WAV 音频按语言提示转录为文本。
//!
//! Speech recognition for converted voice notes. Recognizers never return
//! `Err`: "no speech" and "service failed" are ordinary [`Transcription`]
//! outcomes the pipeline branches on.

mod google;
mod types;
mod whisper;

pub use google::GoogleSpeechRecognizer;
pub use types::Transcription;
pub use whisper::{WhisperRecognizer, DEFAULT_WHISPER_MODEL, DEFAULT_WHISPER_URL};

use crate::config::{RelayConfig, SttProvider};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Transcribes a WAV payload spoken in `locale` (e.g. `ru-RU`).
    async fn recognize(&self, waveform: &[u8], locale: &str) -> Transcription;
}

/// Builds the recognizer selected by `config.stt.provider`.
pub fn recognizer_from_config(config: &RelayConfig) -> Result<Arc<dyn SpeechRecognizer>> {
    let timeout = config.http_timeout();
    Ok(match config.stt.provider {
        SttProvider::Google => Arc::new(GoogleSpeechRecognizer::from_config(&config.stt, timeout)?),
        SttProvider::Whisper => Arc::new(WhisperRecognizer::from_config(&config.stt, timeout)?),
    })
}
