//! # voice-relay
//!
//! 语音翻译中继：接收聊天语音或文字消息，识别语音并在用户选择的语言对之间翻译。
//!
//! Conversational relay that receives voice or text messages from a chat
//! client, turns voice into text, translates it between a user-selected
//! language pair (Uzbek, Russian, English) and replies.
//!
//! ## Overview
//!
//! The core is the voice pipeline:
//!
//! ```text
//! voice event → direction lookup → download (.ogg) → ffmpeg (.wav) → speech recognition
//!             → translation with provider fallback → reply → temp files removed
//! ```
//!
//! - **Explicit outcomes**: recognition and translation report results as enum
//!   variants, never as errors the caller has to guess at
//! - **Scoped artifacts**: temporary audio lives in [`scratch::ScratchFile`]
//!   guards released on every path
//! - **Injected state**: the [`DirectionStore`] is passed in, not global
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voice_relay::{
//!     convert::FfmpegConverter, scratch::ScratchDir, stt, telegram::TelegramTransport,
//!     translate, Relay, RelayConfig, TranslationChain, VoicePipeline,
//! };
//!
//! #[tokio::main]
//! async fn main() -> voice_relay::Result<()> {
//!     let config = RelayConfig::from_env()?;
//!     let http = reqwest::Client::new();
//!     let transport = Arc::new(TelegramTransport::new(
//!         config.token(),
//!         config.telegram_api_url.as_str(),
//!         config.http_timeout(),
//!     )?);
//!     let pipeline = VoicePipeline::builder()
//!         .transport(transport)
//!         .scratch(ScratchDir::new(config.scratch_dir.clone()))
//!         .converter(Arc::new(FfmpegConverter::new(config.ffmpeg_path.clone())))
//!         .recognizer(stt::recognizer_from_config(&config)?)
//!         .translator(TranslationChain::new(translate::providers_from_names(
//!             &config.translators,
//!             http,
//!         )?))
//!         .build()?;
//!     let _relay = Relay::new(pipeline);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`language`] | Languages, directions and recognizer locales |
//! | [`direction`] | Per-user direction store |
//! | [`transport`] | Chat transport trait and event model |
//! | [`telegram`] | Telegram Bot API transport and long polling |
//! | [`acquisition`] | Voice download into the scratch directory |
//! | [`convert`] | Compressed audio → WAV conversion |
//! | [`stt`] | Speech recognizers |
//! | [`translate`] | Translators and the fallback chain |
//! | [`pipeline`] | Voice pipeline coordinator |
//! | [`relay`] | Message routing around the pipeline |
//! | [`config`] | Environment / YAML configuration |

pub mod acquisition;
pub mod config;
pub mod convert;
pub mod direction;
pub mod language;
pub mod messages;
pub mod pipeline;
pub mod relay;
pub mod scratch;
pub mod stt;
pub mod telegram;
pub mod translate;
pub mod transport;

// Re-export main types for convenience
pub use config::RelayConfig;
pub use direction::{DirectionStore, UserId};
pub use language::{Direction, Language};
pub use pipeline::{AbortReason, PipelineReport, PipelineStage, VoicePipeline};
pub use relay::{Relay, RelayAction};
pub use stt::{SpeechRecognizer, Transcription};
pub use translate::{TranslationChain, TranslationOutcome, Translator};
pub use transport::{ChatId, ChatTransport, IncomingMessage, MessageKind, VoiceNote};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
