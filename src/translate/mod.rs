//! 翻译模块：按优先级依次尝试多个翻译服务，首个非空结果即返回。
//!
//! # Translation Module
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Translator`] | One translation backend |
//! | [`TranslationChain`] | Ordered fallback over several backends |
//! | [`GoogleTranslator`] | Google web translate endpoint |
//! | [`MyMemoryTranslator`] | MyMemory public API |
//! | [`LingueeTranslator`] | Linguee dictionary lookups (no Uzbek) |
//!
//! ```rust
//! use std::sync::Arc;
//! use voice_relay::translate::{GoogleTranslator, MyMemoryTranslator, TranslationChain, Translator};
//!
//! let http = reqwest::Client::new();
//! let providers: Vec<Arc<dyn Translator>> = vec![
//!     Arc::new(GoogleTranslator::new(http.clone())),
//!     Arc::new(MyMemoryTranslator::new(http)),
//! ];
//! let chain = TranslationChain::new(providers);
//! assert_eq!(chain.provider_names(), vec!["Google", "MyMemory"]);
//! ```

mod chain;
mod google;
mod linguee;
mod mymemory;

pub use chain::{TranslationChain, TranslationOutcome};
pub use google::GoogleTranslator;
pub use linguee::LingueeTranslator;
pub use mymemory::MyMemoryTranslator;

use crate::language::Language;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Provider order used when nothing is configured.
pub const DEFAULT_PROVIDERS: [&str; 3] = ["google", "mymemory", "linguee"];

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("language not supported: {0}")]
    UnsupportedLanguage(Language),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Display name; shown to users next to the translation.
    fn name(&self) -> &str;

    /// Translates `text`. `Ok("")` means the provider had nothing to offer.
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> std::result::Result<String, TranslateError>;
}

/// Builds providers by configuration name, keeping the given order.
pub fn providers_from_names<S: AsRef<str>>(
    names: &[S],
    http: reqwest::Client,
) -> Result<Vec<Arc<dyn Translator>>> {
    names
        .iter()
        .map(|name| -> Result<Arc<dyn Translator>> {
            match name.as_ref().trim().to_ascii_lowercase().as_str() {
                "google" => Ok(Arc::new(GoogleTranslator::new(http.clone()))),
                "mymemory" => Ok(Arc::new(MyMemoryTranslator::new(http.clone()))),
                "linguee" => Ok(Arc::new(LingueeTranslator::new(http.clone()))),
                other => Err(Error::configuration_with_context(
                    format!("Unknown translation provider '{}'", other),
                    ErrorContext::new()
                        .with_field_path("translators")
                        .with_details("expected one of google, mymemory, linguee"),
                )),
            }
        })
        .collect()
}

async fn error_for_status(
    response: reqwest::Response,
) -> std::result::Result<reqwest::Response, TranslateError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TranslateError::Status {
        status: status.as_u16(),
        body: body.trim().chars().take(200).collect(),
    })
}
