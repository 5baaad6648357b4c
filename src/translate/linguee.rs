//! Linguee dictionary lookups through a linguee-api compatible service.
//!
//! Linguee is a word dictionary, so only the top translation of the first
//! lemma is returned. It has no Uzbek data; such pairs fail before any
//! request is made.

use super::{error_for_status, TranslateError, Translator};
use crate::language::Language;
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://linguee-api.fly.dev";

#[derive(Debug, Deserialize)]
struct Lemma {
    #[serde(default)]
    translations: Vec<LemmaTranslation>,
}

#[derive(Debug, Deserialize)]
struct LemmaTranslation {
    text: String,
}

fn linguee_code(language: Language) -> Result<&'static str, TranslateError> {
    match language {
        Language::En => Ok("en"),
        Language::Ru => Ok("ru"),
        Language::Uz => Err(TranslateError::UnsupportedLanguage(language)),
    }
}

pub struct LingueeTranslator {
    http: reqwest::Client,
    base_url: String,
}

impl LingueeTranslator {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Translator for LingueeTranslator {
    fn name(&self) -> &str {
        "Linguee"
    }

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslateError> {
        let src = linguee_code(source)?;
        let dst = linguee_code(target)?;
        let url = format!("{}/api/v2/translations", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[("query", text), ("src", src), ("dst", dst)])
            .send()
            .await?;
        let lemmas: Vec<Lemma> = error_for_status(response).await?.json().await?;
        Ok(lemmas
            .into_iter()
            .flat_map(|l| l.translations)
            .map(|t| t.text)
            .next()
            .unwrap_or_default())
    }
}
