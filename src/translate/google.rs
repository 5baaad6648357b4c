//! Google web translate (`translate_a/single`, `client=gtx`).

use super::{error_for_status, TranslateError, Translator};
use crate::language::Language;
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

pub struct GoogleTranslator {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
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

/// The response is a nested array; `[0]` holds `[translated, original, ...]`
/// segments that concatenate to the full translation.
fn join_segments(body: &serde_json::Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::MalformedResponse("missing segment list".into()))?;
    Ok(segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|t| t.as_str()))
        .collect())
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "Google"
    }

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslateError> {
        let url = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.code()),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;
        let body: serde_json::Value = error_for_status(response).await?.json().await?;
        join_segments(&body)
    }
}
