//! MyMemory translation memory API (`/get?q=...&langpair=src|tgt`).

use super::{error_for_status, TranslateError, Translator};
use crate::language::Language;
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.mymemory.translated.net";

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
    /// Usually a number, but quota errors have been seen as strings.
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
    #[serde(rename = "responseDetails", default)]
    response_details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl MyMemoryResponse {
    fn status(&self) -> Option<u64> {
        match &self.response_status {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn into_text(self) -> Result<String, TranslateError> {
        if self.status() != Some(200) {
            let details = match &self.response_details {
                serde_json::Value::String(s) if !s.is_empty() => s.clone(),
                _ => format!("status {}", self.response_status),
            };
            return Err(TranslateError::Provider(details));
        }
        Ok(self
            .response_data
            .and_then(|d| d.translated_text)
            .unwrap_or_default())
    }
}

pub struct MyMemoryTranslator {
    http: reqwest::Client,
    base_url: String,
}

impl MyMemoryTranslator {
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
impl Translator for MyMemoryTranslator {
    fn name(&self) -> &str {
        "MyMemory"
    }

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslateError> {
        let url = format!("{}/get", self.base_url.trim_end_matches('/'));
        let langpair = format!("{}|{}", source.code(), target.code());
        let response = self
            .http
            .get(&url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;
        let body: MyMemoryResponse = error_for_status(response).await?.json().await?;
        body.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn extracts_translated_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/get")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Hello".into()),
                Matcher::UrlEncoded("langpair".into(), "en|ru".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"responseData":{"translatedText":"Привет","match":1},"responseStatus":200,"responseDetails":""}"#)
            .create_async()
            .await;

        let translator = MyMemoryTranslator::new(reqwest::Client::new()).with_base_url(server.url());
        let text = translator
            .translate("Hello", Language::En, Language::Ru)
            .await
            .unwrap();
        assert_eq!(text, "Привет");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn quota_message_is_a_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/get")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"responseData":{"translatedText":"MYMEMORY WARNING"},"responseStatus":"429","responseDetails":"DAILY QUOTA EXCEEDED"}"#)
            .create_async()
            .await;

        let translator = MyMemoryTranslator::new(reqwest::Client::new()).with_base_url(server.url());
        let err = translator
            .translate("Hello", Language::En, Language::Uz)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Provider(ref d) if d == "DAILY QUOTA EXCEEDED"));
    }
}
