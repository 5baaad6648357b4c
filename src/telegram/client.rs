use super::types::{
    ApiResponse, File, KeyboardButton, ReplyKeyboardMarkup, SendMessage, Update,
};
use crate::transport::{ChatId, ChatTransport, FileLocation, Keyboard, TransportError};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Proxy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Telegram Bot API client.
///
/// Request URLs embed the bot token, so reqwest errors are stripped of
/// their URL before they leave this type.
pub struct TelegramTransport {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramTransport {
    pub fn new(token: impl Into<String>, api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(
                env::var("VOICE_RELAY_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("VOICE_RELAY_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_url, self.token, file_path)
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> std::result::Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.method_url(method)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(strip_url)?;
        let envelope: ApiResponse<T> = response.json().await.map_err(strip_url)?;
        match (envelope.ok, envelope.result) {
            (true, Some(result)) => Ok(result),
            (_, _) => Err(TransportError::Api {
                code: envelope.error_code.unwrap_or(0),
                description: envelope
                    .description
                    .unwrap_or_else(|| format!("{} returned no result", method)),
            }),
        }
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout: Duration,
    ) -> std::result::Result<Vec<Update>, TransportError> {
        let mut body = serde_json::json!({
            "timeout": poll_timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::json!(offset);
        }
        // Leave room past the server-side hold so polling never trips the client timeout.
        let request_timeout = poll_timeout + Duration::from_secs(10);
        self.call("getUpdates", &body, Some(request_timeout)).await
    }
}

fn strip_url(e: reqwest::Error) -> TransportError {
    TransportError::Http(e.without_url())
}

fn reply_markup(keyboard: &Keyboard) -> ReplyKeyboardMarkup<'_> {
    ReplyKeyboardMarkup {
        keyboard: keyboard
            .rows
            .iter()
            .map(|row| row.iter().map(|text| KeyboardButton { text }).collect())
            .collect(),
        resize_keyboard: keyboard.resize,
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn resolve_file(&self, file_id: &str) -> std::result::Result<FileLocation, TransportError> {
        let file: File = self
            .call("getFile", &serde_json::json!({ "file_id": file_id }), None)
            .await?;
        let path = file
            .file_path
            .ok_or_else(|| TransportError::Other(format!("file {} is not downloadable", file_id)))?;
        Ok(FileLocation {
            file_id: file.file_id,
            path,
            size: file.file_size,
        })
    }

    async fn download_to(
        &self,
        location: &FileLocation,
        destination: &Path,
    ) -> std::result::Result<(), TransportError> {
        let response = self
            .client
            .get(self.file_url(&location.path))
            .send()
            .await
            .map_err(strip_url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Api {
                code: status.as_u16() as i64,
                description: format!("download of {} failed", location.file_id),
            });
        }

        let mut file = tokio::fs::File::create(destination).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(strip_url)?;
            written += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        debug!(file_id = %location.file_id, bytes = written, "file downloaded");
        Ok(())
    }

    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> std::result::Result<(), TransportError> {
        let request = SendMessage {
            chat_id: chat.0,
            text,
            parse_mode: "HTML",
            reply_markup: keyboard.map(reply_markup),
        };
        let _: serde_json::Value = self.call("sendMessage", &request, None).await?;
        Ok(())
    }
}
