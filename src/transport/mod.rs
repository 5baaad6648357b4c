//! Chat transport seam: message delivery and voice file retrieval.
//!
//! The relay core only talks to [`ChatTransport`]; the Telegram Bot API
//! implementation lives in [`crate::telegram`].

use crate::direction::UserId;
use crate::language::direction_labels;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// Conversation a reply is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Voice attachment as delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceNote {
    /// Opaque reference used to resolve the download location.
    pub file_id: String,
    pub duration_secs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Text(String),
    Voice(VoiceNote),
    /// Anything the relay does not handle (stickers, photos, ...).
    Other,
}

/// One incoming message event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub user: UserId,
    pub chat: ChatId,
    pub kind: MessageKind,
}

/// Where a resolved file can be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub file_id: String,
    /// Platform-relative path (for Telegram, `file_path` from `getFile`).
    pub path: String,
    pub size: Option<u64>,
}

/// Reply keyboard shown under the input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
    pub resize: bool,
}

impl Keyboard {
    /// Lays `buttons` out `per_row` to a row.
    pub fn grid<I, S>(buttons: I, per_row: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let buttons: Vec<String> = buttons.into_iter().map(Into::into).collect();
        let rows = buttons
            .chunks(per_row.max(1))
            .map(|row| row.to_vec())
            .collect();
        Self { rows, resize: true }
    }

    /// The six translation directions, two per row.
    pub fn directions() -> Self {
        Self::grid(direction_labels().iter().cloned(), 2)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

/// Operations the relay needs from the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Resolves an opaque file reference into a downloadable location.
    async fn resolve_file(&self, file_id: &str) -> Result<FileLocation, TransportError>;

    /// Downloads `location` to `destination`, replacing any existing file.
    async fn download_to(
        &self,
        location: &FileLocation,
        destination: &Path,
    ) -> Result<(), TransportError>;

    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError>;
}
