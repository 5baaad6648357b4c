//! Subset of the Telegram Bot API object model used by the relay.

use crate::direction::UserId;
use crate::transport::{ChatId, IncomingMessage, MessageKind, VoiceNote};
use serde::{Deserialize, Serialize};

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub voice: Option<Voice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub file_id: String,
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_id: String,
    pub file_size: Option<u64>,
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KeyboardButton<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ReplyKeyboardMarkup<'a> {
    pub keyboard: Vec<Vec<KeyboardButton<'a>>>,
    pub resize_keyboard: bool,
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyKeyboardMarkup<'a>>,
}

impl Update {
    /// Converts the update into a relay event; updates without a message
    /// (edits, callbacks, ...) yield `None`.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message?;
        let user = message.from.map(|u| u.id).unwrap_or(message.chat.id);
        let kind = if let Some(voice) = message.voice {
            MessageKind::Voice(VoiceNote {
                file_id: voice.file_id,
                duration_secs: voice.duration,
            })
        } else if let Some(text) = message.text {
            MessageKind::Text(text)
        } else {
            MessageKind::Other
        };
        Some(IncomingMessage {
            user: UserId(user),
            chat: ChatId(message.chat.id),
            kind,
        })
    }
}
