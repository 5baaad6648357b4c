//! Routes incoming chat messages: `/start`, direction selection, text
//! translation and voice messages.

use crate::direction::UserId;
use crate::language::Direction;
use crate::messages;
use crate::pipeline::{compose_translation_reply, PipelineReport, VoicePipeline};
use crate::transport::{ChatId, IncomingMessage, Keyboard, MessageKind};
use crate::translate::TranslationOutcome;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the relay did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayAction {
    Greeted,
    DirectionSelected(Direction),
    TextTranslated(TranslationOutcome),
    /// Text arrived before any direction was chosen.
    DirectionMissing,
    Voice(PipelineReport),
    Ignored,
}

#[derive(Clone)]
pub struct Relay {
    pipeline: Arc<VoicePipeline>,
}

fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or("");
    command == "/start" || command.starts_with("/start@")
}

impl Relay {
    pub fn new(pipeline: VoicePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> &VoicePipeline {
        &self.pipeline
    }

    pub async fn handle(&self, message: IncomingMessage) -> RelayAction {
        match message.kind {
            MessageKind::Voice(voice) => {
                RelayAction::Voice(self.pipeline.run(message.user, message.chat, &voice).await)
            }
            MessageKind::Text(text) => self.handle_text(message.user, message.chat, &text).await,
            MessageKind::Other => {
                debug!(user_id = %message.user, "ignoring unsupported message");
                RelayAction::Ignored
            }
        }
    }

    async fn handle_text(&self, user: UserId, chat: ChatId, text: &str) -> RelayAction {
        let text = text.trim();
        if text.is_empty() {
            return RelayAction::Ignored;
        }

        if is_start_command(text) {
            self.send(chat, messages::GREETING, Some(&Keyboard::directions()))
                .await;
            return RelayAction::Greeted;
        }

        if let Some(direction) = Direction::from_label(text) {
            self.pipeline.directions().set(user, direction);
            info!(user_id = %user, direction = %direction, "direction selected");
            self.send(chat, &messages::direction_selected(text), None).await;
            return RelayAction::DirectionSelected(direction);
        }

        let Some(direction) = self.pipeline.directions().get(user) else {
            self.send(
                chat,
                messages::SELECT_DIRECTION_FOR_TEXT,
                Some(&Keyboard::directions()),
            )
            .await;
            return RelayAction::DirectionMissing;
        };

        let outcome = self.pipeline.translator().translate(text, direction).await;
        self.send(chat, &compose_translation_reply(&outcome), None).await;
        RelayAction::TextTranslated(outcome)
    }

    async fn send(&self, chat: ChatId, text: &str, keyboard: Option<&Keyboard>) {
        if let Err(e) = self
            .pipeline
            .transport()
            .send_message(chat, text, keyboard)
            .await
        {
            warn!(chat_id = %chat, error = %e, "failed to send reply");
        }
    }
}
