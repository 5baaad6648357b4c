//! Long-poll source of incoming messages.

use super::client::TelegramTransport;
use crate::transport::{IncomingMessage, TransportError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct UpdatePoller {
    transport: Arc<TelegramTransport>,
    offset: Option<i64>,
    poll_timeout: Duration,
}

impl UpdatePoller {
    pub fn new(transport: Arc<TelegramTransport>, poll_timeout: Duration) -> Self {
        Self {
            transport,
            offset: None,
            poll_timeout,
        }
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Fetches the next batch and acknowledges it by advancing the offset.
    pub async fn next_batch(&mut self) -> Result<Vec<IncomingMessage>, TransportError> {
        let updates = self
            .transport
            .get_updates(self.offset, self.poll_timeout)
            .await?;
        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset = Some(last + 1);
        }
        debug!(count = updates.len(), offset = ?self.offset, "updates received");
        Ok(updates.into_iter().filter_map(|u| u.into_incoming()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MessageKind;

    #[tokio::test]
    async fn offset_advances_past_last_update() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/botT/getUpdates")
            .with_body(r#"{"ok":true,"result":[
                {"update_id":5,"message":{"message_id":1,"from":{"id":1},"chat":{"id":1},"text":"a"}},
                {"update_id":6,"edited_message":{}},
                {"update_id":7,"message":{"message_id":2,"from":{"id":2},"chat":{"id":2},"text":"b"}}
            ]}"#)
            .create_async()
            .await;

        let transport = Arc::new(
            TelegramTransport::new("T", server.url(), Duration::from_secs(5)).unwrap(),
        );
        let mut poller = UpdatePoller::new(transport, Duration::from_secs(0));
        let batch = poller.next_batch().await.unwrap();

        assert_eq!(poller.offset(), Some(8));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].kind, MessageKind::Text("b".into()));
    }
}
