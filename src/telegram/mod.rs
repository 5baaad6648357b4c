//! Telegram Bot API transport: `getUpdates` long polling, `getFile`
//! downloads and `sendMessage` replies.

mod client;
mod poller;
pub mod types;

pub use client::{TelegramTransport, DEFAULT_API_URL};
pub use poller::UpdatePoller;
