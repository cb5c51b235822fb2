//! Telegram Bot API adapter: the production [`MessagingClient`]
//! implementation and the long-poll inbound stream.
//!
//! [`MessagingClient`]: reactor_engine::client::MessagingClient

pub mod api;
pub mod client;
pub mod updates;

pub use client::TelegramClient;
pub use updates::UpdatePoller;
