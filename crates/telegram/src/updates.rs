//! Long-poll update stream over the monitored feed.
//!
//! Wraps `getUpdates` and flattens matching messages to plain text. The
//! poller hands back one batch at a time; the caller processes it
//! sequentially before polling again, so at most one message is ever in
//! flight through the engine.

use crate::api::Message;
use crate::client::TelegramClient;

/// Pulls updates and keeps the `getUpdates` offset.
pub struct UpdatePoller<'a> {
    client: &'a TelegramClient,
    monitor_channel: String,
    offset: i64,
}

impl<'a> UpdatePoller<'a> {
    /// `monitor_channel` is a public username (with or without `@`) or a
    /// numeric chat id, matching the `MONITOR_CHANNEL` configuration.
    pub fn new(client: &'a TelegramClient, monitor_channel: &str) -> Self {
        Self {
            client,
            monitor_channel: monitor_channel.trim_start_matches('@').to_string(),
            offset: 0,
        }
    }

    /// One long-poll round: the flattened texts of all new messages from
    /// the monitored feed, oldest first.
    pub async fn poll_once(&mut self) -> anyhow::Result<Vec<String>> {
        let updates = self.client.get_updates(self.offset).await?;

        let mut texts = Vec::new();
        for update in &updates {
            self.offset = self.offset.max(update.update_id + 1);
            let Some(message) = update.content() else {
                continue;
            };
            if !self.is_monitored(message) {
                continue;
            }
            if let Some(text) = message.plain_text() {
                texts.push(text.to_string());
            }
        }
        Ok(texts)
    }

    fn is_monitored(&self, message: &Message) -> bool {
        if message.chat.id.to_string() == self.monitor_channel {
            return true;
        }
        message
            .chat
            .username
            .as_deref()
            .is_some_and(|u| u.eq_ignore_ascii_case(&self.monitor_channel))
    }
}
