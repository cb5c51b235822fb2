//! Minimal Telegram Bot API wire types — only the fields the adapter reads.

use serde::Deserialize;

/// Standard Bot API response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub username: Option<String>,
    /// Present for private chats and users.
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Present for channels and groups.
    pub title: Option<String>,
    /// Profile "about" text, present on private chats.
    pub bio: Option<String>,
    /// Channel/group description.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub caption: Option<String>,
}

impl Message {
    /// Flatten the message to plain text: body first, caption as fallback.
    pub fn plain_text(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub channel_post: Option<Message>,
}

impl Update {
    /// The carried message, whether posted in a channel or a group.
    pub fn content(&self) -> Option<&Message> {
        self.channel_post.as_ref().or(self.message.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sticker {
    pub file_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StickerSet {
    pub name: String,
    pub stickers: Vec<Sticker>,
}
