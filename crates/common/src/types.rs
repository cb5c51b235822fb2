use serde::{Deserialize, Serialize};

/// Marker prepended to a private-channel internal id to rebuild the full
/// channel identifier (`t.me/c/1234/56` refers to channel `-1001234`).
pub const PRIVATE_CHANNEL_MARKER: &str = "-100";

/// Reference to an origin conversation: a full numeric id for private
/// channels, a public username otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelRef {
    Id(i64),
    Name(String),
}

impl ChannelRef {
    /// Rebuild a full private-channel id from the bare digits captured out
    /// of a `t.me/c/<N>/<M>` link.
    pub fn from_private_internal_id(digits: &str) -> Option<Self> {
        format!("{PRIVATE_CHANNEL_MARKER}{digits}")
            .parse::<i64>()
            .ok()
            .map(ChannelRef::Id)
    }
}

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelRef::Id(id) => write!(f, "{id}"),
            ChannelRef::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Provenance extracted from one notification message. Every field is
/// independently optional; a missing field only disables the dispatch paths
/// that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationEvent {
    pub source_channel: Option<ChannelRef>,
    pub source_message_id: Option<i64>,
    /// The quoted phrase reported by the feed. Informational only — keyword
    /// matching runs independently over the raw text.
    pub keyword: Option<String>,
    pub sender_username: Option<String>,
    pub sender_id: Option<i64>,
}

/// A sticker inside a named pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerRef {
    pub pack: String,
    pub index: usize,
}

/// What to do when a keyword fires. Each kind carries only the content
/// relevant to it; both pieces are optional and an action with neither has
/// no observable effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Reply in the origin conversation, threaded onto the origin message.
    Reply {
        #[serde(default)]
        sticker: Option<StickerRef>,
        #[serde(default)]
        text: Option<String>,
    },
    /// Contact the sender privately, at most once per user ever.
    DirectMessage {
        #[serde(default)]
        sticker: Option<StickerRef>,
        #[serde(default)]
        text: Option<String>,
    },
}

impl ActionKind {
    pub fn sticker(&self) -> Option<&StickerRef> {
        match self {
            ActionKind::Reply { sticker, .. } | ActionKind::DirectMessage { sticker, .. } => {
                sticker.as_ref()
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ActionKind::Reply { text, .. } | ActionKind::DirectMessage { text, .. } => {
                text.as_deref()
            }
        }
    }
}

/// One configured keyword → action binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordAction {
    pub keyword: String,
    pub action: ActionKind,
}

/// Result of dispatching one keyword action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every configured send went through (or nothing was configured).
    Success,
    /// The platform was contacted but a send failed.
    SendError,
    /// Target identity could not be resolved at all.
    FetchError,
    /// Filtered, already contacted, or missing provenance. Expected and
    /// frequent; never advances the cooldown.
    Skip,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::SendError => write!(f, "send_error"),
            Outcome::FetchError => write!(f, "fetch_error"),
            Outcome::Skip => write!(f, "skip"),
        }
    }
}

/// Advisory result of the sender-eligibility filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterVerdict {
    pub filtered: bool,
    pub reason: String,
}

impl FilterVerdict {
    pub fn pass() -> Self {
        Self {
            filtered: false,
            reason: String::new(),
        }
    }

    pub fn filtered(reason: impl Into<String>) -> Self {
        Self {
            filtered: true,
            reason: reason.into(),
        }
    }
}

/// Resolved profile of a direct-message target, as reported by the external
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub secondary_name: Option<String>,
    pub about: Option<String>,
    /// Whether the directory flags this account as automated.
    pub is_automated: bool,
}

/// Where an outbound send is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendTarget {
    Channel(ChannelRef),
    User(i64),
}

impl std::fmt::Display for SendTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendTarget::Channel(c) => write!(f, "channel {c}"),
            SendTarget::User(id) => write!(f, "user {id}"),
        }
    }
}
