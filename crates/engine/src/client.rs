//! Messaging-client seam and sticker-asset cache.
//!
//! The engine never talks to the chat platform directly; everything effectful
//! goes through the [`MessagingClient`] trait. The production implementation
//! lives in the `reactor-telegram` crate; tests plug in a recording mock.

use std::collections::HashMap;

use async_trait::async_trait;

use reactor_common::types::{ChannelRef, Identity, SendTarget, StickerRef};

/// Opaque handle to a resolved sticker asset, as understood by the client's
/// send methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHandle(pub String);

/// Narrow interface onto the chat platform.
///
/// `Ok(None)` means a clean not-found; `Err` means the call itself failed
/// (network, auth, rate limit). Callers convert both into outcomes — no
/// external failure is allowed to escape a processing cycle.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Resolve a sticker inside a named pack to a sendable asset.
    async fn resolve_sticker(&self, pack: &str, index: usize)
    -> anyhow::Result<Option<AssetHandle>>;

    /// Resolve a username to a full identity via the external directory.
    async fn resolve_identity(&self, username: &str) -> anyhow::Result<Option<Identity>>;

    /// Fetch the profile of a user already known by id.
    async fn profile(&self, user_id: i64) -> anyhow::Result<Option<Identity>>;

    /// Fetch an origin message and return its sender's user id.
    async fn fetch_message(
        &self,
        channel: &ChannelRef,
        message_id: i64,
    ) -> anyhow::Result<Option<i64>>;

    /// Send a sticker asset, optionally threaded onto a message.
    async fn send_file(
        &self,
        target: &SendTarget,
        asset: &AssetHandle,
        reply_to: Option<i64>,
    ) -> anyhow::Result<()>;

    /// Send plain text, optionally threaded onto a message.
    async fn send_text(
        &self,
        target: &SendTarget,
        text: &str,
        reply_to: Option<i64>,
    ) -> anyhow::Result<()>;
}

/// In-memory sticker cache keyed by (pack, index).
///
/// Populated lazily on first use, retained for the process lifetime, never
/// invalidated. A failed or not-found resolution is logged and yields `None`;
/// the action then proceeds without its sticker.
pub struct StickerCache {
    assets: HashMap<(String, usize), AssetHandle>,
}

impl StickerCache {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Get a sticker asset, resolving through the client on a cache miss.
    pub async fn get(
        &mut self,
        client: &dyn MessagingClient,
        sticker: &StickerRef,
    ) -> Option<AssetHandle> {
        let key = (sticker.pack.clone(), sticker.index);
        if let Some(asset) = self.assets.get(&key) {
            return Some(asset.clone());
        }

        match client.resolve_sticker(&sticker.pack, sticker.index).await {
            Ok(Some(asset)) => {
                tracing::info!(pack = %sticker.pack, index = sticker.index, "Sticker resolved");
                self.assets.insert(key, asset.clone());
                Some(asset)
            }
            Ok(None) => {
                tracing::error!(
                    pack = %sticker.pack,
                    index = sticker.index,
                    "Sticker not found in pack"
                );
                None
            }
            Err(e) => {
                tracing::error!(
                    pack = %sticker.pack,
                    index = sticker.index,
                    error = %e,
                    "Sticker resolution failed"
                );
                None
            }
        }
    }

    /// Number of cached assets (for monitoring).
    pub fn cached_count(&self) -> usize {
        self.assets.len()
    }
}

impl Default for StickerCache {
    fn default() -> Self {
        Self::new()
    }
}
