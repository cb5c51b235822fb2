//! Action dispatcher — decides and executes the reply / direct-message
//! action for one triggered keyword, folding every external failure into an
//! [`Outcome`].
//!
//! Nothing here advances the cooldown; the processor maps the collected
//! outcomes of a whole cycle onto a single cooldown transition.

use std::sync::Arc;

use reactor_common::types::{
    ActionKind, Identity, NotificationEvent, Outcome, SendTarget, StickerRef,
};

use crate::client::{AssetHandle, MessagingClient, StickerCache};
use crate::dedup::DedupStore;
use crate::filter::UserFilter;

/// Executes keyword actions against the messaging client.
pub struct ActionDispatcher {
    client: Arc<dyn MessagingClient>,
    filter: UserFilter,
}

impl ActionDispatcher {
    pub fn new(client: Arc<dyn MessagingClient>, filter: UserFilter) -> Self {
        Self { client, filter }
    }

    /// Dispatch one keyword action for one parsed event.
    pub async fn dispatch(
        &self,
        keyword: &str,
        action: &ActionKind,
        event: &NotificationEvent,
        dedup: &mut DedupStore,
        stickers: &mut StickerCache,
    ) -> Outcome {
        let outcome = match action {
            ActionKind::Reply { sticker, text } => {
                self.dispatch_reply(event, sticker.as_ref(), text.as_deref(), stickers)
                    .await
            }
            ActionKind::DirectMessage { sticker, text } => {
                self.dispatch_direct_message(
                    event,
                    sticker.as_ref(),
                    text.as_deref(),
                    dedup,
                    stickers,
                )
                .await
            }
        };

        tracing::info!(keyword, outcome = %outcome, "Keyword action dispatched");
        outcome
    }

    /// Reply in the origin conversation, threaded onto the origin message.
    ///
    /// Missing provenance is a Skip: without an origin there is nowhere to
    /// reply, and treating it as success would start an unearned cooldown.
    async fn dispatch_reply(
        &self,
        event: &NotificationEvent,
        sticker: Option<&StickerRef>,
        text: Option<&str>,
        stickers: &mut StickerCache,
    ) -> Outcome {
        let (Some(channel), Some(message_id)) = (&event.source_channel, event.source_message_id)
        else {
            tracing::info!("Reply action without origin channel/message id, skipping");
            return Outcome::Skip;
        };

        let target = SendTarget::Channel(channel.clone());
        let asset = self.resolve_optional_sticker(sticker, stickers).await;

        self.send_contents(&target, asset.as_ref(), text, Some(message_id))
            .await
    }

    /// Contact the sender privately: resolve identity, gate, send, record.
    async fn dispatch_direct_message(
        &self,
        event: &NotificationEvent,
        sticker: Option<&StickerRef>,
        text: Option<&str>,
        dedup: &mut DedupStore,
        stickers: &mut StickerCache,
    ) -> Outcome {
        let Some((user_id, profile)) = self.resolve_target(event).await else {
            tracing::warn!("Could not resolve a direct-message target");
            return Outcome::FetchError;
        };

        let verdict = self.filter.should_filter(user_id, profile.as_ref());
        if verdict.filtered {
            tracing::info!(user_id, reason = %verdict.reason, "Target filtered, skipping");
            return Outcome::Skip;
        }

        if dedup.contains(user_id) {
            tracing::info!(user_id, "Already interacted with user, skipping");
            return Outcome::Skip;
        }

        let target = SendTarget::User(user_id);
        let asset = self.resolve_optional_sticker(sticker, stickers).await;

        // Direct messages are not threaded.
        let outcome = self.send_contents(&target, asset.as_ref(), text, None).await;
        if outcome != Outcome::Success {
            return outcome;
        }

        dedup.add(user_id);
        if let Err(e) = dedup.flush() {
            tracing::error!(user_id, error = %e, "Failed to persist interacted-user set");
        }
        Outcome::Success
    }

    /// Resolve the direct-message target: username first, origin-message
    /// fetch as fallback. Returns the user id plus the profile when one came
    /// with the resolution (the filter fails open without one).
    async fn resolve_target(&self, event: &NotificationEvent) -> Option<(i64, Option<Identity>)> {
        if let Some(username) = &event.sender_username {
            match self.client.resolve_identity(username).await {
                Ok(Some(identity)) => {
                    tracing::info!(
                        %username,
                        user_id = identity.user_id,
                        "Target resolved by username"
                    );
                    return Some((identity.user_id, Some(identity)));
                }
                Ok(None) => {
                    tracing::warn!(%username, "Username not known to the directory");
                }
                Err(e) => {
                    tracing::warn!(%username, error = %e, "Username resolution failed");
                }
            }
        }

        let (channel, message_id) = (event.source_channel.as_ref()?, event.source_message_id?);
        match self.client.fetch_message(channel, message_id).await {
            Ok(Some(user_id)) => {
                tracing::info!(%channel, message_id, user_id, "Target resolved from origin message");
                let profile = self.lookup_profile(user_id).await;
                Some((user_id, profile))
            }
            Ok(None) => {
                tracing::warn!(%channel, message_id, "Origin message has no resolvable sender");
                None
            }
            Err(e) => {
                tracing::warn!(%channel, message_id, error = %e, "Origin message fetch failed");
                None
            }
        }
    }

    async fn lookup_profile(&self, user_id: i64) -> Option<Identity> {
        match self.client.profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Profile lookup failed");
                None
            }
        }
    }

    async fn resolve_optional_sticker(
        &self,
        sticker: Option<&StickerRef>,
        stickers: &mut StickerCache,
    ) -> Option<AssetHandle> {
        let sticker = sticker?;
        stickers.get(self.client.as_ref(), sticker).await
    }

    /// Send the optional sticker then the optional text. Each send is
    /// attempted independently; any failure makes the outcome SendError.
    async fn send_contents(
        &self,
        target: &SendTarget,
        asset: Option<&AssetHandle>,
        text: Option<&str>,
        reply_to: Option<i64>,
    ) -> Outcome {
        let mut failed = false;

        if let Some(asset) = asset
            && let Err(e) = self.client.send_file(target, asset, reply_to).await
        {
            tracing::error!(%target, error = %e, "Sticker send failed");
            failed = true;
        }

        if let Some(text) = text
            && let Err(e) = self.client.send_text(target, text, reply_to).await
        {
            tracing::error!(%target, error = %e, "Text send failed");
            failed = true;
        }

        if failed {
            Outcome::SendError
        } else {
            Outcome::Success
        }
    }
}
