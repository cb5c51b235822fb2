//! Per-message processing pipeline.
//!
//! For each inbound notification text:
//! 1. Cooldown gate (global scope gates before any parsing at all)
//! 2. Parse provenance (via `parser`)
//! 3. Per-channel cooldown gate, when that scope is configured
//! 4. Match configured keywords (via `KeywordRegistry`)
//! 5. Dispatch every matched keyword within the same cycle
//! 6. Start a cooldown from the maximum duration the outcomes imply
//!
//! The processor is the single consumer of the inbound stream: it takes
//! `&mut self` and nothing else touches the cooldown tracker or dedup store,
//! which keeps their check-then-act sequences serialized by construction.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use reactor_common::config::{CooldownDurations, CooldownScope};
use reactor_common::types::Outcome;

use crate::client::{MessagingClient, StickerCache};
use crate::cooldown::CooldownTracker;
use crate::dedup::DedupStore;
use crate::dispatcher::ActionDispatcher;
use crate::filter::UserFilter;
use crate::matcher::KeywordRegistry;
use crate::parser;

/// What one inbound message produced, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// The message was dropped by a cooldown gate before matching.
    pub dropped: bool,
    /// Outcome per dispatched keyword, in registry order.
    pub outcomes: Vec<(String, Outcome)>,
}

impl CycleReport {
    fn dropped() -> Self {
        Self {
            dropped: true,
            outcomes: Vec::new(),
        }
    }
}

/// Central processor that orchestrates the reaction pipeline.
pub struct Processor {
    client: Arc<dyn MessagingClient>,
    registry: KeywordRegistry,
    dispatcher: ActionDispatcher,
    dedup: DedupStore,
    cooldown: CooldownTracker,
    stickers: StickerCache,
    durations: CooldownDurations,
}

impl Processor {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        registry: KeywordRegistry,
        filter: UserFilter,
        dedup: DedupStore,
        scope: CooldownScope,
        durations: CooldownDurations,
    ) -> Self {
        Self {
            client: client.clone(),
            registry,
            dispatcher: ActionDispatcher::new(client, filter),
            dedup,
            cooldown: CooldownTracker::new(scope),
            stickers: StickerCache::new(),
            durations,
        }
    }

    /// Resolve every configured sticker once so the first reaction does not
    /// pay the lookup latency. Failures are logged and retried lazily later.
    pub async fn preload_stickers(&mut self) {
        let refs: Vec<_> = self
            .registry
            .entries()
            .filter_map(|e| e.action.sticker().cloned())
            .collect();
        for sticker in refs {
            self.stickers.get(self.client.as_ref(), &sticker).await;
        }
        tracing::info!(cached = self.stickers.cached_count(), "Stickers preloaded");
    }

    /// Process one inbound notification text.
    pub async fn process(&mut self, raw_text: &str) -> CycleReport {
        self.process_at(raw_text, Utc::now()).await
    }

    /// Process with an explicit clock, for tests.
    pub async fn process_at(&mut self, raw_text: &str, now: DateTime<Utc>) -> CycleReport {
        // Global scope suppresses before the parser even runs.
        if self.cooldown.scope() == CooldownScope::Global && self.cooldown.suppressed(None, now) {
            return CycleReport::dropped();
        }

        let event = parser::parse(raw_text);
        let channel = event.source_channel.clone();

        // Per-channel scope needs the parsed origin for its key, so its gate
        // sits between parsing and matching.
        if self.cooldown.scope() == CooldownScope::PerChannel
            && self.cooldown.suppressed(channel.as_ref(), now)
        {
            return CycleReport::dropped();
        }

        let matched: Vec<String> = self
            .registry
            .matches(raw_text)
            .into_iter()
            .map(String::from)
            .collect();
        if matched.is_empty() {
            return CycleReport {
                dropped: false,
                outcomes: Vec::new(),
            };
        }

        tracing::info!(keywords = ?matched, ?event, "Notification matched");

        let mut outcomes = Vec::with_capacity(matched.len());
        for keyword in &matched {
            let Some(action) = self.registry.action(keyword) else {
                continue;
            };
            let outcome = self
                .dispatcher
                .dispatch(keyword, action, &event, &mut self.dedup, &mut self.stickers)
                .await;
            outcomes.push((keyword.clone(), outcome));
        }

        // One transition per cycle: the longest window any outcome implies.
        // All-Skip cycles leave the tracker idle.
        let duration = outcomes
            .iter()
            .filter_map(|(_, o)| self.durations.for_outcome(*o))
            .max();
        if let Some(duration) = duration {
            self.cooldown.trigger(channel.as_ref(), duration, now);
        }

        CycleReport {
            dropped: false,
            outcomes,
        }
    }

    /// Number of users recorded as contacted (for monitoring).
    pub fn interacted_count(&self) -> usize {
        self.dedup.len()
    }
}
