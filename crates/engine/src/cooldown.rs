//! Cooldown policy — time-windowed throttle over notification processing.
//!
//! After a processing cycle produces a throttling outcome, the covered scope
//! enters a cooldown window during which inbound notifications are dropped
//! outright. There is no timer task: expiry is a pure time check performed
//! at the top of the next inbound message.
//!
//! State is held in-memory per scope key. If the process restarts the
//! cooldown resets, which only risks one extra reaction, not a duplicate
//! contact (the dedup store is the durable guard).

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use reactor_common::config::CooldownScope;
use reactor_common::types::ChannelRef;

/// Scope key a cooldown timer is held under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CooldownKey {
    Global,
    Channel(ChannelRef),
}

/// One active cooldown window.
#[derive(Debug, Clone)]
struct CooldownState {
    last_trigger_at: DateTime<Utc>,
    active_duration: Duration,
}

impl CooldownState {
    fn expired(&self, now: DateTime<Utc>) -> bool {
        match (now - self.last_trigger_at).to_std() {
            Ok(elapsed) => elapsed >= self.active_duration,
            // `now` earlier than the trigger means the clock moved backwards;
            // treat the window as still active.
            Err(_) => false,
        }
    }
}

/// In-memory cooldown tracker, global or keyed by origin channel.
pub struct CooldownTracker {
    scope: CooldownScope,
    timers: HashMap<CooldownKey, CooldownState>,
}

impl CooldownTracker {
    pub fn new(scope: CooldownScope) -> Self {
        Self {
            scope,
            timers: HashMap::new(),
        }
    }

    pub fn scope(&self) -> CooldownScope {
        self.scope
    }

    fn key_for(&self, channel: Option<&ChannelRef>) -> CooldownKey {
        match (self.scope, channel) {
            (CooldownScope::Global, _) | (CooldownScope::PerChannel, None) => CooldownKey::Global,
            (CooldownScope::PerChannel, Some(c)) => CooldownKey::Channel(c.clone()),
        }
    }

    /// Whether the scope covering `channel` is currently cooling.
    ///
    /// Expired windows are dropped here; Cooling → Idle has no explicit
    /// event.
    pub fn suppressed(&mut self, channel: Option<&ChannelRef>, now: DateTime<Utc>) -> bool {
        let key = self.key_for(channel);
        let Some(state) = self.timers.get(&key) else {
            return false;
        };

        if state.expired(now) {
            self.timers.remove(&key);
            return false;
        }

        let remaining = self
            .active_remaining(state, now)
            .unwrap_or(state.active_duration);
        tracing::info!(
            key = ?key,
            remaining_secs = remaining.as_secs(),
            "Notification suppressed — scope in cooldown"
        );
        true
    }

    /// Start (or restart) a cooldown window for the scope covering `channel`.
    pub fn trigger(&mut self, channel: Option<&ChannelRef>, duration: Duration, now: DateTime<Utc>) {
        let key = self.key_for(channel);
        tracing::info!(
            key = ?key,
            duration_secs = duration.as_secs(),
            "Cooldown started"
        );
        self.timers.insert(
            key,
            CooldownState {
                last_trigger_at: now,
                active_duration: duration,
            },
        );
    }

    /// Number of scopes with a recorded window (for monitoring).
    pub fn tracked_count(&self) -> usize {
        self.timers.len()
    }

    fn active_remaining(&self, state: &CooldownState, now: DateTime<Utc>) -> Option<Duration> {
        let elapsed = (now - state.last_trigger_at).to_std().ok()?;
        state.active_duration.checked_sub(elapsed)
    }
}
