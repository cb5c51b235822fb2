//! Sender-eligibility filter — heuristically excludes recipients that should
//! not be contacted directly.
//!
//! The rules are evaluated in order and short-circuit on the first hit:
//! 1. user id below the configured floor (very small ids belong to
//!    long-registered accounts that are not the campaign's targets),
//! 2. the directory flags the account as automated,
//! 3. any profile text field contains the substring "bot".
//!
//! The filter itself is pure: the dispatcher performs the profile lookup and
//! passes `None` when it failed, in which case rules 2–3 fail open — a
//! directory outage must not silently suppress all direct contact forever.

use reactor_common::types::{FilterVerdict, Identity};

const BOT_MARKER: &str = "bot";

/// Eligibility filter with a configurable user-id floor.
pub struct UserFilter {
    user_id_floor: i64,
}

impl UserFilter {
    pub fn new(user_id_floor: i64) -> Self {
        Self { user_id_floor }
    }

    /// Decide whether a resolved target should be excluded from direct
    /// contact. `profile` is `None` when the lookup failed.
    pub fn should_filter(&self, user_id: i64, profile: Option<&Identity>) -> FilterVerdict {
        if user_id < self.user_id_floor {
            return FilterVerdict::filtered(format!(
                "user id {user_id} below floor {}",
                self.user_id_floor
            ));
        }

        let Some(identity) = profile else {
            tracing::warn!(user_id, "Profile unavailable, eligibility filter fails open");
            return FilterVerdict::pass();
        };

        if identity.is_automated {
            return FilterVerdict::filtered("directory flags account as automated");
        }

        let fields = [
            ("display name", identity.display_name.as_deref()),
            ("secondary name", identity.secondary_name.as_deref()),
            ("about", identity.about.as_deref()),
        ];
        for (field, value) in fields {
            if let Some(value) = value
                && value.to_lowercase().contains(BOT_MARKER)
            {
                return FilterVerdict::filtered(format!("{field} contains 'bot': {value}"));
            }
        }

        FilterVerdict::pass()
    }
}
