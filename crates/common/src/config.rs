use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ReactorError;
use crate::types::{KeywordAction, Outcome};

/// Which scope a cooldown timer covers.
///
/// `Global` holds one timer for the whole process and lets the event loop
/// drop messages before they are even parsed. `PerChannel` keys timers by
/// origin channel so independent conversations do not starve each other; the
/// gate then runs right after parsing, since the key comes from the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CooldownScope {
    #[default]
    Global,
    PerChannel,
}

impl std::str::FromStr for CooldownScope {
    type Err = ReactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" => Ok(CooldownScope::Global),
            "per_channel" | "per-channel" => Ok(CooldownScope::PerChannel),
            other => Err(ReactorError::Config(format!(
                "COOLDOWN_SCOPE must be 'global' or 'per_channel', got '{other}'"
            ))),
        }
    }
}

/// Outcome → cooldown duration policy.
///
/// Success and SendError share the long bucket: both mean the platform was
/// actually contacted (or an attempt was made) and repeated attempts must be
/// throttled equally. FetchError gets a shorter window so an identity-lookup
/// outage is retried sooner. Skip never starts a cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownDurations {
    pub medium: Duration,
    pub long: Duration,
}

impl CooldownDurations {
    pub fn for_outcome(&self, outcome: Outcome) -> Option<Duration> {
        match outcome {
            Outcome::Success | Outcome::SendError => Some(self.long),
            Outcome::FetchError => Some(self.medium),
            Outcome::Skip => None,
        }
    }
}

impl Default for CooldownDurations {
    fn default() -> Self {
        Self {
            medium: Duration::from_secs(600),
            long: Duration::from_secs(3600),
        }
    }
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token
    pub telegram_bot_token: String,

    /// The monitored feed: public username or numeric chat id
    pub monitor_channel: String,

    /// Path to the keyword → action registry (JSON array)
    pub keyword_actions_file: PathBuf,

    /// Path to the interacted-users dedup file
    pub interacted_file: PathBuf,

    /// Cooldown timer scope (default: global)
    pub cooldown_scope: CooldownScope,

    /// Cooldown durations per outcome bucket
    pub cooldown: CooldownDurations,

    /// User ids strictly below this floor are never contacted directly
    /// (default: 0, i.e. disabled)
    pub user_id_floor: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
                anyhow::anyhow!("TELEGRAM_BOT_TOKEN environment variable is required")
            })?,
            monitor_channel: std::env::var("MONITOR_CHANNEL")
                .map_err(|_| anyhow::anyhow!("MONITOR_CHANNEL environment variable is required"))?,
            keyword_actions_file: std::env::var("KEYWORD_ACTIONS_FILE")
                .unwrap_or_else(|_| "keyword_actions.json".to_string())
                .into(),
            interacted_file: std::env::var("INTERACTED_FILE")
                .unwrap_or_else(|_| "interacted_users.json".to_string())
                .into(),
            cooldown_scope: std::env::var("COOLDOWN_SCOPE")
                .unwrap_or_else(|_| "global".to_string())
                .parse()?,
            cooldown: CooldownDurations {
                medium: Duration::from_secs(
                    std::env::var("COOLDOWN_MEDIUM_SECONDS")
                        .unwrap_or_else(|_| "600".to_string())
                        .parse()
                        .map_err(|_| {
                            anyhow::anyhow!("COOLDOWN_MEDIUM_SECONDS must be a valid u64")
                        })?,
                ),
                long: Duration::from_secs(
                    std::env::var("COOLDOWN_LONG_SECONDS")
                        .unwrap_or_else(|_| "3600".to_string())
                        .parse()
                        .map_err(|_| anyhow::anyhow!("COOLDOWN_LONG_SECONDS must be a valid u64"))?,
                ),
            },
            user_id_floor: std::env::var("USER_ID_FLOOR")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("USER_ID_FLOOR must be a valid i64"))?,
        })
    }
}

/// Load the keyword → action registry from a JSON file.
///
/// The file is a JSON array of `{ keyword, action }` entries; order is
/// preserved and becomes the registry's matching order.
pub fn load_keyword_actions(path: &Path) -> Result<Vec<KeywordAction>, ReactorError> {
    let raw = std::fs::read_to_string(path)?;
    let actions: Vec<KeywordAction> = serde_json::from_str(&raw)?;
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cooldown_scope_parses() {
        assert_eq!(
            "global".parse::<CooldownScope>().unwrap(),
            CooldownScope::Global
        );
        assert_eq!(
            "per_channel".parse::<CooldownScope>().unwrap(),
            CooldownScope::PerChannel
        );
        assert!("hourly".parse::<CooldownScope>().is_err());
    }

    #[test]
    fn test_duration_mapping() {
        let durations = CooldownDurations::default();
        assert_eq!(
            durations.for_outcome(Outcome::Success),
            Some(durations.long)
        );
        assert_eq!(
            durations.for_outcome(Outcome::SendError),
            Some(durations.long)
        );
        assert_eq!(
            durations.for_outcome(Outcome::FetchError),
            Some(durations.medium)
        );
        assert_eq!(durations.for_outcome(Outcome::Skip), None);
    }

    #[test]
    fn test_load_keyword_actions() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{ "keyword": "naive", "action": {{ "kind": "direct_message", "text": "hi" }} }},
                {{ "keyword": "三色图", "action": {{ "kind": "reply", "sticker": {{ "pack": "fuckgfwnewbie", "index": 0 }} }} }}
            ]"#
        )
        .unwrap();

        let actions = load_keyword_actions(file.path()).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].keyword, "naive");
        assert!(matches!(
            actions[1].action,
            crate::types::ActionKind::Reply { .. }
        ));
    }

    #[test]
    fn test_load_keyword_actions_missing_file() {
        let err = load_keyword_actions(Path::new("/nonexistent/actions.json")).unwrap_err();
        assert!(matches!(err, ReactorError::Persistence(_)));
    }
}
