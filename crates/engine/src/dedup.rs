//! Dedup store — durable record of users already contacted once.
//!
//! Backing format is a flat JSON object mapping string-encoded user ids to
//! `true`, rewritten in full on every mutation (the set is small, no append
//! log needed). A write goes to a temp file first and is renamed into place
//! so a crash mid-flush never leaves a truncated store behind.
//!
//! A missing or corrupt file is never fatal: the store starts empty and logs
//! a warning. Likewise a failed flush is logged loudly but the in-memory set
//! stays authoritative for the rest of the process.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use reactor_common::error::ReactorError;

const TEMP_FILE_SUFFIX: &str = ".tmp";

/// Persisted set of user ids that have ever received a direct message.
pub struct DedupStore {
    path: PathBuf,
    users: HashSet<i64>,
}

impl DedupStore {
    /// Load the store from disk, starting empty on any read/parse failure.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let users = match Self::read_file(&path) {
            Ok(users) => {
                tracing::info!(path = %path.display(), count = users.len(), "Dedup store loaded");
                users
            }
            Err(e) => {
                if path.exists() {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to load dedup store, starting empty"
                    );
                }
                HashSet::new()
            }
        };
        Self { path, users }
    }

    fn read_file(path: &Path) -> Result<HashSet<i64>, ReactorError> {
        let raw = std::fs::read_to_string(path)?;
        let map: BTreeMap<String, bool> = serde_json::from_str(&raw)?;
        Ok(map.keys().filter_map(|k| k.parse().ok()).collect())
    }

    /// Whether this user has already been contacted.
    pub fn contains(&self, user_id: i64) -> bool {
        self.users.contains(&user_id)
    }

    /// Record a user as contacted. Idempotent; returns `true` on first add.
    pub fn add(&mut self, user_id: i64) -> bool {
        self.users.insert(user_id)
    }

    /// Rewrite the backing file synchronously.
    ///
    /// Must complete (or fail loudly) before the dispatch that mutated the
    /// set is considered final, so at-most-once-per-user holds across a
    /// crash immediately after a send.
    pub fn flush(&self) -> Result<(), ReactorError> {
        let map: BTreeMap<String, bool> = self.users.iter().map(|id| (id.to_string(), true)).collect();
        let raw = serde_json::to_string_pretty(&map)?;

        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(TEMP_FILE_SUFFIX);
        let temp_path = PathBuf::from(temp_path);
        std::fs::write(&temp_path, raw)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
