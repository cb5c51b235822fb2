//! Keyword matcher — finds which configured keywords occur in a message.
//!
//! Matching is case-insensitive substring containment, evaluated in registry
//! insertion order. Registries are small, so a linear scan beats any index
//! structure. Matching one keyword never prevents matching another in the
//! same message.

use reactor_common::error::ReactorError;
use reactor_common::types::{ActionKind, KeywordAction};

/// Ordered keyword → action registry.
pub struct KeywordRegistry {
    entries: Vec<KeywordAction>,
}

impl KeywordRegistry {
    /// Build a registry, rejecting duplicate keywords (case-insensitive).
    pub fn new(entries: Vec<KeywordAction>) -> Result<Self, ReactorError> {
        let mut seen: Vec<String> = Vec::with_capacity(entries.len());
        for entry in &entries {
            let folded = entry.keyword.to_lowercase();
            if seen.contains(&folded) {
                return Err(ReactorError::Config(format!(
                    "duplicate keyword '{}' in registry",
                    entry.keyword
                )));
            }
            seen.push(folded);
        }
        Ok(Self { entries })
    }

    /// All keywords contained in `text`, in registry order.
    pub fn matches(&self, text: &str) -> Vec<&str> {
        if text.is_empty() {
            return Vec::new();
        }
        let lower = text.to_lowercase();
        self.entries
            .iter()
            .filter(|e| lower.contains(&e.keyword.to_lowercase()))
            .map(|e| e.keyword.as_str())
            .collect()
    }

    /// Look up the action configured for a keyword.
    pub fn action(&self, keyword: &str) -> Option<&ActionKind> {
        self.entries
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| &e.action)
    }

    /// Iterate over all configured entries, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &KeywordAction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
