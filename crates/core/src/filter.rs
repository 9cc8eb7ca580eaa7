//! Relevance filter for catalog entries.
//!
//! The pattern is policy data shipped in `assets/relevance_pattern.txt`: an
//! allow-list of Polish release-group tags (ASCII word boundaries, case
//! insensitive) plus Polish diacritics anywhere in the title. It is applied
//! as-is and never derived at runtime.

use regex::Regex;
use tracing::debug;

use crate::catalog::RawCatalogEntry;

/// Built-in relevance pattern.
pub const RELEVANCE_PATTERN: &str = include_str!("../assets/relevance_pattern.txt");

/// Keeps entries with a title and hash whose title matches the pattern.
#[derive(Debug, Clone)]
pub struct ResultFilter {
    pattern: Regex,
}

impl ResultFilter {
    /// Build a filter from a custom pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern.trim())?,
        })
    }

    /// Whether a single entry passes.
    pub fn accepts(&self, entry: &RawCatalogEntry) -> bool {
        match (entry.title.as_deref(), entry.hash.as_deref()) {
            (Some(title), Some(hash)) if !title.is_empty() && !hash.is_empty() => {
                self.pattern.is_match(title)
            }
            _ => false,
        }
    }

    pub fn apply(&self, entries: Vec<RawCatalogEntry>) -> Vec<RawCatalogEntry> {
        let before = entries.len();
        let kept: Vec<_> = entries.into_iter().filter(|e| self.accepts(e)).collect();
        debug!(kept = kept.len(), total = before, "Relevance filter applied");
        kept
    }
}

impl Default for ResultFilter {
    fn default() -> Self {
        Self {
            pattern: Regex::new(RELEVANCE_PATTERN.trim())
                .expect("built-in relevance pattern must compile"),
        }
    }
}
