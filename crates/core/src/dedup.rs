//! Hash-based deduplication of catalog entries.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::RawCatalogEntry;

/// Keep the first entry for each info hash, preserving order.
///
/// Hashes are compared exactly as received: `ABC` and `abc` are distinct.
/// Entries without a hash never reach this stage (the relevance filter
/// drops them) and are passed through untouched if they do.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator;

impl Deduplicator {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, entries: Vec<RawCatalogEntry>) -> Vec<RawCatalogEntry> {
        let before = entries.len();
        let mut seen: HashSet<String> = HashSet::with_capacity(before);

        let unique: Vec<_> = entries
            .into_iter()
            .filter(|entry| match &entry.hash {
                Some(hash) => seen.insert(hash.clone()),
                None => true,
            })
            .collect();

        debug!(unique = unique.len(), total = before, "Duplicate hashes removed");
        unique
    }
}
