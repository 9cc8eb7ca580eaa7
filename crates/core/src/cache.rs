//! Cache hints for stream responses.

use serde::{Deserialize, Serialize};

use crate::config::CacheConfig;
use crate::stream::NormalizedStream;

/// Placeholder video debrid stages link to when account access failed.
pub const FAILED_ACCESS_MARKER: &str = "failed_access_v2.mp4";

/// Stream list plus the cache hints the protocol layer forwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub streams: Vec<NormalizedStream>,
    pub cache_max_age: u64,
    pub stale_revalidate: u64,
    pub stale_error: u64,
}

/// Derives cache lifetimes from the shape of the final stream list.
#[derive(Debug, Clone)]
pub struct CacheAnnotator {
    max_age: u64,
    max_age_empty: u64,
    stale_revalidate: u64,
    stale_error: u64,
}

impl CacheAnnotator {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            max_age: config.max_age_secs,
            max_age_empty: config.max_age_empty_secs,
            stale_revalidate: config.stale_revalidate_secs,
            stale_error: config.stale_error_secs,
        }
    }

    /// Empty lists are cached briefly, lists made only of failed-access
    /// placeholders are not cached at all.
    pub fn annotate(&self, streams: Vec<NormalizedStream>) -> StreamResponse {
        let cache_max_age = if streams.is_empty() {
            self.max_age_empty
        } else if streams.iter().all(is_failed_access) {
            0
        } else {
            self.max_age
        };

        StreamResponse {
            streams,
            cache_max_age,
            stale_revalidate: self.stale_revalidate,
            stale_error: self.stale_error,
        }
    }
}

impl Default for CacheAnnotator {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

fn is_failed_access(stream: &NormalizedStream) -> bool {
    stream
        .url
        .as_deref()
        .is_some_and(|url| url.ends_with(FAILED_ACCESS_MARKER))
}
