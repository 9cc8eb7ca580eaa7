//! Enrichment stages run after the catalog core.
//!
//! Sorting, static fallback links and debrid resolution live outside this
//! crate. They plug in as `StreamStage`s and see only the stream list.

use async_trait::async_trait;

use crate::stream::NormalizedStream;

/// A transformation over the stream list.
#[async_trait]
pub trait StreamStage: Send + Sync {
    /// Stage name for logging.
    fn name(&self) -> &str;

    async fn transform(&self, streams: Vec<NormalizedStream>) -> Vec<NormalizedStream>;
}
