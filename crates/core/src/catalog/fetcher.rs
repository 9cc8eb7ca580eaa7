//! Sequential pagination over the catalog.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::challenge::ChallengePayload;
use crate::identifier::ContentIdentifier;
use crate::metrics::CATALOG_PAGES;

use super::{CatalogClient, RawCatalogEntry};

/// Walks catalog pages from 0 until an empty page, an error or the page cap.
///
/// Pages are requested one at a time, never concurrently, so the upstream
/// sees the same cadence as its own web client.
pub struct CatalogFetcher {
    client: Arc<dyn CatalogClient>,
    max_pages: u32,
}

impl CatalogFetcher {
    pub fn new(client: Arc<dyn CatalogClient>, max_pages: u32) -> Self {
        Self { client, max_pages }
    }

    /// Collect entries in page-then-position order.
    ///
    /// Never fails: a page error ends pagination and whatever was gathered
    /// so far is returned.
    pub async fn fetch_all(
        &self,
        identifier: &ContentIdentifier,
        payload: &ChallengePayload,
    ) -> Vec<RawCatalogEntry> {
        let mut collected = Vec::new();
        let mut page = 0;

        loop {
            if page >= self.max_pages {
                info!(
                    id = %identifier,
                    pages = page,
                    "Page cap reached, stopping catalog pagination"
                );
                break;
            }

            match self.client.fetch_page(identifier, payload, page).await {
                Ok(entries) if entries.is_empty() => {
                    CATALOG_PAGES.with_label_values(&["empty"]).inc();
                    debug!(id = %identifier, page, "Empty catalog page, pagination done");
                    break;
                }
                Ok(mut entries) => {
                    CATALOG_PAGES.with_label_values(&["ok"]).inc();
                    debug!(id = %identifier, page, results = entries.len(), "Catalog page fetched");
                    collected.append(&mut entries);
                    page += 1;
                }
                Err(e) => {
                    CATALOG_PAGES.with_label_values(&["error"]).inc();
                    warn!(
                        catalog = self.client.name(),
                        id = %identifier,
                        page,
                        error = %e,
                        "Catalog page request failed, keeping partial results"
                    );
                    break;
                }
            }
        }

        debug!(id = %identifier, total = collected.len(), "Catalog fetch complete");
        collected
    }
}
