//! Mock catalog client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::catalog::{CatalogClient, CatalogError, RawCatalogEntry};
use crate::challenge::ChallengePayload;
use crate::identifier::ContentIdentifier;

/// A recorded page request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedPageRequest {
    /// Full identifier as requested (`tt0903747:1:3`).
    pub content_id: String,
    pub payload: ChallengePayload,
    pub page: u32,
}

/// Mock implementation of the CatalogClient trait.
///
/// Serves a fixed list of pages; any page beyond the list is empty. Single
/// pages can be made to fail, and every request is recorded.
///
/// # Example
///
/// ```rust,ignore
/// let client = MockCatalogClient::with_pages(vec![fixtures::page("a", 5)]);
/// client.fail_on_page(1, CatalogError::Timeout);
///
/// // ... run the fetcher ...
/// assert_eq!(client.requested_pages(), vec![0, 1]);
/// ```
#[derive(Debug, Default)]
pub struct MockCatalogClient {
    pages: Vec<Vec<RawCatalogEntry>>,
    failures: Mutex<HashMap<u32, CatalogError>>,
    requests: Mutex<Vec<RecordedPageRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl MockCatalogClient {
    /// A catalog with no results at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog serving `pages` in order.
    pub fn with_pages(pages: Vec<Vec<RawCatalogEntry>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Make requests for `page` fail with `error`.
    pub fn fail_on_page(&self, page: u32, error: CatalogError) {
        self.failures.lock().unwrap().insert(page, error);
    }

    /// Delay each page response.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// All requests made so far, in order.
    pub fn recorded_requests(&self) -> Vec<RecordedPageRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Page numbers requested so far, in order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests.lock().unwrap().iter().map(|r| r.page).collect()
    }

    /// Number of page requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_page(
        &self,
        identifier: &ContentIdentifier,
        payload: &ChallengePayload,
        page: u32,
    ) -> Result<Vec<RawCatalogEntry>, CatalogError> {
        self.requests.lock().unwrap().push(RecordedPageRequest {
            content_id: identifier.to_string(),
            payload: payload.clone(),
            page,
        });

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failures.lock().unwrap().get(&page) {
            return Err(error.clone());
        }

        Ok(self
            .pages
            .get(page as usize)
            .cloned()
            .unwrap_or_default())
    }
}
