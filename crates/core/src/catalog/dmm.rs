//! Debrid Media Manager catalog client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::challenge::ChallengePayload;
use crate::config::CatalogConfig;
use crate::identifier::ContentIdentifier;
use crate::metrics::CATALOG_PAGE_DURATION;

use super::{CatalogClient, CatalogError, CatalogPage, RawCatalogEntry};

/// HTTP client for `/api/torrents/{movie|tv}`.
pub struct DmmCatalogClient {
    client: Client,
    base_url: String,
}

impl DmmCatalogClient {
    /// Create a new client. The configured timeout applies to each page.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| CatalogError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, identifier: &ContentIdentifier) -> String {
        format!(
            "{}/api/torrents/{}",
            self.base_url,
            identifier.catalog_kind()
        )
    }

    /// Query parameters for one page, in the order the catalog's own web
    /// client sends them.
    fn build_query(
        identifier: &ContentIdentifier,
        payload: &ChallengePayload,
        page: u32,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("imdbId", identifier.primary_id().to_string()),
            ("dmmProblemKey", payload.problem_key.clone()),
            ("solution", payload.solution.clone()),
            ("onlyTrusted", "false".to_string()),
            ("maxSize", "0".to_string()),
            ("page", page.to_string()),
        ];

        if identifier.is_series() {
            if let Some(season) = identifier.season() {
                params.push(("seasonNum", season.to_string()));
            }
        }

        params
    }

    async fn request_page(
        &self,
        url: &str,
        identifier: &ContentIdentifier,
        payload: &ChallengePayload,
        page: u32,
    ) -> Result<Vec<RawCatalogEntry>, CatalogError> {
        let response = self
            .client
            .get(url)
            .query(&Self::build_query(identifier, payload, page))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout
                } else {
                    CatalogError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let page: CatalogPage = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout
            } else {
                CatalogError::ParseError(e.to_string())
            }
        })?;

        Ok(page.results.unwrap_or_default())
    }
}

#[async_trait]
impl CatalogClient for DmmCatalogClient {
    fn name(&self) -> &str {
        "dmm"
    }

    async fn fetch_page(
        &self,
        identifier: &ContentIdentifier,
        payload: &ChallengePayload,
        page: u32,
    ) -> Result<Vec<RawCatalogEntry>, CatalogError> {
        let url = self.endpoint(identifier);
        debug!(url = %url, id = %identifier, page, "Requesting catalog page");

        let start = Instant::now();
        let result = self.request_page(&url, identifier, payload, page).await;
        CATALOG_PAGE_DURATION
            .with_label_values(&[self.name()])
            .observe(start.elapsed().as_secs_f64());
        result
    }
}
