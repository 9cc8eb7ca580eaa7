//! Trusted wall-clock source.
//!
//! Challenge tokens embed a timestamp that the catalog checks against its own
//! clock, so the local clock is never used for them.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use tracing::debug;

use crate::config::TimeSourceConfig;
use crate::metrics::TIME_SOURCE_REQUESTS;

use super::ChallengeError;

/// Provider of the current time as epoch seconds.
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &str;

    /// Current epoch seconds according to the trusted source.
    async fn now_epoch_secs(&self) -> Result<i64, ChallengeError>;
}

/// Time source backed by an HTTP endpoint returning an ISO-8601 string.
pub struct HttpTimeSource {
    client: Client,
    url: String,
}

impl HttpTimeSource {
    pub fn new(config: &TimeSourceConfig) -> Result<Self, ChallengeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| ChallengeError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    async fn fetch(&self) -> Result<i64, ChallengeError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ChallengeError::UpstreamTimeUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChallengeError::UpstreamTimeUnavailable(format!(
                "HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChallengeError::UpstreamTimeUnavailable(e.to_string()))?;

        let parsed = parse_iso_timestamp(&body).ok_or_else(|| {
            ChallengeError::UpstreamTimeUnavailable(format!(
                "Unparseable time response: {}",
                body.chars().take(64).collect::<String>()
            ))
        })?;

        debug!(url = %self.url, epoch = parsed.timestamp(), "Fetched trusted time");
        Ok(parsed.timestamp())
    }
}

#[async_trait]
impl TimeSource for HttpTimeSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn now_epoch_secs(&self) -> Result<i64, ChallengeError> {
        let result = self.fetch().await;
        let label = if result.is_ok() { "ok" } else { "error" };
        TIME_SOURCE_REQUESTS.with_label_values(&[label]).inc();
        result
    }
}

/// Parse the time endpoint body. Accepts a bare or JSON-quoted timestamp,
/// with a `+02:00` or `+0200` offset, or without one (read as UTC).
pub fn parse_iso_timestamp(body: &str) -> Option<DateTime<Utc>> {
    let raw = body.trim().trim_matches('"');

    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}
