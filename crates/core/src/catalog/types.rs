//! Types for the upstream torrent catalog.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::challenge::ChallengePayload;
use crate::identifier::ContentIdentifier;

/// One catalog result as received. Any field may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCatalogEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Info hash, case preserved.
    #[serde(default, deserialize_with = "lenient_string")]
    pub hash: Option<String>,
    /// Size in bytes.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub seeders: Option<u64>,
}

/// A single page of catalog results.
///
/// Entries that are not objects are dropped individually so one bad result
/// does not discard the rest of the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub results: Option<Vec<RawCatalogEntry>>,
}

/// Errors from a single catalog request.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Catalog API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse catalog response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Catalog client configuration error: {0}")]
    Configuration(String),
}

/// One-page access to the upstream catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Fetch a single zero-based page of results.
    async fn fetch_page(
        &self,
        identifier: &ContentIdentifier,
        payload: &ChallengePayload,
        page: u32,
    ) -> Result<Vec<RawCatalogEntry>, CatalogError>;
}

/// Accept strings as-is and render numbers and booleans as text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Parse `results` entry by entry, skipping any that do not deserialize.
/// A non-array `results` is treated as absent.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Option<Vec<RawCatalogEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Accept integers, floats (truncated), numeric strings and null.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserialization() {
        let json = r#"{
            "title": "Film.2023.PL.1080p",
            "hash": "ABCDEF0123456789ABCDEF0123456789ABCDEF01",
            "size": 2147483648,
            "seeders": 12,
            "extra": "ignored"
        }"#;
        let entry: RawCatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.title.as_deref(), Some("Film.2023.PL.1080p"));
        assert_eq!(
            entry.hash.as_deref(),
            Some("ABCDEF0123456789ABCDEF0123456789ABCDEF01")
        );
        assert_eq!(entry.size, Some(2_147_483_648));
        assert_eq!(entry.seeders, Some(12));
    }

    #[test]
    fn test_entry_lenient_numbers() {
        let entry: RawCatalogEntry =
            serde_json::from_str(r#"{"size": 1536.7, "seeders": "4"}"#).unwrap();
        assert_eq!(entry.size, Some(1536));
        assert_eq!(entry.seeders, Some(4));

        let entry: RawCatalogEntry =
            serde_json::from_str(r#"{"size": null, "seeders": -3}"#).unwrap();
        assert_eq!(entry.size, None);
        assert_eq!(entry.seeders, None);
        assert!(entry.title.is_none());
        assert!(entry.hash.is_none());
    }

    #[test]
    fn test_page_without_results() {
        let page: CatalogPage = serde_json::from_str("{}").unwrap();
        assert!(page.results.is_none());

        let page: CatalogPage = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(page.results.map(|r| r.len()), Some(0));
    }

    #[test]
    fn test_entry_non_string_title_is_coerced() {
        let entry: RawCatalogEntry =
            serde_json::from_str(r#"{"title": 123, "hash": ["x"]}"#).unwrap();
        assert_eq!(entry.title.as_deref(), Some("123"));
        assert!(entry.hash.is_none());
    }

    #[test]
    fn test_page_keeps_valid_entries_around_bad_ones() {
        let json = r#"{"results": [
            {"title": "a-0 PL", "hash": "aa"},
            null,
            "garbage",
            {"title": 123, "hash": "bb"},
            {"title": {"nested": true}, "hash": "cc"}
        ]}"#;
        let page: CatalogPage = serde_json::from_str(json).unwrap();
        let results = page.results.unwrap();
        let hashes: Vec<_> = results.iter().map(|e| e.hash.as_deref()).collect();
        assert_eq!(hashes, vec![Some("aa"), Some("bb"), Some("cc")]);
        assert_eq!(results[1].title.as_deref(), Some("123"));
        assert!(results[2].title.is_none());
    }

    #[test]
    fn test_page_with_non_array_results_is_empty() {
        let page: CatalogPage = serde_json::from_str(r#"{"results": "none"}"#).unwrap();
        assert!(page.results.is_none());
    }
}
