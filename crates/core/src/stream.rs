//! Normalized stream records handed to the protocol layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::RawCatalogEntry;

/// Provider label attached to every stream from the catalog.
pub const PROVIDER_LABEL: &str = "DMM";

/// A playable stream candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStream {
    pub info_hash: String,
    /// The catalog never reports file indices.
    pub file_index: Option<u32>,
    pub title: String,
    /// Size in bytes.
    pub size: u64,
    pub seeders: u64,
    pub provider: String,
    pub trackers: String,
    /// When the stream was mapped; the catalog has no upload dates.
    pub upload_date: DateTime<Utc>,
    /// Playback URL, set by debrid enrichment stages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Converts filtered catalog entries into stream records, one to one.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamMapper;

impl StreamMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map_all(&self, entries: Vec<RawCatalogEntry>) -> Vec<NormalizedStream> {
        self.map_all_at(entries, Utc::now())
    }

    /// Map with an explicit timestamp.
    pub fn map_all_at(
        &self,
        entries: Vec<RawCatalogEntry>,
        mapped_at: DateTime<Utc>,
    ) -> Vec<NormalizedStream> {
        entries
            .into_iter()
            .map(|entry| NormalizedStream {
                info_hash: entry.hash.unwrap_or_default(),
                file_index: None,
                title: entry.title.unwrap_or_default(),
                size: entry.size.unwrap_or(0),
                seeders: entry.seeders.unwrap_or(0),
                provider: PROVIDER_LABEL.to_string(),
                trackers: String::new(),
                upload_date: mapped_at,
                url: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_maps_one_to_one_in_order() {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let streams = StreamMapper::new().map_all_at(
            vec![
                RawCatalogEntry {
                    title: Some("First.PL".to_string()),
                    hash: Some("AAAA".to_string()),
                    size: Some(1024),
                    seeders: Some(7),
                },
                RawCatalogEntry {
                    title: Some("Second.PL".to_string()),
                    hash: Some("bbbb".to_string()),
                    size: None,
                    seeders: None,
                },
            ],
            at,
        );

        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].info_hash, "AAAA");
        assert_eq!(streams[0].title, "First.PL");
        assert_eq!(streams[0].size, 1024);
        assert_eq!(streams[0].seeders, 7);
        assert_eq!(streams[0].file_index, None);
        assert_eq!(streams[0].provider, "DMM");
        assert_eq!(streams[0].trackers, "");
        assert_eq!(streams[0].upload_date, at);
        assert!(streams[0].url.is_none());

        assert_eq!(streams[1].info_hash, "bbbb");
        assert_eq!(streams[1].size, 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let stream = StreamMapper::new()
            .map_all(vec![RawCatalogEntry {
                title: Some("T".to_string()),
                hash: Some("h".to_string()),
                size: Some(1),
                seeders: Some(1),
            }])
            .remove(0);

        let json = serde_json::to_value(&stream).unwrap();
        assert_eq!(json["infoHash"], "h");
        assert!(json["fileIndex"].is_null());
        assert!(json.get("uploadDate").is_some());
        assert!(json.get("url").is_none());
    }
}
