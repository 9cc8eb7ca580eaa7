//! Testing utilities and mock implementations.
//!
//! Mocks stand in for the network-facing traits so the pipeline can be
//! exercised end to end without a catalog or a time endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use dmmio_core::testing::{fixtures, MockCatalogClient, MockTimeSource};
//!
//! let time = MockTimeSource::fixed(1_700_000_000);
//! let catalog = MockCatalogClient::with_pages(vec![
//!     fixtures::page("a", 10),
//!     fixtures::page("b", 10),
//! ]);
//!
//! // Use in StreamPipeline::new(...)
//! assert_eq!(catalog.requested_pages(), vec![0, 1, 2]);
//! ```

mod mock_catalog;
mod mock_time_source;
mod recording_stage;

pub use mock_catalog::{MockCatalogClient, RecordedPageRequest};
pub use mock_time_source::MockTimeSource;
pub use recording_stage::RecordingStage;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::catalog::RawCatalogEntry;
    use crate::stream::{NormalizedStream, PROVIDER_LABEL};

    /// A 40-character info hash derived from `seed`.
    pub fn hash(seed: &str) -> String {
        let mut hex: String = seed.bytes().map(|b| format!("{:02x}", b)).collect();
        hex.truncate(40);
        format!("{:0>40}", hex)
    }

    /// A catalog entry that passes the built-in relevance filter.
    pub fn entry(title: &str, info_hash: &str) -> RawCatalogEntry {
        RawCatalogEntry {
            title: Some(title.to_string()),
            hash: Some(info_hash.to_string()),
            size: Some(1024 * 1024 * 1024 * 2), // 2 GB
            seeders: Some(25),
        }
    }

    /// A full page of `n` relevant entries titled `{prefix}-{i} PL`, each
    /// with its own hash.
    pub fn page(prefix: &str, n: usize) -> Vec<RawCatalogEntry> {
        (0..n)
            .map(|i| {
                let title = format!("{}-{} PL", prefix, i);
                let info_hash = hash(&title);
                entry(&title, &info_hash)
            })
            .collect()
    }

    /// A stream as produced by the mapper.
    pub fn stream(title: &str, info_hash: &str) -> NormalizedStream {
        NormalizedStream {
            info_hash: info_hash.to_string(),
            file_index: None,
            title: title.to_string(),
            size: 1024 * 1024 * 1024 * 2,
            seeders: 25,
            provider: PROVIDER_LABEL.to_string(),
            trackers: String::new(),
            upload_date: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
            url: None,
        }
    }
}
