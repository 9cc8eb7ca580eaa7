//! Upstream torrent catalog access.
//!
//! `CatalogClient` fetches a single page; `CatalogFetcher` drives sequential
//! pagination over any client.

mod dmm;
mod fetcher;
mod types;

pub use dmm::DmmCatalogClient;
pub use fetcher::CatalogFetcher;
pub use types::*;
