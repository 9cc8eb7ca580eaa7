pub mod cache;
pub mod catalog;
pub mod challenge;
pub mod config;
pub mod coordinator;
pub mod dedup;
pub mod filter;
pub mod identifier;
pub mod metrics;
pub mod pipeline;
pub mod stage;
pub mod stream;
pub mod testing;

pub use cache::{CacheAnnotator, StreamResponse, FAILED_ACCESS_MARKER};
pub use catalog::{
    CatalogClient, CatalogError, CatalogFetcher, DmmCatalogClient, RawCatalogEntry,
};
pub use challenge::{
    ChallengeError, ChallengePayload, ChallengeTokenGenerator, HttpTimeSource, TimeSource,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, CatalogConfig, Config,
    ConfigError, FilterConfig, SanitizedConfig, ServerConfig, TimeSourceConfig,
};
pub use coordinator::{CoordinatorError, RequestCoordinator};
pub use dedup::Deduplicator;
pub use filter::ResultFilter;
pub use identifier::{ContentIdentifier, ContentKind, IdNamespace, IdentifierError};
pub use pipeline::{PipelineError, StreamPipeline};
pub use stage::StreamStage;
pub use stream::{NormalizedStream, StreamMapper};
