//! Stream lookup pipeline.
//!
//! A request flows through identifier parsing, then a coalesced core
//! (challenge, pagination, relevance filter, dedup, mapping), then the
//! registered enrichment stages and finally the cache annotator. Only the
//! core is shared between concurrent callers; stages run once per caller.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheAnnotator, StreamResponse};
use crate::catalog::{CatalogClient, CatalogFetcher, DmmCatalogClient};
use crate::challenge::{ChallengeError, ChallengeTokenGenerator, HttpTimeSource, TimeSource};
use crate::config::{Config, ConfigError};
use crate::coordinator::{CoordinatorError, RequestCoordinator};
use crate::dedup::Deduplicator;
use crate::filter::ResultFilter;
use crate::identifier::{ContentIdentifier, ContentKind, IdentifierError};
use crate::metrics::{PIPELINE_DURATION, PIPELINE_EXECUTIONS, STAGE_ENTRIES, STREAMS_RETURNED};
use crate::stage::StreamStage;
use crate::stream::{NormalizedStream, StreamMapper};

/// Errors surfaced to callers of [`StreamPipeline::streams`].
///
/// Cloneable so one failure can be handed to every coalesced caller.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("Invalid content identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Trusted time source unavailable: {0}")]
    UpstreamTimeUnavailable(String),

    #[error("Internal pipeline error: {0}")]
    Internal(String),
}

impl From<ChallengeError> for PipelineError {
    fn from(err: ChallengeError) -> Self {
        match err {
            ChallengeError::UpstreamTimeUnavailable(msg) => Self::UpstreamTimeUnavailable(msg),
            ChallengeError::Configuration(msg) => Self::Internal(msg),
        }
    }
}

impl From<CoordinatorError> for PipelineError {
    fn from(err: CoordinatorError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// The part of the pipeline shared between coalesced callers.
struct PipelineCore {
    generator: ChallengeTokenGenerator,
    fetcher: CatalogFetcher,
    filter: ResultFilter,
    dedup: Deduplicator,
    mapper: StreamMapper,
}

impl PipelineCore {
    async fn execute(
        &self,
        identifier: &ContentIdentifier,
    ) -> Result<Vec<NormalizedStream>, PipelineError> {
        let payload = self.generator.generate().await?;

        let entries = self.fetcher.fetch_all(identifier, &payload).await;
        observe_stage("fetch", entries.len());

        let entries = self.filter.apply(entries);
        observe_stage("filter", entries.len());

        let entries = self.dedup.apply(entries);
        observe_stage("dedup", entries.len());

        Ok(self.mapper.map_all(entries))
    }
}

/// Orchestrates a stream lookup for one content identifier.
pub struct StreamPipeline {
    core: Arc<PipelineCore>,
    stages: Vec<Arc<dyn StreamStage>>,
    cache: CacheAnnotator,
    coordinator: RequestCoordinator<Vec<NormalizedStream>, PipelineError>,
}

impl StreamPipeline {
    pub fn new(
        time_source: Arc<dyn TimeSource>,
        catalog: Arc<dyn CatalogClient>,
        filter: ResultFilter,
        cache: CacheAnnotator,
        max_pages: u32,
        max_clock_skew_secs: u64,
    ) -> Self {
        let core = PipelineCore {
            generator: ChallengeTokenGenerator::new(time_source, max_clock_skew_secs),
            fetcher: CatalogFetcher::new(catalog, max_pages),
            filter,
            dedup: Deduplicator::new(),
            mapper: StreamMapper::new(),
        };

        Self {
            core: Arc::new(core),
            stages: Vec::new(),
            cache,
            coordinator: RequestCoordinator::new(),
        }
    }

    /// Build a pipeline talking to the configured catalog and time source.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let time_source =
            HttpTimeSource::new(&config.time_source).map_err(|e| ConfigError::InitError {
                component: "time source".to_string(),
                message: e.to_string(),
            })?;

        let catalog =
            DmmCatalogClient::new(&config.catalog).map_err(|e| ConfigError::InitError {
                component: "catalog client".to_string(),
                message: e.to_string(),
            })?;

        let filter = match &config.filter.pattern {
            Some(pattern) => ResultFilter::new(pattern).map_err(|e| {
                ConfigError::ValidationError(format!("filter.pattern is not a valid regex: {}", e))
            })?,
            None => ResultFilter::default(),
        };

        Ok(Self::new(
            Arc::new(time_source),
            Arc::new(catalog),
            filter,
            CacheAnnotator::new(&config.cache),
            config.catalog.max_pages,
            config.time_source.max_clock_skew_secs,
        ))
    }

    /// Append an enrichment stage. Stages run in registration order.
    pub fn with_stage(mut self, stage: Arc<dyn StreamStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Names of the registered stages, in order.
    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name().to_string()).collect()
    }

    /// Number of lookups currently running against the catalog.
    pub fn in_flight(&self) -> usize {
        self.coordinator.in_flight()
    }

    /// Look up streams for a raw request id.
    ///
    /// The id is validated before any network call. Concurrent calls for the
    /// same id and resource share one catalog lookup.
    pub async fn streams(
        &self,
        raw_id: &str,
        kind: ContentKind,
    ) -> Result<StreamResponse, PipelineError> {
        let identifier = ContentIdentifier::parse(raw_id, kind).map_err(|e| {
            debug!(id = raw_id, error = %e, "Rejected content identifier");
            PipelineError::from(e)
        })?;

        // The endpoint depends on the kind, so it is part of the key.
        let key = format!("{}/{}", identifier.catalog_kind(), raw_id.trim());
        let core = Arc::clone(&self.core);
        let mut streams = self
            .coordinator
            .run(&key, move || async move {
                let start = Instant::now();
                let result = core.execute(&identifier).await;
                record_execution(&identifier, &result, start);
                result
            })
            .await?;

        for stage in &self.stages {
            streams = stage.transform(streams).await;
            observe_stage(stage.name(), streams.len());
        }

        STREAMS_RETURNED.set(streams.len() as i64);
        Ok(self.cache.annotate(streams))
    }
}

fn observe_stage(stage: &str, entries: usize) {
    STAGE_ENTRIES
        .with_label_values(&[stage])
        .observe(entries as f64);
}

fn record_execution(
    identifier: &ContentIdentifier,
    result: &Result<Vec<NormalizedStream>, PipelineError>,
    start: Instant,
) {
    let label = if result.is_ok() { "ok" } else { "error" };
    PIPELINE_EXECUTIONS.with_label_values(&[label]).inc();
    PIPELINE_DURATION
        .with_label_values(&[label])
        .observe(start.elapsed().as_secs_f64());

    match result {
        Ok(streams) => info!(
            id = %identifier,
            streams = streams.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Stream lookup complete"
        ),
        Err(e) => warn!(id = %identifier, error = %e, "Stream lookup failed"),
    }
}
