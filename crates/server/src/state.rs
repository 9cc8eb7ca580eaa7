use std::sync::Arc;

use dmmio_core::{CacheAnnotator, Config, SanitizedConfig, StreamPipeline};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Arc<StreamPipeline>,
    cache: CacheAnnotator,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<StreamPipeline>) -> Self {
        let cache = CacheAnnotator::new(&config.cache);
        Self {
            config,
            pipeline,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &StreamPipeline {
        self.pipeline.as_ref()
    }

    /// Annotator for responses built outside the pipeline.
    pub fn cache(&self) -> &CacheAnnotator {
        &self.cache
    }
}
