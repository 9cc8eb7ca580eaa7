//! Recording stream stage for testing.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::stage::StreamStage;
use crate::stream::NormalizedStream;

type Transform = Box<dyn Fn(Vec<NormalizedStream>) -> Vec<NormalizedStream> + Send + Sync>;

/// A stage that records the lists it receives and optionally rewrites them.
pub struct RecordingStage {
    name: String,
    seen: Mutex<Vec<Vec<NormalizedStream>>>,
    transform: Option<Transform>,
}

impl std::fmt::Debug for RecordingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingStage")
            .field("name", &self.name)
            .field("seen", &"<seen>")
            .field("transform", &"<transform>")
            .finish()
    }
}

impl RecordingStage {
    /// A pass-through stage.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seen: Mutex::new(Vec::new()),
            transform: None,
        }
    }

    /// A stage applying `transform` to every list it receives.
    pub fn with_transform<F>(name: &str, transform: F) -> Self
    where
        F: Fn(Vec<NormalizedStream>) -> Vec<NormalizedStream> + Send + Sync + 'static,
    {
        Self {
            transform: Some(Box::new(transform)),
            ..Self::new(name)
        }
    }

    /// Every list this stage was called with, in call order.
    pub fn seen(&self) -> Vec<Vec<NormalizedStream>> {
        self.seen.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl StreamStage for RecordingStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, streams: Vec<NormalizedStream>) -> Vec<NormalizedStream> {
        self.seen.lock().unwrap().push(streams.clone());
        match &self.transform {
            Some(transform) => transform(streams),
            None => streams,
        }
    }
}
