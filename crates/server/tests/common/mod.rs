//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock time source and a mock catalog injected, so the full HTTP
//! surface can be exercised without network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use dmmio_core::testing::{MockCatalogClient, MockTimeSource};
use dmmio_core::{
    CacheAnnotator, Config, ResultFilter, ServerConfig, StreamPipeline, StreamStage,
};

/// Re-export fixtures for test convenience
pub use dmmio_core::testing::fixtures;

/// Trusted time reported by the mock time source.
pub const TRUSTED_EPOCH: i64 = 1_718_447_400;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_movie_streams() {
///     let fixture = TestFixture::with_pages(vec![fixtures::page("a", 3)]);
///     let response = fixture.get("/stream/movie/tt0111161.json").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock time source - count lookups or make them fail
    pub time_source: Arc<MockTimeSource>,
    /// Mock catalog - configure pages and inspect requests
    pub catalog: Arc<MockCatalogClient>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestFixture {
    /// Create a fixture whose catalog has no results.
    pub fn new() -> Self {
        Self::with_pages(Vec::new())
    }

    /// Create a fixture whose catalog serves `pages` in order.
    pub fn with_pages(pages: Vec<Vec<dmmio_core::RawCatalogEntry>>) -> Self {
        Self::build(
            MockTimeSource::fixed(TRUSTED_EPOCH),
            MockCatalogClient::with_pages(pages),
            Vec::new(),
        )
    }

    /// Create a fixture whose time source always fails.
    pub fn with_time_unavailable() -> Self {
        Self::build(
            MockTimeSource::unavailable(),
            MockCatalogClient::with_pages(vec![fixtures::page("a", 3)]),
            Vec::new(),
        )
    }

    /// Create a fixture from explicit mocks and enrichment stages.
    pub fn build(
        time_source: MockTimeSource,
        catalog: MockCatalogClient,
        stages: Vec<Arc<dyn StreamStage>>,
    ) -> Self {
        let time_source = Arc::new(time_source);
        let catalog = Arc::new(catalog);

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 7000, // Not used for in-process testing
            },
            ..Config::default()
        };

        let mut pipeline = StreamPipeline::new(
            Arc::clone(&time_source) as Arc<dyn dmmio_core::TimeSource>,
            Arc::clone(&catalog) as Arc<dyn dmmio_core::CatalogClient>,
            ResultFilter::default(),
            CacheAnnotator::new(&config.cache),
            config.catalog.max_pages,
            u64::MAX,
        );
        for stage in stages {
            pipeline = pipeline.with_stage(stage);
        }

        let state = Arc::new(dmmio_server::state::AppState::new(
            config,
            Arc::new(pipeline),
        ));
        let router = dmmio_server::api::create_router(state);

        Self {
            router,
            time_source,
            catalog,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_headers(path, &[]).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut request_builder = Request::builder().method("GET").uri(path);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }
        let request = request_builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}
