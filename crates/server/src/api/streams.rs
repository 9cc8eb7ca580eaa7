//! Stream resource handler.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use dmmio_core::{ContentKind, PipelineError, StreamResponse};

use super::handlers::ErrorResponse;
use crate::metrics::STREAM_REQUESTS;
use crate::state::AppState;

/// Label for request types that are not a known resource kind.
pub const UNKNOWN_KIND_LABEL: &str = "unknown";

/// GET /stream/{kind}/{id}.json
///
/// Look up streams for a movie, series episode or anime entry. Malformed ids
/// get an empty stream list rather than an error so addon clients simply
/// show nothing.
pub async fn get_streams(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let Some(raw_id) = id.strip_suffix(".json") else {
        return not_found(format!("Unknown resource: {}", id));
    };

    let content_kind: ContentKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => {
            STREAM_REQUESTS
                .with_label_values(&[UNKNOWN_KIND_LABEL, "unknown_kind"])
                .inc();
            return not_found(e.to_string());
        }
    };

    let kind = content_kind.as_str();
    match state.pipeline().streams(raw_id, content_kind).await {
        Ok(response) => {
            STREAM_REQUESTS.with_label_values(&[kind, "ok"]).inc();
            cached_json(response)
        }
        Err(PipelineError::InvalidIdentifier(e)) => {
            debug!(kind = %kind, id = raw_id, error = %e, "Invalid id, returning no streams");
            STREAM_REQUESTS.with_label_values(&[kind, "invalid_id"]).inc();
            cached_json(state.cache().annotate(Vec::new()))
        }
        Err(e @ PipelineError::UpstreamTimeUnavailable(_)) => {
            warn!(kind = %kind, id = raw_id, error = %e, "Stream lookup failed");
            STREAM_REQUESTS.with_label_values(&[kind, "upstream_error"]).inc();
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
        Err(e @ PipelineError::Internal(_)) => {
            error!(kind = %kind, id = raw_id, error = %e, "Stream lookup crashed");
            STREAM_REQUESTS.with_label_values(&[kind, "internal_error"]).inc();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Serialize the response with a `Cache-Control` header built from its hints.
fn cached_json(response: StreamResponse) -> Response {
    let cache_control = cache_control(&response);
    let mut http_response = Json(response).into_response();
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        http_response
            .headers_mut()
            .insert(header::CACHE_CONTROL, value);
    }
    http_response
}

pub fn cache_control(response: &StreamResponse) -> String {
    format!(
        "max-age={}, stale-while-revalidate={}, stale-if-error={}, public",
        response.cache_max_age, response.stale_revalidate, response.stale_error
    )
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: message })).into_response()
}
