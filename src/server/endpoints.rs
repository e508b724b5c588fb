//! Built-in endpoint handlers.
//!
//! - `/health` - liveness with uptime and version
//! - `/metrics` - Prometheus metrics export
//! - JSON error bodies for everything that fails
//!
//! Functions return `EndpointResponse` so response generation stays testable;
//! the caller converts it into a hyper response.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;
use std::time::Instant;

use crate::error::ProfileImageError;
use crate::metrics::Metrics;
use crate::render::ImageResponse;

/// Response from a built-in endpoint handler.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Response body
    pub body: String,
}

impl EndpointResponse {
    /// Create a JSON response with the given status and body.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    /// Create a plain text response (for Prometheus metrics).
    pub fn prometheus(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/plain; version=0.0.4",
            body,
        }
    }

    /// JSON error body `{"status": "error", "message": ...}`
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({
            "status": "error",
            "message": message
        })
        .to_string();
        Self::json(status, body)
    }

    pub fn into_response(self) -> ImageResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        response
    }
}

impl From<&ProfileImageError> for EndpointResponse {
    fn from(err: &ProfileImageError) -> Self {
        EndpointResponse::error(err.to_http_status(), &err.client_message())
    }
}

/// Generate response for /health endpoint.
pub fn handle_health(start_time: Instant) -> EndpointResponse {
    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": start_time.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION")
    })
    .to_string();

    EndpointResponse::json(200, body)
}

/// Generate response for /metrics endpoint.
pub fn handle_metrics(metrics: &Metrics) -> EndpointResponse {
    EndpointResponse::prometheus(metrics.export_prometheus())
}
