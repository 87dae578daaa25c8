//! Error types at the two fallible seams of the pipeline, plus the HTTP
//! layer's not-found error.
//!
//! Neither pipeline error escapes the core: an [`UpstreamError`] becomes an
//! empty snapshot and a [`ConfigDecodeError`] becomes the default user
//! configuration. [`ApiError`] is the only error a client ever sees.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// The upstream monitor could not produce a usable status list.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed status payload from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A configuration token could not be turned into a `UserConfig`.
#[derive(Debug, Error)]
pub enum ConfigDecodeError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token does not hold a valid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
