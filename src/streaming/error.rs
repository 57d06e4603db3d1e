//! Errors raised while resolving or streaming a song.
//!
//! Range problems never show up here: they are folded into a
//! [`DeliveryPlan::Unsatisfiable`](super::range::DeliveryPlan) before any I/O.
//! Client disconnects are not errors either; the transmitter reports them as
//! an outcome.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The path segment is not a song ID.
    #[error("invalid song id: {0}")]
    InvalidId(String),

    /// No song with this ID, or its file is gone.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// Reading the asset failed.
    #[error("asset read failed: {0}")]
    AssetRead(#[source] std::io::Error),

    /// The catalog lookup failed for a reason other than a missing song.
    #[error("catalog error: {0}")]
    Catalog(tonearm_common::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl StreamError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::AssetNotFound(_) => StatusCode::NOT_FOUND,
            Self::AssetRead(_) | Self::Catalog(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "invalid_id",
            Self::AssetNotFound(_) => "not_found",
            Self::AssetRead(_) => "io_error",
            Self::Catalog(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<tonearm_common::Error> for StreamError {
    fn from(e: tonearm_common::Error) -> Self {
        if e.is_not_found() {
            Self::AssetNotFound(e.to_string())
        } else {
            Self::Catalog(e)
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Streaming request failed");
        }

        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}
