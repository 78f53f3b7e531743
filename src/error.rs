//! Request-level failures of `POST /api/chat`.
//!
//! Every variant maps to the same generic 500 body. The full cause is logged
//! server-side only.

use std::time::Duration;

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const CHAT_FAILED_MESSAGE: &str = "Chat request failed";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("could not read request body: {0}")]
    BodyRead(#[from] BytesRejection),

    /// The request body was not valid JSON.
    #[error("malformed request body: {0}")]
    Body(#[from] serde_json::Error),

    /// The inference capability returned an error.
    #[error("inference call failed: {0:#}")]
    Inference(#[from] anyhow::Error),

    #[error("inference call timed out after {0:?}")]
    Timeout(Duration),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        error!(error = %self, "chat request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            Json(json!({ "error": CHAT_FAILED_MESSAGE })),
        )
            .into_response()
    }
}
