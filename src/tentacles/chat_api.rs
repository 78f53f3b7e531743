use crate::core::PreparedChat;
use crate::core::reply::extract_reply;
use crate::error::ChatError;
use crate::llm::adapter::RunInput;
use crate::tentacles::web_console::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::{
        StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    response::IntoResponse,
    routing::{MethodRouter, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub const CHAT_ROUTE: &str = "/api/chat";

/// Largest accepted chat body; long histories are expected, so this sits well
/// above axum's 2 MB default.
pub const CHAT_BODY_LIMIT: usize = 100 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// `POST` runs the adapter, `OPTIONS` answers CORS pre-flight, and every
/// other method gets an empty 405.
pub fn routes() -> MethodRouter<Arc<AppState>> {
    post(chat)
        .options(preflight)
        .fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(CHAT_BODY_LIMIT))
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "content-type"),
        ],
    )
}

async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ChatError> {
    let body: Value = serde_json::from_slice(&body?)?;
    let prepared = PreparedChat::from_body(&body);
    info!(
        model = prepared.model,
        messages = prepared.messages.len(),
        "chat request"
    );

    let run = state.inference.run(
        prepared.model,
        RunInput {
            messages: prepared.messages,
        },
    );
    let result = match state.upstream_timeout {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| ChatError::Timeout(limit))??,
        None => run.await?,
    };

    let reply = extract_reply(&result);
    info!(reply_len = reply.len(), "chat reply");
    Ok((
        [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(ChatReply { reply }),
    ))
}
