use crate::llm::adapter::InferenceClient;
use crate::tentacles::chat_api::{self, CHAT_ROUTE};
use crate::tentacles::static_pages;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub struct AppState {
    pub inference: Arc<dyn InferenceClient + Send + Sync>,
    /// `None` leaves the upstream call unbounded.
    pub upstream_timeout: Option<Duration>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(CHAT_ROUTE, chat_api::routes())
        .fallback(static_pages::serve_asset)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct WebConsole {
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
}

impl WebConsole {
    pub async fn bind(addr: &str, state: Arc<AppState>) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("chat worker listening on {}", listener.local_addr()?);
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        axum::serve(self.listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("chat worker stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
