use anyhow::Context;
use chat_worker::config::{AppConfig, BackendKind, DEFAULT_CONFIG_PATH};
use chat_worker::tentacles::web_console::{AppState, WebConsole};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "CHAT_WORKER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Address to listen on, e.g. 0.0.0.0:8787
    #[arg(short, long)]
    listen: Option<String>,

    /// Inference backend: workers-ai or openai-compat
    #[arg(short, long)]
    backend: Option<BackendKind>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut cfg = AppConfig::load(&args.config)?;
    cfg.apply_env(|key| std::env::var(key).ok())?;
    if let Some(listen) = args.listen {
        cfg.listen = listen;
    }
    if let Some(backend) = args.backend {
        cfg.backend = backend;
    }

    let inference = cfg
        .build_inference()
        .context("failed to set up inference backend")?;
    info!(
        backend = %cfg.backend,
        timeout_secs = cfg.upstream_timeout_secs,
        "inference backend ready"
    );

    let state = Arc::new(AppState {
        inference,
        upstream_timeout: cfg.upstream_timeout(),
    });
    WebConsole::bind(&cfg.listen, state).await?.run().await
}
