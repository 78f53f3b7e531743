use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use strum::{Display, EnumString};
use tracing::{info, warn};
use url::Url;

use crate::llm::adapter::InferenceClient;
use crate::llm::openai_compat::{self, OpenAiCompatClient};
use crate::llm::workers_ai::{self, WorkersAiClient};

pub const DEFAULT_CONFIG_PATH: &str = "config/chat_worker.toml";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8787";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BackendKind {
    #[default]
    WorkersAi,
    OpenaiCompat,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorkersAiConfig {
    pub base_url: String,
    pub account_id: Option<String>,
    pub api_token: Option<String>,
}

impl Default for WorkersAiConfig {
    fn default() -> Self {
        Self {
            base_url: workers_ai::DEFAULT_BASE_URL.to_string(),
            account_id: None,
            api_token: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self {
            base_url: openai_compat::DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listen: String,
    pub backend: BackendKind,
    /// Seconds to wait for the inference call; 0 disables the limit.
    pub upstream_timeout_secs: u64,
    pub workers_ai: WorkersAiConfig,
    pub openai_compat: OpenAiCompatConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            backend: BackendKind::default(),
            upstream_timeout_secs: 120,
            workers_ai: WorkersAiConfig::default(),
            openai_compat: OpenAiCompatConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the TOML file if it exists, otherwise starts from defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg: AppConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Applies environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(listen) = lookup("CHAT_WORKER_LISTEN") {
            self.listen = listen;
        }
        if let Some(backend) = lookup("CHAT_WORKER_BACKEND") {
            self.backend = backend
                .parse()
                .with_context(|| format!("unknown backend `{}`", backend))?;
        }
        if let Some(secs) = lookup("CHAT_WORKER_UPSTREAM_TIMEOUT_SECS") {
            self.upstream_timeout_secs = secs
                .parse()
                .with_context(|| format!("invalid timeout `{}`", secs))?;
        }
        if let Some(account) = lookup("CF_ACCOUNT_ID") {
            self.workers_ai.account_id = Some(account);
        }
        if let Some(token) = lookup("CF_API_TOKEN") {
            self.workers_ai.api_token = Some(token);
        }
        if let Some(base) = lookup("OPENAI_BASE_URL") {
            self.openai_compat.base_url = base;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai_compat.api_key = Some(key);
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        (self.upstream_timeout_secs > 0).then(|| Duration::from_secs(self.upstream_timeout_secs))
    }

    /// Builds the configured inference client, checking that its credentials
    /// are present.
    pub fn build_inference(&self) -> Result<Arc<dyn InferenceClient + Send + Sync>> {
        match self.backend {
            BackendKind::WorkersAi => {
                let cfg = &self.workers_ai;
                let Some(account_id) = cfg.account_id.clone().filter(|s| !s.is_empty()) else {
                    bail!("workers-ai backend needs an account id (CF_ACCOUNT_ID)");
                };
                let Some(api_token) = cfg.api_token.clone().filter(|s| !s.is_empty()) else {
                    bail!("workers-ai backend needs an API token (CF_API_TOKEN)");
                };
                let base = Url::parse(&cfg.base_url)
                    .with_context(|| format!("invalid workers_ai.base_url `{}`", cfg.base_url))?;
                Ok(Arc::new(WorkersAiClient::new(base, account_id, api_token)))
            }
            BackendKind::OpenaiCompat => {
                let cfg = &self.openai_compat;
                let base = Url::parse(&cfg.base_url).with_context(|| {
                    format!("invalid openai_compat.base_url `{}`", cfg.base_url)
                })?;
                Ok(Arc::new(OpenAiCompatClient::new(base, cfg.api_key.clone())))
            }
        }
    }
}
