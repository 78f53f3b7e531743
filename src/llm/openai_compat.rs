use crate::llm::adapter::{InferenceClient, RunInput};
use crate::llm::transport::{HttpClient, build_client, post_json};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:1234";

/// Client for any server exposing `/v1/chat/completions` (LM Studio,
/// llama.cpp, vLLM, ...). The first choice's content is surfaced as
/// `{ "response": ... }` so it reads like a Workers AI text-generation result.
#[derive(Clone)]
pub struct OpenAiCompatClient {
    pub base_url: Url,
    pub api_key: Option<String>,
    client: HttpClient,
}

impl OpenAiCompatClient {
    pub fn new(base_url: Url, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            client: build_client(),
        }
    }

    /// Appends the completions route to whatever path `base_url` carries, so
    /// both `http://host:1234` and `https://host/api/v1` work.
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let route = if base.ends_with("/v1") {
            "/chat/completions"
        } else {
            "/v1/chat/completions"
        };
        Ok(Url::parse(&format!("{}{}", base, route))?)
    }
}

#[async_trait]
impl InferenceClient for OpenAiCompatClient {
    async fn run(&self, model: &str, input: RunInput) -> anyhow::Result<Value> {
        let endpoint = self.endpoint()?;
        let payload = json!({
            "model": model,
            "messages": input.messages,
        });
        info!("openai-compatible request {} model={}", endpoint, model);
        let (status, raw) =
            post_json(&self.client, &endpoint, self.api_key.as_deref(), &payload).await?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("status {} error: {}", status, raw));
        }
        match raw["choices"][0]["message"]["content"].as_str() {
            Some(text) => Ok(json!({ "response": text })),
            None => Ok(raw),
        }
    }
}
