use crate::llm::adapter::{InferenceClient, RunInput};
use crate::llm::transport::{HttpClient, build_client, post_json};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Client for the hosted Workers AI REST API.
///
/// The API wraps model output in `{ success, errors, messages, result }`; the
/// client unwraps `result` so callers see the same value the in-platform
/// binding would hand back.
#[derive(Clone)]
pub struct WorkersAiClient {
    pub base_url: Url,
    pub account_id: String,
    api_token: String,
    client: HttpClient,
}

impl WorkersAiClient {
    pub fn new(base_url: Url, account_id: String, api_token: String) -> Self {
        Self {
            base_url,
            account_id,
            api_token,
            client: build_client(),
        }
    }

    pub fn endpoint(&self, model: &str) -> anyhow::Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let url = Url::parse(&format!(
            "{}/accounts/{}/ai/run/{}",
            base, self.account_id, model
        ))?;
        Ok(url)
    }
}

#[async_trait]
impl InferenceClient for WorkersAiClient {
    async fn run(&self, model: &str, input: RunInput) -> anyhow::Result<Value> {
        let endpoint = self.endpoint(model)?;
        let payload = serde_json::to_value(&input)?;
        info!("workers ai run model={}", model);
        let token = Some(self.api_token.as_str());
        let (status, raw) = post_json(&self.client, &endpoint, token, &payload).await?;
        let rejected = raw.get("success").and_then(Value::as_bool) == Some(false);
        if !status.is_success() || rejected {
            let detail = raw.get("errors").unwrap_or(&raw);
            return Err(anyhow::anyhow!("workers ai status {} error: {}", status, detail));
        }
        Ok(unwrap_envelope(raw))
    }
}

fn unwrap_envelope(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) => match map.remove("result") {
            Some(result) => result,
            None => Value::Object(map),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{ChatMessage, Role};
    use crate::llm::test_support::spawn_upstream;
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::json;

    async fn fake_run(
        Path((account, model)): Path<(String, String)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Json(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": {
                "response": "pong",
                "account": account,
                "model": model,
                "auth": auth,
                "sent": body["messages"].as_array().map(|m| m.len()).unwrap_or(0),
            }
        }))
    }

    async fn rejecting() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "errors": [{"code": 5007, "message": "No such model"}],
                "result": null
            })),
        )
    }

    fn input() -> RunInput {
        RunInput {
            messages: vec![
                ChatMessage::system("sys"),
                ChatMessage {
                    role: Role::User,
                    content: "ping".to_string(),
                },
            ],
        }
    }

    #[test]
    fn endpoint_joins_account_and_model() {
        let client = WorkersAiClient::new(
            Url::parse("https://api.cloudflare.com/client/v4/").unwrap(),
            "acct".to_string(),
            "tok".to_string(),
        );
        let url = client.endpoint("@cf/meta/llama-3.1-8b-instruct").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acct/ai/run/@cf/meta/llama-3.1-8b-instruct"
        );
    }

    #[tokio::test]
    async fn returns_inner_result() -> anyhow::Result<()> {
        let app = Router::new().route(
            "/client/v4/accounts/{account}/ai/run/{*model}",
            post(fake_run),
        );
        let addr = spawn_upstream(app).await;
        let base = Url::parse(&format!("http://{}/client/v4", addr))?;
        let client = WorkersAiClient::new(base, "acct-1".to_string(), "secret".to_string());

        let result = client.run("@cf/meta/llama-3.1-8b-instruct", input()).await?;
        assert_eq!(result["response"], "pong");
        assert_eq!(result["account"], "acct-1");
        assert_eq!(result["model"], "@cf/meta/llama-3.1-8b-instruct");
        assert_eq!(result["auth"], "Bearer secret");
        assert_eq!(result["sent"], 2);
        Ok(())
    }

    #[tokio::test]
    async fn api_errors_become_errors() -> anyhow::Result<()> {
        let app = Router::new().route("/accounts/{account}/ai/run/{*model}", post(rejecting));
        let addr = spawn_upstream(app).await;
        let base = Url::parse(&format!("http://{}", addr))?;
        let client = WorkersAiClient::new(base, "acct".to_string(), "tok".to_string());

        let err = client.run("@cf/unknown", input()).await.unwrap_err();
        assert!(err.to_string().contains("No such model"), "{err}");
        Ok(())
    }

    #[tokio::test]
    async fn unsuccessful_envelope_with_ok_status_is_an_error() -> anyhow::Result<()> {
        let app = Router::new().route(
            "/accounts/{account}/ai/run/{*model}",
            post(|| async {
                Json(json!({
                    "success": false,
                    "errors": [{"code": 3040, "message": "Capacity temporarily exceeded"}],
                    "result": {"response": "should not be used"}
                }))
            }),
        );
        let addr = spawn_upstream(app).await;
        let base = Url::parse(&format!("http://{}", addr))?;
        let client = WorkersAiClient::new(base, "acct".to_string(), "tok".to_string());

        let err = client
            .run("@cf/meta/llama-3.1-8b-instruct", input())
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("200"), "{text}");
        assert!(text.contains("Capacity temporarily exceeded"), "{text}");
        Ok(())
    }

    #[test]
    fn envelope_without_result_is_kept_whole() {
        let raw = json!({"success": true, "something": 1});
        assert_eq!(unwrap_envelope(raw.clone()), raw);
        assert_eq!(unwrap_envelope(json!("bare")), json!("bare"));
    }
}
