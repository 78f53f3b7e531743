use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::message::ChatMessage;

/// Input handed to the inference capability alongside the model id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunInput {
    pub messages: Vec<ChatMessage>,
}

/// The external model runner. Results are opaque JSON; the caller decides how
/// to read a reply out of them.
#[async_trait]
pub trait InferenceClient {
    async fn run(&self, model: &str, input: RunInput) -> anyhow::Result<serde_json::Value>;
}
