use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Lenient conversion from an untrusted JSON entry. Returns `None` unless
    /// `role` is one of the known role strings and `content` is a string;
    /// every other field is ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let role = value.get("role")?.as_str()?.parse::<Role>().ok()?;
        let content = value.get("content")?.as_str()?;
        Some(Self {
            role,
            content: content.to_string(),
        })
    }
}

/// Builds the prompt sent upstream: the fixed system message followed by the
/// caller's history with invalid entries dropped. Order is preserved.
pub fn normalize_messages(body: &Value) -> Vec<ChatMessage> {
    let supplied: &[Value] = body
        .get("messages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    std::iter::once(ChatMessage::system(SYSTEM_PROMPT))
        .chain(supplied.iter().filter_map(ChatMessage::from_value))
        .collect()
}
