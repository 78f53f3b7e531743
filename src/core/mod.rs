pub mod message;
pub mod model;
pub mod reply;

use serde_json::Value;

use crate::core::message::{ChatMessage, normalize_messages};
use crate::core::model::select_model;

/// A parsed `/api/chat` body reduced to what the inference call needs.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedChat {
    pub model: &'static str,
    pub messages: Vec<ChatMessage>,
}

impl PreparedChat {
    /// Accepts any JSON value; anything that isn't the expected shape degrades
    /// to the default model and the bare system prompt.
    pub fn from_body(body: &Value) -> Self {
        Self {
            model: select_model(body),
            messages: normalize_messages(body),
        }
    }
}
