use serde_json::Value;

pub const DEFAULT_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";

pub const ALLOWED_MODELS: [&str; 3] = [
    "@cf/meta/llama-3.1-8b-instruct",
    "@cf/meta/llama-3.1-70b-instruct",
    "@cf/mistral/mistral-7b-instruct-v0.2",
];

/// Picks the model for a request body. Unknown, empty or non-string values
/// are silently replaced by [`DEFAULT_MODEL`].
pub fn select_model(body: &Value) -> &'static str {
    body.get("model")
        .and_then(Value::as_str)
        .and_then(|requested| ALLOWED_MODELS.iter().copied().find(|m| *m == requested))
        .unwrap_or(DEFAULT_MODEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_on_the_allow_list() {
        assert_eq!(select_model(&json!({ "model": DEFAULT_MODEL })), DEFAULT_MODEL);
        assert!(ALLOWED_MODELS.iter().any(|m| *m == DEFAULT_MODEL));
    }

    #[test]
    fn exact_allow_list_entries_are_used() {
        for model in ALLOWED_MODELS {
            assert_eq!(select_model(&json!({ "model": model })), model);
        }
    }

    #[test]
    fn everything_else_falls_back_to_default() {
        for body in [
            json!({}),
            json!({"model": ""}),
            json!({"model": null}),
            json!({"model": 8}),
            json!({"model": ["@cf/meta/llama-3.1-70b-instruct"]}),
            json!({"model": "@cf/meta/llama-3.1-70b-instruct "}),
            json!({"model": "@CF/META/LLAMA-3.1-70B-INSTRUCT"}),
            json!({"model": "gpt-4o"}),
            json!("@cf/meta/llama-3.1-70b-instruct"),
        ] {
            assert_eq!(select_model(&body), DEFAULT_MODEL, "body: {body}");
        }
    }
}
