use serde_json::Value;

/// Fields checked, in order, for the reply text on an inference result.
pub const REPLY_FIELDS: [&str; 3] = ["response", "result", "output"];

/// Pulls a reply string out of an untyped inference result.
///
/// The first of `response`, `result`, `output` that is present and not `null`
/// wins; a non-string value there is rendered as compact JSON. Failing that, a
/// bare string result is used as is, and anything else becomes the JSON text
/// of the whole result.
pub fn extract_reply(result: &Value) -> String {
    if let Some(found) = REPLY_FIELDS
        .iter()
        .find_map(|field| result.get(*field).filter(|v| !v.is_null()))
    {
        return render(found);
    }
    render(result)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => integral_floats_as_ints(other).to_string(),
    }
}

// Exclusive bound for an exact f64 -> i64 cast (2^63).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Whole-number floats print without a fraction (`1.0` -> `1`, `1e3` ->
/// `1000`), matching how JavaScript serializes numbers.
fn integral_floats_as_ints(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < I64_BOUND)
            .map(|f| Value::from(f as i64))
            .unwrap_or_else(|| value.clone()),
        Value::Array(items) => Value::Array(items.iter().map(integral_floats_as_ints).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), integral_floats_as_ints(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
