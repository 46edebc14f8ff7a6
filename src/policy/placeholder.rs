use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use serde_json::Value;
use std::borrow::Cow;

lazy_static! {
    /// Terraform interpolation, matched non-greedily: `${var.name}`.
    static ref PLACEHOLDER: Regex = Regex::new(r"\$\{.*?\}").unwrap();
}

/// Replace every `${...}` in `text` with `mock`. Unterminated `${` is left as is.
pub fn normalize_str<'t>(text: &'t str, mock: &str) -> Cow<'t, str> {
    PLACEHOLDER.replace_all(text, NoExpand(mock))
}

/// Normalize a field value: a string, or element-wise over a list of strings.
/// Values of any other shape pass through untouched.
pub fn normalize_value(value: &Value, mock: &str) -> Value {
    match value {
        Value::String(s) => Value::String(normalize_str(s, mock).into_owned()),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Value::String(normalize_str(s, mock).into_owned()),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
