use serde::Serialize;
use serde_json::{Map, Value};

use super::placeholder::normalize_value;

/// How one authored statement field maps onto the canonical policy schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub source: &'static str,
    pub canonical: &'static str,
    /// Substituted for `${...}` interpolations in this field.
    pub mock: &'static str,
}

pub const FIELD_MAPPINGS: &[FieldMapping] = &[
    FieldMapping { source: "sid", canonical: "Sid", mock: "" },
    FieldMapping { source: "effect", canonical: "Effect", mock: "Allow" },
    FieldMapping { source: "actions", canonical: "Action", mock: "*" },
    FieldMapping { source: "not_actions", canonical: "NotAction", mock: "*" },
    FieldMapping { source: "resources", canonical: "Resource", mock: "*" },
    FieldMapping { source: "not_resources", canonical: "NotResource", mock: "*" },
];

/// Trust-policy actions; statements granting exactly one of these are not mapped.
pub const TRUST_ACTIONS: &[&str] = &["sts:AssumeRole", "sts:AssumeRoleWithSAML"];

const DEFAULT_EFFECT: &str = "Allow";

/// A statement in canonical IAM form (`Effect`, `Action`, `Resource`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalStatement(Map<String, Value>);

/// Authored fields arrive wrapped in a one-element list.
fn unwrap_field(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// True when the statement's actions are exactly one trust action.
pub fn is_trust_statement(raw: &Map<String, Value>) -> bool {
    let Some(Value::Array(actions)) = raw.get("actions").and_then(unwrap_field) else {
        return false;
    };
    matches!(actions.as_slice(), [Value::String(action)] if TRUST_ACTIONS.contains(&action.as_str()))
}

/// Map one authored statement to canonical form, or `None` for trust statements.
///
/// Only fields present in the authored statement are emitted, except
/// `Effect`, which defaults to `Allow`.
pub fn map_statement(raw: &Map<String, Value>) -> Option<CanonicalStatement> {
    if is_trust_statement(raw) {
        return None;
    }

    let mut statement = Map::new();
    statement.insert("Effect".to_string(), Value::from(DEFAULT_EFFECT));

    for field in FIELD_MAPPINGS {
        let Some(value) = raw.get(field.source).and_then(unwrap_field) else {
            continue;
        };
        if !is_present(value) {
            continue;
        }
        statement.insert(field.canonical.to_string(), normalize_value(value, field.mock));
    }

    Some(CanonicalStatement(statement))
}
