use serde_json::{Map, Value};
use std::borrow::Cow;

pub const POLICY_DOCUMENT_KIND: &str = "aws_iam_policy_document";

/// Resource types whose `policy` attribute holds a raw JSON policy.
pub const RAW_POLICY_KINDS: &[&str] = &[
    "aws_iam_policy",
    "aws_iam_role_policy",
    "aws_iam_user_policy",
    "aws_iam_group_policy",
];

const RAW_POLICY_FIELD: &str = "policy";

/// Discriminator for one section entry, computed once during the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    InlinePolicyDocument,
    RawPolicy,
    Other,
}

/// What a discovered declaration carries into the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationBody<'a> {
    /// Statements in source order, still in their authored shape.
    Statements(Vec<&'a Map<String, Value>>),
    /// Raw policy text. `escaped` is set for string attributes, whose
    /// quotes may still be `\"`-escaped; text serialized from a
    /// `jsonencode` structure is never escaped.
    RawPolicy { text: Cow<'a, str>, escaped: bool },
}

/// A policy-bearing declaration found in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration<'a> {
    pub kind: DeclarationKind,
    /// Terraform address, e.g. `data.aws_iam_policy_document.read`.
    pub address: String,
    pub body: DeclarationBody<'a>,
}

/// Classify a section entry by the resource type it declares.
pub fn classify(section: &str, resource_type: &str) -> DeclarationKind {
    match section {
        "data" if resource_type == POLICY_DOCUMENT_KIND => DeclarationKind::InlinePolicyDocument,
        "resource" if RAW_POLICY_KINDS.contains(&resource_type) => DeclarationKind::RawPolicy,
        _ => DeclarationKind::Other,
    }
}

/// Walk the `data` and `resource` sections and return every policy-bearing
/// declaration, inline policy documents first, each in source order.
pub fn scan_declarations(tree: &Value) -> Vec<Declaration<'_>> {
    let mut declarations = Vec::new();
    for section in ["data", "resource"] {
        for (resource_type, name, body) in section_entries(tree, section) {
            let kind = classify(section, resource_type);
            let address = match section {
                "data" => format!("data.{}.{}", resource_type, name),
                _ => format!("{}.{}", resource_type, name),
            };
            match kind {
                DeclarationKind::InlinePolicyDocument => declarations.push(Declaration {
                    kind,
                    address,
                    body: DeclarationBody::Statements(statements(body)),
                }),
                DeclarationKind::RawPolicy => match raw_policy(body) {
                    Some(body) => declarations.push(Declaration {
                        kind,
                        address,
                        body,
                    }),
                    None => {
                        tracing::debug!(%address, "no inline policy attribute, skipping");
                    }
                },
                DeclarationKind::Other => {}
            }
        }
    }
    declarations
}

/// Flatten a section into `(type, name, body)` triples.
fn section_entries<'a>(
    tree: &'a Value,
    section: &'static str,
) -> impl Iterator<Item = (&'a str, &'a str, &'a Map<String, Value>)> + 'a {
    tree.get(section)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|entry| entry.iter())
        .filter_map(|(resource_type, named)| {
            named.as_object().map(|named| (resource_type.as_str(), named))
        })
        .flat_map(|(resource_type, named)| {
            named.iter().filter_map(move |(name, body)| {
                body.as_object()
                    .map(|body| (resource_type, name.as_str(), body))
            })
        })
}

fn statements(body: &Map<String, Value>) -> Vec<&Map<String, Value>> {
    body.get("statement")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

fn raw_policy(body: &Map<String, Value>) -> Option<DeclarationBody<'_>> {
    let value = match body.get(RAW_POLICY_FIELD)? {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match value {
        Value::String(text) => Some(DeclarationBody::RawPolicy {
            text: Cow::Borrowed(text.as_str()),
            escaped: true,
        }),
        Value::Object(_) | Value::Array(_) => Some(DeclarationBody::RawPolicy {
            text: Cow::Owned(value.to_string()),
            escaped: false,
        }),
        _ => None,
    }
}
