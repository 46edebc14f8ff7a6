use anyhow::Result;
use serde::Serialize;

use super::mapper::CanonicalStatement;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const POLICY_ID: &str = "123";

/// A complete policy document built from one declaration's statements.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: &'static str,
    pub id: &'static str,
    pub statement: Vec<CanonicalStatement>,
}

impl PolicyDocument {
    pub fn new(statements: Vec<CanonicalStatement>) -> Self {
        PolicyDocument {
            version: POLICY_VERSION,
            id: POLICY_ID,
            statement: statements,
        }
    }

    /// Serialize to the JSON text handed to the analyzer.
    pub fn to_policy_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
