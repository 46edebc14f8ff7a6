mod document;
mod mapper;
mod placeholder;

pub use document::PolicyDocument;
pub use mapper::{CanonicalStatement, map_statement};

use serde_json::{Map, Value};

/// Build the policy document for one inline declaration, skipping trust statements.
pub fn assemble_document(statements: &[&Map<String, Value>]) -> PolicyDocument {
    PolicyDocument::new(statements.iter().filter_map(|raw| map_statement(raw)).collect())
}

/// Raw policy strings are stored with escaped quotes.
pub fn unescape_raw_policy(policy: &str) -> String {
    policy.replace("\\\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_raw_policy() {
        assert_eq!(
            unescape_raw_policy(r#"{\"Effect\": \"Allow\"}"#),
            r#"{"Effect": "Allow"}"#
        );
        assert_eq!(unescape_raw_policy(r#"{"Effect": "Allow"}"#), r#"{"Effect": "Allow"}"#);
    }
}
