use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::analyzer::Analyzer;
use crate::models::{Finding, Location};
use crate::policy::{assemble_document, unescape_raw_policy};
use crate::suppression::{SuppressionConfig, retain_unsuppressed};
use crate::terraform::{DeclarationBody, parse_config_content, scan_declarations};

/// Validate one Terraform file and return the findings that survive suppression.
///
/// A file that cannot be read or parsed yields a single synthetic finding
/// instead of an error.
pub fn validate_file(
    path: &Path,
    analyzer: &dyn Analyzer,
    suppression: Option<&SuppressionConfig>,
) -> Result<Vec<Finding>> {
    let filepath = path.display().to_string();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(%filepath, error = %e, "read failure");
            let message = format!("Failed to read config file: {}", e);
            return Ok(vec![Finding::parse_failure(&filepath, message)]);
        }
    };

    let tree = match parse_config_content(&content) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::debug!(%filepath, error = %e, "parse failure");
            return Ok(vec![Finding::parse_failure(&filepath, e)]);
        }
    };

    let findings = collect_findings(&tree, &filepath, analyzer)?;
    Ok(retain_unsuppressed(findings, suppression))
}

/// Analyze every policy-bearing declaration in the tree, inline policy
/// documents first, then raw policies.
pub fn collect_findings(
    tree: &Value,
    filepath: &str,
    analyzer: &dyn Analyzer,
) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();
    for declaration in scan_declarations(tree) {
        let location = Location::declaration(filepath, &declaration.address);
        let policy = match &declaration.body {
            DeclarationBody::Statements(statements) => {
                assemble_document(statements).to_policy_string()?
            }
            DeclarationBody::RawPolicy { text, escaped: true } => unescape_raw_policy(text),
            DeclarationBody::RawPolicy { text, escaped: false } => text.to_string(),
        };
        tracing::debug!(address = %declaration.address, kind = ?declaration.kind, "analyzing policy");
        findings.extend(analyzer.analyze(&policy, &location));
    }
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::PolicyLinter;
    use crate::models::PARSE_FAILURE_ISSUE;
    use std::cell::RefCell;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tf(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".tf").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// Records every policy it is handed and reports nothing.
    #[derive(Default)]
    struct RecordingAnalyzer {
        seen: RefCell<Vec<(String, Value)>>,
    }

    impl Analyzer for RecordingAnalyzer {
        fn analyze(&self, policy: &str, location: &Location) -> Vec<Finding> {
            let parsed = serde_json::from_str(policy).unwrap_or(Value::Null);
            self.seen.borrow_mut().push((
                location.declaration.clone().unwrap_or_default(),
                parsed,
            ));
            Vec::new()
        }
    }

    #[test]
    fn test_trust_only_document_has_no_findings() {
        let file = write_tf(
            r#"
data "aws_iam_policy_document" "assume" {
  statement {
    actions = ["sts:AssumeRole"]
    principals {
      type        = "Service"
      identifiers = ["ec2.amazonaws.com"]
    }
  }
}
"#,
        );
        let findings = validate_file(file.path(), &PolicyLinter, None).unwrap();
        assert!(findings.is_empty(), "{:?}", findings);
    }

    #[test]
    fn test_wildcard_raw_policy_is_reported() {
        let file = write_tf(
            r#"
resource "aws_iam_policy" "admin" {
  name   = "admin"
  policy = "{\"Version\": \"2012-10-17\", \"Statement\": [{\"Effect\": \"Allow\", \"Action\": \"*\", \"Resource\": \"*\"}]}"
}
"#,
        );
        let findings = validate_file(file.path(), &PolicyLinter, None).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].issue, "ADMIN_ACCESS");
        assert_eq!(
            findings[0].location.declaration.as_deref(),
            Some("aws_iam_policy.admin")
        );
        assert!(findings[0].severity.is_some());
    }

    #[test]
    fn test_placeholder_resources_are_mocked() {
        let file = write_tf(
            r#"
data "aws_iam_policy_document" "read" {
  statement {
    actions   = ["s3:GetObject"]
    resources = ["arn:aws:s3:::${var.bucket}/*"]
  }
}
"#,
        );
        let findings = validate_file(file.path(), &PolicyLinter, None).unwrap();
        assert!(findings.is_empty(), "{:?}", findings);
    }

    #[test]
    fn test_parse_failure_yields_one_finding() {
        let file = write_tf("resource \"aws_iam_policy\" \"broken\" {\n  policy = \n");
        let findings = validate_file(file.path(), &PolicyLinter, None).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].issue, PARSE_FAILURE_ISSUE);
        assert_eq!(findings[0].location.filepath, file.path().display().to_string());
    }

    #[test]
    fn test_collects_documents_then_raw_policies() {
        let tree = parse_config_content(
            r#"
resource "aws_iam_role_policy" "inline" {
  policy = "{}"
}
data "aws_iam_policy_document" "doc" {
  statement {
    actions   = ["sts:AssumeRoleWithSAML"]
  }
  statement {
    effect    = "Deny"
    actions   = ["s3:DeleteBucket"]
    resources = ["*"]
  }
}
resource "aws_iam_policy" "managed_elsewhere" {
  name = "x"
}
"#,
        )
        .unwrap();
        let analyzer = RecordingAnalyzer::default();
        collect_findings(&tree, "main.tf", &analyzer).unwrap();

        let seen = analyzer.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "data.aws_iam_policy_document.doc");
        assert_eq!(seen[0].1["Statement"].as_array().unwrap().len(), 1);
        assert_eq!(seen[0].1["Statement"][0]["Effect"], "Deny");
        assert_eq!(seen[1].0, "aws_iam_role_policy.inline");
    }

    #[test]
    fn test_jsonencode_with_function_calls_is_clean() {
        let file = write_tf(
            r#"
resource "aws_iam_policy" "read" {
  policy = jsonencode({
    Version = "2012-10-17"
    Statement = [{
      Sid      = var.env == "prod" ? "ProdRead" : "Read"
      Effect   = "Allow"
      Action   = "s3:GetObject"
      Resource = format("arn:aws:s3:::%s/*", var.bucket)
    }]
  })
}
"#,
        );
        let findings = validate_file(file.path(), &PolicyLinter, None).unwrap();
        assert!(findings.is_empty(), "{:?}", findings);
    }

    #[test]
    fn test_non_utf8_file_yields_one_finding() {
        let mut file = tempfile::Builder::new().suffix(".tf").tempfile().unwrap();
        file.write_all(b"# caf\xe9\nresource \"aws_iam_policy\" \"x\" {}\n").unwrap();
        let findings = validate_file(file.path(), &PolicyLinter, None).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].issue, PARSE_FAILURE_ISSUE);
        assert!(findings[0].detail.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_missing_file_yields_one_finding() {
        let dir = tempfile::tempdir().unwrap();
        let findings = validate_file(&dir.path().join("gone.tf"), &PolicyLinter, None).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].issue, PARSE_FAILURE_ISSUE);
    }
}
