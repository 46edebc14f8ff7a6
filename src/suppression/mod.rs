mod loader;
mod models;

pub use loader::load_suppression_if_present;
pub use models::SuppressionConfig;

use crate::analyzer::catalog;
use crate::models::Finding;

impl SuppressionConfig {
    /// True if the config drops this finding.
    pub fn is_suppressed(&self, finding: &Finding) -> bool {
        if let (Some(minimum), Some(severity)) = (self.minimum_severity, finding.severity)
            && severity.rank() < minimum.rank()
        {
            return true;
        }

        let Some(definition) = self.issues.get(&finding.issue) else {
            return false;
        };
        if definition.ignore {
            return true;
        }
        definition.ignore_locations.iter().any(|matcher| {
            let filepath_matches = matcher
                .filepath
                .as_ref()
                .is_none_or(|re| re.is_match(&finding.location.filepath));
            let declaration_matches = matcher.declaration.as_ref().is_none_or(|re| {
                finding
                    .location
                    .declaration
                    .as_deref()
                    .is_some_and(|decl| re.is_match(decl))
            });
            filepath_matches && declaration_matches
        })
    }
}

/// Fill in title, description and severity from the issue catalog,
/// letting the config's overrides win.
fn enrich_with(config: Option<&SuppressionConfig>, mut finding: Finding) -> Finding {
    let definition = config.and_then(|c| c.issues.get(&finding.issue));
    let defaults = catalog::lookup(&finding.issue);

    if let Some(title) = definition.and_then(|d| d.title.clone()) {
        finding.title = Some(title);
    } else if finding.title.is_none() {
        finding.title = defaults.map(|info| info.title.to_string());
    }
    if let Some(description) = definition.and_then(|d| d.description.clone()) {
        finding.description = Some(description);
    } else if finding.description.is_none() {
        finding.description = defaults.map(|info| info.description.to_string());
    }
    if let Some(severity) = definition.and_then(|d| d.severity) {
        finding.severity = Some(severity);
    } else if finding.severity.is_none() {
        finding.severity = defaults.map(|info| info.severity);
    }
    finding
}

/// Enrich every finding and keep those the config does not suppress.
/// Without a config, findings are only enriched from the catalog.
pub fn retain_unsuppressed(findings: Vec<Finding>, config: Option<&SuppressionConfig>) -> Vec<Finding> {
    findings
        .into_iter()
        .map(|finding| enrich_with(config, finding))
        .filter(|finding| !config.is_some_and(|c| c.is_suppressed(finding)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Detail, Location, Severity};
    use super::models::{CompiledOverride, LocationMatcher};
    use regex::Regex;

    fn finding(issue: &str, filepath: &str, declaration: &str) -> Finding {
        Finding::new(
            issue,
            Detail::Text(String::new()),
            Location::declaration(filepath, declaration),
        )
    }

    fn config_with(issue: &str, definition: CompiledOverride) -> SuppressionConfig {
        let mut config = SuppressionConfig::default();
        config.issues.insert(issue.to_string(), definition);
        config
    }

    #[test]
    fn test_enrich_from_catalog() {
        let enriched = enrich_with(None, finding("ADMIN_ACCESS", "main.tf", "aws_iam_policy.a"));
        assert_eq!(enriched.severity, Some(Severity::Critical));
        assert!(enriched.title.is_some());
        assert!(enriched.description.is_some());
    }

    #[test]
    fn test_enrich_override_wins() {
        let config = config_with(
            "ADMIN_ACCESS",
            CompiledOverride {
                severity: Some(Severity::Low),
                title: Some("Break-glass role".to_string()),
                ..Default::default()
            },
        );
        let enriched = enrich_with(Some(&config), finding("ADMIN_ACCESS", "main.tf", "aws_iam_policy.a"));
        assert_eq!(enriched.severity, Some(Severity::Low));
        assert_eq!(enriched.title.as_deref(), Some("Break-glass role"));
    }

    #[test]
    fn test_ignore_issue() {
        let config = config_with(
            "NO_VERSION",
            CompiledOverride {
                ignore: true,
                ..Default::default()
            },
        );
        let kept = retain_unsuppressed(
            vec![
                finding("NO_VERSION", "main.tf", "aws_iam_policy.a"),
                finding("ADMIN_ACCESS", "main.tf", "aws_iam_policy.a"),
            ],
            Some(&config),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].issue, "ADMIN_ACCESS");
    }

    #[test]
    fn test_minimum_severity() {
        let config = SuppressionConfig {
            minimum_severity: Some(Severity::High),
            ..Default::default()
        };
        let kept = retain_unsuppressed(
            vec![
                finding("OLD_VERSION", "main.tf", "aws_iam_policy.a"),
                finding("SERVICE_WILDCARD", "main.tf", "aws_iam_policy.a"),
            ],
            Some(&config),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].issue, "SERVICE_WILDCARD");
    }

    #[test]
    fn test_ignore_locations_require_all_keys() {
        let config = config_with(
            "ADMIN_ACCESS",
            CompiledOverride {
                ignore_locations: vec![LocationMatcher {
                    filepath: Some(Regex::new("(?i)^(?:legacy/.*)$").unwrap()),
                    declaration: Some(Regex::new("(?i)^(?:aws_iam_policy\\.admin)$").unwrap()),
                }],
                ..Default::default()
            },
        );
        assert!(config.is_suppressed(&finding("ADMIN_ACCESS", "legacy/iam.tf", "aws_iam_policy.admin")));
        assert!(!config.is_suppressed(&finding("ADMIN_ACCESS", "legacy/iam.tf", "aws_iam_policy.ops")));
        assert!(!config.is_suppressed(&finding("ADMIN_ACCESS", "prod/iam.tf", "aws_iam_policy.admin")));
        assert!(!config.is_suppressed(&finding("SERVICE_WILDCARD", "legacy/iam.tf", "aws_iam_policy.admin")));
    }

    #[test]
    fn test_no_config_keeps_everything() {
        let kept = retain_unsuppressed(
            vec![finding("OLD_VERSION", "main.tf", "aws_iam_policy.a")],
            None,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].severity, Some(Severity::Low));
    }
}
