use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::models::Severity;

/// Default metadata for an issue code.
pub struct IssueInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub severity: Severity,
}

lazy_static! {
    pub static ref ISSUE_CATALOG: HashMap<&'static str, IssueInfo> = {
        let mut catalog = HashMap::new();
        catalog.insert("MALFORMED_JSON", IssueInfo {
            title: "Policy is not valid JSON",
            description: "The policy text could not be parsed as JSON.",
            severity: Severity::High,
        });
        catalog.insert("MALFORMED", IssueInfo {
            title: "Malformed policy",
            description: "The policy does not follow the IAM policy grammar.",
            severity: Severity::High,
        });
        catalog.insert("NO_VERSION", IssueInfo {
            title: "Policy has no Version",
            description: "Without a Version element IAM falls back to 2008-10-17, which disables policy variables.",
            severity: Severity::Low,
        });
        catalog.insert("OLD_VERSION", IssueInfo {
            title: "Policy uses the old version",
            description: "Version 2008-10-17 does not support policy variables.",
            severity: Severity::Low,
        });
        catalog.insert("INVALID_VERSION", IssueInfo {
            title: "Unknown policy Version",
            description: "Version must be 2012-10-17 or 2008-10-17.",
            severity: Severity::High,
        });
        catalog.insert("INVALID_ACTION", IssueInfo {
            title: "Action is not well formed",
            description: "Actions must be \"*\" or of the form service:ActionName.",
            severity: Severity::Medium,
        });
        catalog.insert("ADMIN_ACCESS", IssueInfo {
            title: "Statement grants all actions on all resources",
            description: "Allowing \"*\" on \"*\" is full administrator access.",
            severity: Severity::Critical,
        });
        catalog.insert("SERVICE_WILDCARD", IssueInfo {
            title: "Statement grants every action of a service on all resources",
            description: "A service:* action on \"*\" rarely reflects least privilege.",
            severity: Severity::High,
        });
        catalog.insert("NOTACTION_WITH_ALLOW", IssueInfo {
            title: "Allow combined with NotAction",
            description: "Allow with NotAction grants every action except those listed, including future ones.",
            severity: Severity::Medium,
        });
        catalog.insert("NOTRESOURCE_WITH_ALLOW", IssueInfo {
            title: "Allow combined with NotResource",
            description: "Allow with NotResource grants access to every resource except those listed.",
            severity: Severity::Medium,
        });
        catalog.insert("DUPLICATE_SID", IssueInfo {
            title: "Duplicate statement Sid",
            description: "Statement ids must be unique within a policy.",
            severity: Severity::Medium,
        });
        catalog
    };
}

pub fn lookup(issue: &str) -> Option<&'static IssueInfo> {
    ISSUE_CATALOG.get(issue)
}
