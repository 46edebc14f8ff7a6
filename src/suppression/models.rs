use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::Severity;

// ========== Suppression File Definition (deserialized from YAML/TOML) ==========

/// Top-level suppression file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuppressionFile {
    /// Findings ranked below this severity are dropped.
    pub minimum_severity: Option<Severity>,
    #[serde(default)]
    pub issues: HashMap<String, IssueOverride>,
}

/// Per-issue overrides and suppressions.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueOverride {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    /// Drop every finding with this issue.
    #[serde(default)]
    pub ignore: bool,
    #[serde(default)]
    pub ignore_locations: Vec<IgnoreLocation>,
}

/// Regexes matched in full (case-insensitive) against a finding's location.
/// All given keys must match.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreLocation {
    pub filepath: Option<String>,
    pub declaration: Option<String>,
}

// ========== Compiled form (used while filtering) ==========

#[derive(Debug, Default)]
pub struct SuppressionConfig {
    pub minimum_severity: Option<Severity>,
    pub issues: HashMap<String, CompiledOverride>,
}

#[derive(Debug, Default)]
pub struct CompiledOverride {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub ignore: bool,
    pub ignore_locations: Vec<LocationMatcher>,
}

#[derive(Debug)]
pub struct LocationMatcher {
    pub filepath: Option<Regex>,
    pub declaration: Option<Regex>,
}
