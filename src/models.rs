use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Four-level severity attached to findings during enrichment.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Higher rank means more severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 3,
            Severity::High => 2,
            Severity::Medium => 1,
            Severity::Low => 0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// Finding detail: either free text or an ordered list of field records.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Detail {
    Text(String),
    Fields(Vec<Map<String, Value>>),
}

impl Detail {
    /// Build a single-record detail from key/value pairs, keeping their order.
    pub fn fields<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let record = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Detail::Fields(vec![record])
    }
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Detail::Text(text) => write!(f, "{}", text),
            Detail::Fields(records) => {
                let lines: Vec<String> = records
                    .iter()
                    .map(|record| {
                        record
                            .iter()
                            .map(|(k, v)| match v {
                                Value::String(s) => format!("{}: {}", k, s),
                                other => format!("{}: {}", k, other),
                            })
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect();
                write!(f, "{}", lines.join("\n  "))
            }
        }
    }
}

/// Where a finding came from.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub filepath: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<String>,
}

impl Location {
    pub fn file(filepath: impl Into<String>) -> Self {
        Location {
            filepath: filepath.into(),
            declaration: None,
        }
    }

    pub fn declaration(filepath: impl Into<String>, declaration: impl Into<String>) -> Self {
        Location {
            filepath: filepath.into(),
            declaration: Some(declaration.into()),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.declaration {
            Some(decl) => write!(f, "filepath: {}, declaration: {}", self.filepath, decl),
            None => write!(f, "filepath: {}", self.filepath),
        }
    }
}

/// One issue reported against a policy document or raw policy string.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Finding {
    pub issue: String,
    pub detail: Detail,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub const PARSE_FAILURE_ISSUE: &str = "FAILED_TO_PARSE";

impl Finding {
    pub fn new(issue: impl Into<String>, detail: Detail, location: Location) -> Self {
        Finding {
            issue: issue.into(),
            detail,
            location,
            severity: None,
            title: None,
            description: None,
        }
    }

    /// Synthetic finding standing in for a file that could not be parsed.
    pub fn parse_failure(filepath: &str, error: impl std::fmt::Display) -> Self {
        Finding {
            issue: PARSE_FAILURE_ISSUE.to_string(),
            detail: Detail::Text(error.to_string()),
            location: Location::file(filepath),
            severity: Some(Severity::High),
            title: Some("Failed to parse file".to_string()),
            description: None,
        }
    }
}

/// Retained findings grouped by file.
#[derive(Debug, Serialize)]
pub struct FileFindings {
    pub path: String,
    pub findings: Vec<Finding>,
}

/// Top-level report for one run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub checked_at: String,
    pub total_files_checked: usize,
    pub files_with_findings: usize,
    pub total_findings: usize,
    pub files: Vec<FileFindings>,
}

impl RunReport {
    pub fn has_findings(&self) -> bool {
        self.total_findings > 0
    }
}
