use anyhow::{Context, Result, ensure};
use regex::Regex;
use std::path::Path;

use super::models::{
    CompiledOverride, IgnoreLocation, LocationMatcher, SuppressionConfig, SuppressionFile,
};

/// Load, validate and compile a suppression file from disk.
/// `.toml` files are read as TOML, anything else as YAML.
pub fn load_suppression(path: &Path) -> Result<SuppressionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let file: SuppressionFile = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
        _ => {
            if content.trim().is_empty() {
                SuppressionFile::default()
            } else {
                serde_yaml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
        }
    };

    compile(file)
}

/// Load the config unless it is missing and `optional` is set, in which
/// case a warning is printed and no suppression applies.
pub fn load_suppression_if_present(path: &Path, optional: bool) -> Result<Option<SuppressionConfig>> {
    if optional && !path.exists() {
        eprintln!(
            "Warning: config file {} not found, continuing without suppression",
            path.display()
        );
        return Ok(None);
    }
    load_suppression(path).map(Some)
}

fn compile(file: SuppressionFile) -> Result<SuppressionConfig> {
    let mut issues = std::collections::HashMap::new();
    for (issue, definition) in file.issues {
        let mut ignore_locations = Vec::new();
        for location in &definition.ignore_locations {
            ignore_locations.push(compile_location(&issue, location)?);
        }
        issues.insert(
            issue,
            CompiledOverride {
                title: definition.title,
                description: definition.description,
                severity: definition.severity,
                ignore: definition.ignore,
                ignore_locations,
            },
        );
    }
    Ok(SuppressionConfig {
        minimum_severity: file.minimum_severity,
        issues,
    })
}

fn compile_location(issue: &str, location: &IgnoreLocation) -> Result<LocationMatcher> {
    ensure!(
        location.filepath.is_some() || location.declaration.is_some(),
        "Empty ignore_locations entry for issue '{}'",
        issue
    );
    Ok(LocationMatcher {
        filepath: location
            .filepath
            .as_deref()
            .map(|p| full_match(issue, p))
            .transpose()?,
        declaration: location
            .declaration
            .as_deref()
            .map(|p| full_match(issue, p))
            .transpose()?,
    })
}

fn full_match(issue: &str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i)^(?:{})$", pattern))
        .with_context(|| format!("Invalid regex in ignore_locations for '{}': {}", issue, pattern))
}
