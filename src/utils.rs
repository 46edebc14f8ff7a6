use glob::MatchOptions;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::terraform::TERRAFORM_EXTENSION;

/// Check if a path is a Terraform file
pub fn is_terraform(p: &Path) -> bool {
    p.is_file()
        && p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(TERRAFORM_EXTENSION))
}

fn is_hidden(p: &Path) -> bool {
    p.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Expand path arguments into the Terraform files to check, in argument order.
///
/// A directory contributes its immediate (non-hidden) entries, sorted by name;
/// anything else is treated as a glob pattern. Non-Terraform matches are dropped.
pub fn expand_paths(args: &[String]) -> Vec<PathBuf> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut files = Vec::new();

    for arg in args {
        let path = Path::new(arg);
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if !is_hidden(p) && is_terraform(p) {
                    files.push(p.to_path_buf());
                }
            }
            continue;
        }

        let matches = match glob::glob_with(arg, options) {
            Ok(matches) => matches,
            Err(e) => {
                eprintln!("Warning: Invalid path pattern {}: {}", arg, e);
                continue;
            }
        };
        let before = files.len();
        files.extend(matches.filter_map(|m| m.ok()).filter(|p| is_terraform(p)));
        if files.len() == before {
            tracing::debug!(pattern = %arg, "no Terraform files matched");
        }
    }

    files
}
