pub mod catalog;
mod linter;

pub use linter::PolicyLinter;

use crate::models::{Finding, Location};

/// A policy analysis engine: takes policy JSON text and reports findings
/// located at `location`.
pub trait Analyzer {
    fn analyze(&self, policy: &str, location: &Location) -> Vec<Finding>;
}
