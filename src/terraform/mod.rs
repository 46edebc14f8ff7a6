mod parser;
mod scanner;

pub use parser::parse_config_content;
pub use scanner::{DeclarationBody, scan_declarations};

/// Extension of the files this tool scans.
pub const TERRAFORM_EXTENSION: &str = ".tf";
