use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod analyzer;
mod lint;
mod models;
mod output;
mod policy;
mod suppression;
mod terraform;
mod utils;
mod validate;

#[derive(Parser)]
#[command(
    name = "tfpolicy",
    about = "Lint IAM policies embedded in Terraform configurations"
)]
struct Cli {
    /// Terraform files, directories, or glob patterns to check
    #[arg(required = true)]
    paths: Vec<String>,
    /// Quiet mode - only print if policy errors
    #[arg(short, long)]
    quiet: bool,
    /// Also print files without findings
    #[arg(short, long)]
    verbose: bool,
    /// Suppression config file (YAML or TOML)
    #[arg(short, long)]
    config: Option<String>,
    /// Treat a missing config file as a warning
    #[arg(long)]
    config_is_optional: bool,
    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,
    /// Write JSON output to file instead of stdout
    #[arg(long)]
    output: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let options = lint::LintOptions {
        config: cli.config.as_deref(),
        config_is_optional: cli.config_is_optional,
        format: &cli.format,
        output_file: cli.output.as_deref(),
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    let has_findings = lint::lint(&cli.paths, &analyzer::PolicyLinter, &options)?;
    if has_findings {
        std::process::exit(1);
    }
    Ok(())
}
