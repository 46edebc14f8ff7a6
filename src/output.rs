use anyhow::Result;
use std::fs;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::models::{Finding, RunReport};

/// Output results as JSON.
pub fn output_json(report: &RunReport, output_file: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    if let Some(file_path) = output_file {
        fs::write(file_path, json)?;
        println!("Wrote findings report to {}", file_path);
    } else {
        println!("{}", json);
    }
    Ok(())
}

/// Output results to terminal with colors.
///
/// Files with findings get a red header and one block per finding. Clean
/// files are listed only when `verbose`; the closing banner is skipped
/// when `quiet`.
pub fn output_terminal(report: &RunReport, quiet: bool, verbose: bool) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    for file in &report.files {
        if file.findings.is_empty() {
            if verbose {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                write!(&mut stdout, "{} VALID", file.path)?;
                stdout.reset()?;
                writeln!(&mut stdout)?;
            }
            continue;
        }

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(&mut stdout, "{}", file.path)?;
        stdout.reset()?;
        writeln!(&mut stdout)?;

        for finding in &file.findings {
            write_finding(&mut stdout, finding)?;
        }
        writeln!(&mut stdout)?;
    }

    if !report.has_findings() && !quiet {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(&mut stdout, "No errors found")?;
        stdout.reset()?;
        writeln!(&mut stdout)?;
    }

    Ok(())
}

fn write_finding(stdout: &mut StandardStream, finding: &Finding) -> Result<()> {
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    if let Some(severity) = finding.severity {
        write!(stdout, "[{}] ", severity)?;
    }
    write!(stdout, "{}", finding.issue)?;
    if let Some(title) = &finding.title {
        write!(stdout, " - {}", title)?;
    }
    stdout.reset()?;
    writeln!(stdout)?;
    writeln!(stdout, "Details:\n  {}", finding.detail)?;
    writeln!(stdout, "Location:\n  {}", finding.location)?;
    Ok(())
}
