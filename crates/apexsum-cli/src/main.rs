//! apexsum renders Apex test results and code coverage into a markdown job
//! summary, appending to the GitHub Actions step summary when available and
//! printing to stdout otherwise.

use std::fs::{self, OpenOptions};
use std::io::Write;

use apexsum_app::{generate, AppError, SummaryRequest};
use clap::Parser;
use thiserror::Error;

/// apexsum renders Apex test results and code coverage into a markdown job summary.
#[derive(Parser, Debug)]
#[command(name = "apexsum")]
#[command(about = "Render Apex test results and coverage into a markdown job summary")]
#[command(version)]
struct Cli {
    /// Unified JSON results file (tests, summary, coverage, timing)
    #[arg(long, conflicts_with_all = ["junit", "coverage"])]
    results: Option<String>,

    /// JUnit XML file with test results
    #[arg(long)]
    junit: Option<String>,

    /// JSON file with coverage data
    #[arg(long)]
    coverage: Option<String>,
}

/// CLI errors
#[derive(Debug, Error)]
enum CliError {
    #[error("Must provide --results, or --junit and/or --coverage")]
    MissingInput,

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write summary to '{path}': {source}")]
    SummaryWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    App(#[from] AppError),
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<(), CliError> {
    let request = build_request(&cli)?;
    let result = generate(&request)?;
    write_summary(&result.markdown)
}

/// Map flags to a request, reading every named file up front.
fn build_request(cli: &Cli) -> Result<SummaryRequest, CliError> {
    if let Some(path) = cli.results.as_deref() {
        return Ok(SummaryRequest::Unified {
            results_text: read_input(path)?,
        });
    }

    if cli.junit.is_none() && cli.coverage.is_none() {
        return Err(CliError::MissingInput);
    }

    let suite_text = cli.junit.as_deref().map(read_input).transpose()?;
    let coverage_text = cli.coverage.as_deref().map(read_input).transpose()?;
    Ok(SummaryRequest::Junit {
        suite_text,
        coverage_text,
    })
}

fn read_input(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::FileRead {
        path: path.to_string(),
        source,
    })
}

/// Append to the step-summary file when `GITHUB_STEP_SUMMARY` names one,
/// otherwise print the document to stdout.
fn write_summary(markdown: &str) -> Result<(), CliError> {
    match std::env::var("GITHUB_STEP_SUMMARY") {
        Ok(path) if !path.is_empty() => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| CliError::SummaryWrite {
                    path: path.clone(),
                    source,
                })?;
            file.write_all(markdown.as_bytes())
                .map_err(|source| CliError::SummaryWrite {
                    path: path.clone(),
                    source,
                })?;
            eprintln!("✅ Generated job summary");
            Ok(())
        }
        _ => {
            print!("{}", markdown);
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
