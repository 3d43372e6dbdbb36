// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (GITHUB_CENSUS_LOG controls the level, default "warn")
// 2. Parse command-line arguments using clap
// 3. Run the census (repository metadata, then the selected pipelines)
// 4. Print a summary, or the JSON report with --json
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod census;        // src/census.rs - one run, start to finish
mod cli;           // src/cli.rs - command-line parsing
mod error;         // src/error.rs - CensusError and its kinds
mod github;        // src/github/ - talking to the GitHub REST API
mod output;        // src/output/ - writing the .csv files
mod profile;       // src/profile/ - profile records and user resolution

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use census::{run_census, CensusReport};
use cli::Cli;
use github::GithubClient;

/// Environment variable holding the tracing filter, e.g. "github_census=debug".
const LOG_ENV: &str = "GITHUB_CENSUS_LOG";

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// The main application logic
// Returns:
//   Ok(0) = census finished
//   Err = anything went wrong (mapped to exit code 2 by main)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let json = cli.json;

    let config = cli.into_config().context("invalid arguments")?;
    let client = GithubClient::new(config.timeout).context("failed to build HTTP client")?;

    println!("🔍 Surveying GitHub repository: {}", config.repo);

    let report = run_census(&client, &config)
        .await
        .with_context(|| format!("census of {} failed", config.repo))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(0)
}

// Prints one line per pipeline that ran
fn print_summary(report: &CensusReport) {
    let mut ran_any = false;

    for (name, pipeline) in report.pipelines() {
        ran_any = true;
        println!(
            "✅ {}: {} profile(s) written to {}",
            name,
            pipeline.profiles.len(),
            pipeline.output.display()
        );
        if pipeline.skipped > 0 {
            println!("   ⚠️  {} user(s) skipped", pipeline.skipped);
        }
    }

    if !ran_any {
        println!("ℹ️  Nothing to collect: pass --contributors and/or --forks");
    }
}
