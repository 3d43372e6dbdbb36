// src/census.rs
// =============================================================================
// One census run, start to finish.
//
// What happens here:
// 1. Fetch the repository metadata (always, even with no pipeline selected)
// 2. If --contributors: fetch the contributors listing, resolve every user,
//    write contributors.csv
// 3. If --forks: fetch the forks listing, resolve every owner, write forks.csv
//
// The two pipelines are independent and use separate files. Profiles are only
// written once a whole listing has been resolved, so an aborted pipeline
// leaves its output file untouched.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::error::CensusResult;
use crate::github::json::require_array;
use crate::github::{fetch_endpoints, GithubClient, RepoRef};
use crate::output::{dump, WriteMode};
use crate::profile::{
    process_contributors, process_forks, Collection, FailurePolicy, LanguageOrder, Profile,
    UserResolver,
};

// Everything a run needs to know, gathered from the command line
#[derive(Debug, Clone)]
pub struct CensusConfig {
    pub repo: RepoRef,
    pub api_base: String,
    pub contributors: bool,
    pub forks: bool,
    pub output_dir: PathBuf,
    pub write_mode: WriteMode,
    pub language_order: LanguageOrder,
    pub failure_policy: FailurePolicy,
    pub timeout: Option<Duration>,
}

/// Outcome of one pipeline (contributors or forks).
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub output: PathBuf,
    pub skipped: usize,
    pub profiles: Vec<Profile>,
}

/// Outcome of a whole run; printed as JSON with --json.
#[derive(Debug, Serialize)]
pub struct CensusReport {
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<PipelineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forks: Option<PipelineReport>,
}

impl CensusReport {
    pub fn pipelines(&self) -> impl Iterator<Item = (&'static str, &PipelineReport)> {
        [("contributors", &self.contributors), ("forks", &self.forks)]
            .into_iter()
            .filter_map(|(name, report)| report.as_ref().map(|r| (name, r)))
    }
}

// Runs the census described by `config`
//
// Returns: a report of every pipeline that ran, or the first error that
// aborted the run
pub async fn run_census(client: &GithubClient, config: &CensusConfig) -> CensusResult<CensusReport> {
    let endpoints = fetch_endpoints(client, &config.repo, &config.api_base).await?;
    info!(repo = %config.repo, ?endpoints, "repository located");

    let resolver = UserResolver::new(client.clone(), config.language_order);
    let mut report = CensusReport {
        repository: config.repo.to_string(),
        contributors: None,
        forks: None,
    };

    if config.contributors {
        println!("👥 Processing contributors");
        let listing = client.get_json(&endpoints.contributors_url).await?;
        let entries = require_array(&listing, &endpoints.contributors_url, "contributors")?;
        let collection = process_contributors(
            &resolver,
            entries,
            &endpoints.contributors_url,
            config.failure_policy,
        )
        .await?;
        report.contributors = Some(write_pipeline(config, "contributors", collection)?);
    }

    if config.forks {
        println!("🍴 Processing forks");
        let listing = client.get_json(&endpoints.forks_url).await?;
        let entries = require_array(&listing, &endpoints.forks_url, "forks")?;
        let collection = process_forks(&resolver, entries, config.failure_policy).await?;
        report.forks = Some(write_pipeline(config, "forks", collection)?);
    }

    Ok(report)
}

fn write_pipeline(
    config: &CensusConfig,
    name: &str,
    collection: Collection,
) -> CensusResult<PipelineReport> {
    let output = dump(
        &config.output_dir,
        name,
        &collection.profiles,
        config.write_mode,
    )?;

    Ok(PipelineReport {
        output,
        skipped: collection.skipped,
        profiles: collection.profiles,
    })
}
