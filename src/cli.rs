// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are no subcommands: two independent flags (--contributors, --forks)
// pick which of the two pipelines run, and the rest of the flags tune how
// they run. With neither flag only the repository metadata is fetched.
//
// into_config() turns the parsed flags into a CensusConfig, which is what
// the rest of the program works with.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::census::CensusConfig;
use crate::error::CensusResult;
use crate::github::{RepoRef, DEFAULT_API_BASE};
use crate::output::WriteMode;
use crate::profile::{FailurePolicy, LanguageOrder};

#[derive(Parser, Debug)]
#[command(
    name = "github-census",
    version,
    about = "Collect profiles of a GitHub repository's contributors and fork owners",
    long_about = "github-census looks up a repository's contributors and/or forks through the \
                  GitHub REST API, resolves every user to a short profile (company, followers, \
                  top languages, ...) and writes them to contributors.csv / forks.csv."
)]
pub struct Cli {
    /// Gather contributor profiles into contributors.csv
    #[arg(long)]
    pub contributors: bool,

    /// Gather fork-owner profiles into forks.csv
    #[arg(long)]
    pub forks: bool,

    /// Repository to survey, as owner/name or a github.com URL
    #[arg(long, default_value = "scrapy/scrapy")]
    pub repo: String,

    /// Base URL of the GitHub REST API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Directory the .csv files are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Append to existing output files instead of replacing them
    #[arg(long, conflicts_with = "legacy_header")]
    pub append: bool,

    /// Legacy output: append the header line once per profile, no values
    #[arg(long)]
    pub legacy_header: bool,

    /// Sort a user's distinct languages alphabetically before keeping five
    ///
    /// By default the first five distinct languages in API order are kept.
    #[arg(long)]
    pub sort_languages: bool,

    /// Leave out users that fail to resolve instead of aborting
    ///
    /// Rate limiting still aborts the run.
    #[arg(long)]
    pub keep_going: bool,

    /// Per-request timeout in seconds (0 = no timeout)
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Also print the resolved profiles as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn into_config(self) -> CensusResult<CensusConfig> {
        let write_mode = if self.legacy_header {
            WriteMode::LegacyHeader
        } else if self.append {
            WriteMode::Append
        } else {
            WriteMode::Truncate
        };

        Ok(CensusConfig {
            repo: RepoRef::parse(&self.repo)?,
            api_base: self.api_base,
            contributors: self.contributors,
            forks: self.forks,
            output_dir: self.output_dir,
            write_mode,
            language_order: if self.sort_languages {
                LanguageOrder::Sorted
            } else {
                LanguageOrder::Encounter
            },
            failure_policy: if self.keep_going {
                FailurePolicy::Skip
            } else {
                FailurePolicy::Abort
            },
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
        })
    }
}
