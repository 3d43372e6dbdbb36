// src/github/repo.rs
// =============================================================================
// This module locates the repository being surveyed.
//
// Strategy:
// - Accept either "owner/name" or a github.com URL for the repository
// - Join it onto the API base URL to get the repository metadata endpoint
// - Read contributors_url and forks_url out of the metadata response
//
// The API base is a parameter so the tool can target GitHub Enterprise
// instances, or a mock server in tests.
//
// Rust concepts:
// - url::Url: Safe path joining (segments are percent-encoded for us)
// - Struct with owned Strings: The endpoints outlive the JSON they came from
// =============================================================================

use serde_json::Value;
use url::Url;

use super::fetch::GithubClient;
use super::json::require_str;
use crate::error::{CensusError, CensusResult};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

/// The collection endpoints advertised by a repository's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEndpoints {
    pub contributors_url: String,
    pub forks_url: String,
}

impl RepoRef {
    // Parses a repository reference
    //
    // Supported formats:
    //   - owner/repo
    //   - https://github.com/owner/repo
    //   - https://github.com/owner/repo.git
    //   - github.com/owner/repo
    //
    // Example:
    //   "https://github.com/scrapy/scrapy" -> RepoRef { owner: "scrapy", name: "scrapy" }
    pub fn parse(input: &str) -> CensusResult<Self> {
        let invalid = |reason: &str| CensusError::InvalidRepository {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        let path = if let Some(rest) = trimmed.strip_prefix("github.com/") {
            rest
        } else if trimmed.contains("://") || trimmed.starts_with("github.com") {
            return Err(invalid("not a GitHub URL"));
        } else {
            trimmed
        };

        let parts: Vec<&str> = path.trim_end_matches('/').split('/').collect();

        if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(invalid("expected owner/name"));
        }

        // A bare "owner/name" must be exactly two segments, URLs may carry more
        if !input.contains("github.com") && parts.len() != 2 {
            return Err(invalid("expected owner/name"));
        }

        let owner = parts[0].to_string();
        let name = parts[1].trim_end_matches(".git").to_string();

        if name.is_empty() {
            return Err(invalid("expected owner/name"));
        }

        Ok(Self { owner, name })
    }

    /// The repository metadata endpoint under `api_base`.
    pub fn metadata_url(&self, api_base: &str) -> CensusResult<Url> {
        let mut url = Url::parse(api_base).map_err(|e| CensusError::InvalidRepository {
            input: api_base.to_string(),
            reason: format!("bad API base URL: {}", e),
        })?;

        url.path_segments_mut()
            .map_err(|_| CensusError::InvalidRepository {
                input: api_base.to_string(),
                reason: "API base URL cannot have a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.name.as_str()]);

        Ok(url)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl RepoEndpoints {
    pub fn from_metadata(metadata: &Value, url: &str) -> CensusResult<Self> {
        Ok(Self {
            contributors_url: require_str(metadata, url, "contributors_url")?.to_string(),
            forks_url: require_str(metadata, url, "forks_url")?.to_string(),
        })
    }
}

// Fetches the repository metadata and returns its collection endpoints
pub async fn fetch_endpoints(
    client: &GithubClient,
    repo: &RepoRef,
    api_base: &str,
) -> CensusResult<RepoEndpoints> {
    let url = repo.metadata_url(api_base)?;
    let metadata = client.get_json(url.as_str()).await?;
    RepoEndpoints::from_metadata(&metadata, url.as_str())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why path_segments_mut() instead of format!()?
//    - Each segment is percent-encoded, so an owner like "a b" or "../x"
//      can't escape the /repos/ prefix
//    - pop_if_empty() drops the trailing empty segment of "https://host/"
//      so we don't end up with "//repos"
//
// 2. Why keep the endpoints as Strings instead of Url?
//    - They are handed straight back to reqwest, which takes &str
//    - GitHub already returns fully-qualified URLs
// -----------------------------------------------------------------------------
