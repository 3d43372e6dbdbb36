// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Currently implements:
// - A JSON-over-HTTP fetcher with rate-limit detection
// - Helpers for pulling typed fields out of untyped JSON
// - Locating a repository and its contributors/forks endpoints
//
// Not implemented on purpose: pagination (only the first page of each list
// is read) and authentication.
// =============================================================================

mod fetch;
pub mod json;
mod repo;

pub use fetch::GithubClient;
pub use repo::{fetch_endpoints, RepoRef, DEFAULT_API_BASE};
