// src/github/fetch.rs
// =============================================================================
// This module issues GET requests against the GitHub REST API and parses the
// JSON bodies.
//
// Behaviour:
// - One request at a time, no retries
// - 403 / 429 are reported as RateLimited (GitHub's unauthenticated limit)
// - Any other status is NOT checked: if the body parses as JSON it is handed
//   back as-is, and the caller notices the missing fields
// - A body that is not JSON is a Parse error
//
// Rust concepts:
// - async functions: For network I/O
// - Result: Errors travel back to the caller as CensusError values
// - serde_json::Value: Untyped JSON, picked apart by the helpers in json.rs
// =============================================================================

use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{CensusError, CensusResult};

/// User agent sent with every request; GitHub rejects anonymous agents.
pub const USER_AGENT: &str = concat!("github-census/", env!("CARGO_PKG_VERSION"));

const ACCEPT: &str = "application/vnd.github+json";

// Thin wrapper around a reqwest Client
//
// Cloning is cheap (the inner Client is reference counted), so the resolver
// and the pipeline can each hold their own copy.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
}

impl GithubClient {
    // Builds the client
    //
    // Parameters:
    //   timeout: per-request timeout, None = wait forever
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    // Fetches a URL and parses the body as JSON
    //
    // Returns: the parsed JSON value, whatever its shape
    pub async fn get_json(&self, url: &str) -> CensusResult<Value> {
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CensusError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "response");

        if is_rate_limited(status) {
            let reset = response
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            return Err(CensusError::RateLimited {
                url: url.to_string(),
                status: status.as_u16(),
                reset,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CensusError::Network {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| CensusError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

fn is_rate_limited(status: StatusCode) -> bool {
    matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
}
