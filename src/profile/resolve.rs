// src/profile/resolve.rs
// =============================================================================
// This module turns a user URL into a Profile.
//
// How it works:
// 1. GET the user resource and read the seven direct fields
// 2. GET the user's repos_url
// 3. Walk the repo list collecting distinct, non-empty `language` values,
//    stopping as soon as MAX_LANGUAGES have been seen
// 4. Join them with ',' into the languages field
//
// Only the first page of repos is looked at, so "languages" is a sample of
// what the user writes, not a complete list.
// =============================================================================

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use super::record::{Profile, MAX_LANGUAGES};
use crate::error::CensusResult;
use crate::github::json::{nullable_bool, nullable_str, require_array, require_str, require_u64};
use crate::github::GithubClient;

/// Which languages survive when a user has more than MAX_LANGUAGES.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LanguageOrder {
    /// First distinct languages in API response order
    #[default]
    Encounter,
    /// Alphabetically first distinct languages across the whole list
    Sorted,
}

#[derive(Debug, Clone)]
pub struct UserResolver {
    client: GithubClient,
    order: LanguageOrder,
}

impl UserResolver {
    pub fn new(client: GithubClient, order: LanguageOrder) -> Self {
        Self { client, order }
    }

    // Resolves one user
    //
    // Parameters:
    //   user_url: API URL of the user resource (e.g. https://api.github.com/users/alice)
    //
    // Returns: the Profile, or the first error hit along the way
    pub async fn resolve(&self, user_url: &str) -> CensusResult<Profile> {
        let user = self.client.get_json(user_url).await?;

        let company = nullable_str(&user, user_url, "company")?;
        let created_at = require_str(&user, user_url, "created_at")?.to_string();
        let followers = require_u64(&user, user_url, "followers")?;
        let hireable = nullable_bool(&user, user_url, "hireable")?;
        let location = nullable_str(&user, user_url, "location")?;
        let login = require_str(&user, user_url, "login")?.to_string();
        let public_repos = require_u64(&user, user_url, "public_repos")?;

        let repos_url = require_str(&user, user_url, "repos_url")?;
        let repos = self.client.get_json(repos_url).await?;
        let languages = collect_languages(require_array(&repos, repos_url, "repos")?, self.order);

        debug!(%login, %languages, "resolved user");

        Ok(Profile {
            company,
            created_at,
            followers,
            hireable,
            languages,
            location,
            login,
            public_repos,
        })
    }
}

// Picks up to MAX_LANGUAGES distinct languages from a repo list
//
// Repos whose language is null, missing or "" are ignored.
pub fn collect_languages(repos: &[Value], order: LanguageOrder) -> String {
    let languages = repos
        .iter()
        .filter_map(|repo| repo.get("language").and_then(Value::as_str))
        .filter(|language| !language.is_empty());

    match order {
        LanguageOrder::Encounter => {
            let mut seen: Vec<&str> = Vec::with_capacity(MAX_LANGUAGES);
            for language in languages {
                if !seen.contains(&language) {
                    seen.push(language);
                    if seen.len() == MAX_LANGUAGES {
                        break;
                    }
                }
            }
            seen.join(",")
        }
        LanguageOrder::Sorted => {
            let distinct: BTreeSet<&str> = languages.collect();
            distinct
                .into_iter()
                .take(MAX_LANGUAGES)
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}
