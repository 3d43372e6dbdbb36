// src/profile/collect.rs
// =============================================================================
// This module walks a contributors or forks listing and resolves every user
// in it.
//
// Two variants:
// - Contributors: each entry has a `url` pointing at the user resource
// - Forks: each entry may have `owner.url`; entries without one are skipped
//
// Users are resolved strictly one after another, in listing order, so the
// output order matches the API order. What happens when a user fails is
// decided by the FailurePolicy.
// =============================================================================

use std::pin::pin;

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{info, warn};

use super::record::Profile;
use super::resolve::UserResolver;
use crate::error::CensusResult;
use crate::github::json::{optional_path, require_str};

/// What to do when a single user cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop and return the error (nothing gets written)
    #[default]
    Abort,
    /// Log a warning, leave the user out and carry on.
    /// Rate limiting and I/O errors still abort.
    Skip,
}

// Result of processing one listing
#[derive(Debug, Default)]
pub struct Collection {
    /// Resolved profiles, in listing order
    pub profiles: Vec<Profile>,
    /// Entries that failed and were left out under FailurePolicy::Skip
    pub skipped: usize,
}

// Resolves every contributor in a contributors listing
//
// Parameters:
//   resolver: does the per-user fetching
//   contributors: the JSON array returned by contributors_url
//   listing_url: where the array came from (for error messages)
//   policy: abort or skip on per-user failure
pub async fn process_contributors(
    resolver: &UserResolver,
    contributors: &[Value],
    listing_url: &str,
    policy: FailurePolicy,
) -> CensusResult<Collection> {
    let targets: Vec<CensusResult<String>> = contributors
        .iter()
        .map(|entry| require_str(entry, listing_url, "url").map(str::to_string))
        .collect();

    info!(count = targets.len(), "resolving contributors");
    resolve_all(resolver, targets, policy).await
}

// Resolves the owner of every fork in a forks listing
//
// Forks whose entry has no owner.url are dropped without a warning.
pub async fn process_forks(
    resolver: &UserResolver,
    forks: &[Value],
    policy: FailurePolicy,
) -> CensusResult<Collection> {
    let targets: Vec<CensusResult<String>> = forks
        .iter()
        .filter_map(|fork| optional_path(fork, &["owner", "url"]))
        .map(|url| Ok(url.to_string()))
        .collect();

    info!(
        count = targets.len(),
        without_owner = forks.len() - targets.len(),
        "resolving fork owners"
    );
    resolve_all(resolver, targets, policy).await
}

async fn resolve_all(
    resolver: &UserResolver,
    targets: Vec<CensusResult<String>>,
    policy: FailurePolicy,
) -> CensusResult<Collection> {
    // `then` runs one future at a time, so results come back in input order
    let mut outcomes = pin!(stream::iter(targets).then(move |target| async move {
        match target {
            Ok(url) => resolver.resolve(&url).await,
            Err(e) => Err(e),
        }
    }));

    let mut collection = Collection::default();

    while let Some(outcome) = outcomes.next().await {
        match outcome {
            Ok(profile) => collection.profiles.push(profile),
            Err(e) if policy == FailurePolicy::Skip && !e.is_fatal() => {
                warn!(error = %e, "skipping user");
                collection.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(collection)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a stream instead of a for loop?
//    - stream::iter(..).then(..) is the sequential cousin of the
//      buffer_unordered() pattern: same shape, but never more than one
//      request in flight
//    - Swapping `then` for `buffered(n)` would make it concurrent while
//      keeping the order, if the API limits ever allow it
//
// 2. What does pin!() do?
//    - The stream holds async blocks, which can't be moved once polled
//    - pin!() fixes it in place on the stack so next() can poll it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::github::GithubClient;
    use crate::profile::LanguageOrder;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Mounts /users/{login} and /users/{login}/repos on the mock server
    async fn mount_user(server: &MockServer, login: &str, languages: &[&str]) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "company": null,
                "created_at": "2019-05-05T12:00:00Z",
                "followers": 1,
                "hireable": true,
                "location": null,
                "login": login,
                "public_repos": languages.len(),
                "repos_url": format!("{}/users/{login}/repos", server.uri()),
            })))
            .expect(1)
            .mount(server)
            .await;

        let repos: Vec<Value> = languages.iter().map(|l| json!({"language": l})).collect();
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}/repos")))
            .respond_with(ResponseTemplate::new(200).set_body_json(repos))
            .expect(1)
            .mount(server)
            .await;
    }

    fn resolver() -> UserResolver {
        UserResolver::new(GithubClient::new(None).unwrap(), LanguageOrder::Encounter)
    }

    fn user_url(server: &MockServer, login: &str) -> String {
        format!("{}/users/{login}", server.uri())
    }

    #[tokio::test]
    async fn test_contributors_keep_listing_order() {
        let server = MockServer::start().await;
        for login in ["carol", "alice", "bob"] {
            mount_user(&server, login, &["Rust"]).await;
        }

        let listing: Vec<Value> = ["carol", "alice", "bob"]
            .iter()
            .map(|login| json!({"login": login, "url": user_url(&server, login), "contributions": 5}))
            .collect();

        let collection =
            process_contributors(&resolver(), &listing, "listing", FailurePolicy::Abort)
                .await
                .unwrap();

        let logins: Vec<&str> = collection.profiles.iter().map(|p| p.login.as_str()).collect();
        assert_eq!(logins, ["carol", "alice", "bob"]);
        assert_eq!(collection.skipped, 0);
    }

    #[tokio::test]
    async fn test_contributor_without_url_aborts() {
        let server = MockServer::start().await;
        mount_user(&server, "alice", &[]).await;

        let listing = vec![json!({"url": user_url(&server, "alice")}), json!({"login": "nourl"})];
        let err = process_contributors(&resolver(), &listing, "listing", FailurePolicy::Abort)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[tokio::test]
    async fn test_forks_without_owner_url_are_skipped() {
        let server = MockServer::start().await;
        mount_user(&server, "dave", &["C"]).await;
        mount_user(&server, "erin", &["Go"]).await;

        let forks = vec![
            json!({"full_name": "dave/x", "owner": {"url": user_url(&server, "dave")}}),
            json!({"full_name": "ghost/x", "owner": null}),
            json!({"full_name": "nobody/x"}),
            json!({"full_name": "erin/x", "owner": {"login": "erin", "url": user_url(&server, "erin")}}),
        ];

        let collection = process_forks(&resolver(), &forks, FailurePolicy::Abort)
            .await
            .unwrap();

        assert_eq!(collection.profiles.len(), 2);
        assert_eq!(collection.profiles[0].login, "dave");
        assert_eq!(collection.profiles[1].login, "erin");
        assert_eq!(collection.skipped, 0);
    }

    #[tokio::test]
    async fn test_skip_policy_continues_past_broken_user() {
        let server = MockServer::start().await;
        mount_user(&server, "alice", &["Go"]).await;
        Mock::given(method("GET"))
            .and(path("/users/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let listing = vec![
            json!({"url": user_url(&server, "broken")}),
            json!({"url": user_url(&server, "alice")}),
        ];

        let collection =
            process_contributors(&resolver(), &listing, "listing", FailurePolicy::Skip)
                .await
                .unwrap();
        assert_eq!(collection.profiles.len(), 1);
        assert_eq!(collection.profiles[0].login, "alice");
        assert_eq!(collection.skipped, 1);
    }

    #[tokio::test]
    async fn test_skip_policy_still_aborts_on_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/limited"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let listing = vec![
            json!({"url": user_url(&server, "limited")}),
            json!({"url": user_url(&server, "alice")}),
        ];

        let err = process_contributors(&resolver(), &listing, "listing", FailurePolicy::Skip)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
    }
}
