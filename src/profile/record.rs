// src/profile/record.rs
// =============================================================================
// The profile record: the one domain entity this tool produces.
//
// A Profile is built once per resolved user and never changed afterwards.
// The column order of the output file is PROFILE_FIELDS, and to_fields()
// returns the values in that same order.
// =============================================================================

use serde::Serialize;

/// Output column names, in file order.
pub const PROFILE_FIELDS: [&str; 8] = [
    "company",
    "created_at",
    "followers",
    "hireable",
    "languages",
    "location",
    "login",
    "public_repos",
];

/// How many distinct languages a profile keeps.
pub const MAX_LANGUAGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub company: Option<String>,
    /// ISO-8601 timestamp exactly as GitHub sent it
    pub created_at: String,
    pub followers: u64,
    pub hireable: Option<bool>,
    /// Up to MAX_LANGUAGES distinct languages joined with ','
    pub languages: String,
    pub location: Option<String>,
    pub login: String,
    pub public_repos: u64,
}

impl Profile {
    // Renders each field as text, in PROFILE_FIELDS order
    //
    // None becomes an empty string, booleans become "true"/"false"
    pub fn to_fields(&self) -> [String; 8] {
        [
            self.company.clone().unwrap_or_default(),
            self.created_at.clone(),
            self.followers.to_string(),
            self.hireable.map(|b| b.to_string()).unwrap_or_default(),
            self.languages.clone(),
            self.location.clone().unwrap_or_default(),
            self.login.clone(),
            self.public_repos.to_string(),
        ]
    }
}
