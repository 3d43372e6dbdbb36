// src/profile/mod.rs
// =============================================================================
// Everything about profile records: the record itself, resolving a single
// user into one, and resolving whole contributor/fork listings.
// =============================================================================

mod collect;
mod record;
mod resolve;

pub use collect::{process_contributors, process_forks, Collection, FailurePolicy};
pub use record::{Profile, PROFILE_FIELDS};
pub use resolve::{LanguageOrder, UserResolver};
