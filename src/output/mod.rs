// src/output/mod.rs
// =============================================================================
// Output of resolved profiles: the pipe-delimited .csv files, plus the JSON
// report printed on stdout when --json is given.
// =============================================================================

mod writer;

pub use writer::{dump, WriteMode};
