// src/output/writer.rs
// =============================================================================
// This module writes profile records to a pipe-delimited file.
//
// File layout (default):
//   company|created_at|followers|hireable|languages|location|login|public_repos
//   |2020-01-01T00:00:00Z|10||Go,Rust|NYC|alice|3
//   ...
//
// Modes:
// - Truncate: fresh file each run, header + one line per profile
// - Append: keep what is there; header only if the file is empty
// - LegacyHeader: the old output format, which appended the header line
//   once per profile and no values at all
//
// Values never contain the delimiter or a line break: '|', '\r' and '\n' are
// replaced with a space.
// =============================================================================

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{CensusError, CensusResult};
use crate::profile::{Profile, PROFILE_FIELDS};

pub const DELIMITER: &str = "|";
pub const EXTENSION: &str = "csv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Truncate,
    Append,
    LegacyHeader,
}

// Writes profiles to <dir>/<name>.csv
//
// Parameters:
//   dir: output directory (must exist)
//   name: file stem, e.g. "contributors"
//   profiles: records to write, in order
//   mode: see WriteMode
//
// Returns: path of the file that was written
pub fn dump(dir: &Path, name: &str, profiles: &[Profile], mode: WriteMode) -> CensusResult<PathBuf> {
    let path = dir.join(format!("{}.{}", name, EXTENSION));
    let io_err = |source: std::io::Error| CensusError::Io {
        path: path.clone(),
        source,
    };

    let file = open(&path, mode).map_err(io_err)?;
    let existing_len = file.metadata().map_err(io_err)?.len();
    let mut out = BufWriter::new(file);

    let header = join_line(PROFILE_FIELDS.iter().copied());

    match mode {
        WriteMode::LegacyHeader => {
            for _ in profiles {
                out.write_all(header.as_bytes()).map_err(io_err)?;
            }
        }
        WriteMode::Truncate | WriteMode::Append => {
            if existing_len == 0 {
                out.write_all(header.as_bytes()).map_err(io_err)?;
            }
            for profile in profiles {
                let fields = profile.to_fields();
                let line = join_line(fields.iter().map(String::as_str));
                out.write_all(line.as_bytes()).map_err(io_err)?;
            }
        }
    }

    out.flush().map_err(io_err)?;
    info!(path = %path.display(), records = profiles.len(), ?mode, "wrote profiles");

    Ok(path)
}

fn open(path: &Path, mode: WriteMode) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Truncate => options.write(true).create(true).truncate(true),
        WriteMode::Append | WriteMode::LegacyHeader => options.append(true).create(true),
    };
    options.open(path)
}

// Joins fields with the delimiter and terminates the line
fn join_line<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let mut line = fields
        .map(sanitize)
        .collect::<Vec<_>>()
        .join(DELIMITER);
    line.push('\n');
    line
}

fn sanitize(value: &str) -> String {
    value.replace(['|', '\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "company|created_at|followers|hireable|languages|location|login|public_repos\n";

    fn profile(login: &str) -> Profile {
        Profile {
            company: Some("ACME".to_string()),
            created_at: "2020-01-01T00:00:00Z".to_string(),
            followers: 10,
            hireable: Some(true),
            languages: "Go,Rust".to_string(),
            location: None,
            login: login.to_string(),
            public_repos: 3,
        }
    }

    #[test]
    fn test_truncate_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dump(dir.path(), "contributors", &[profile("alice"), profile("bob")], WriteMode::Truncate)
            .unwrap();

        assert_eq!(path, dir.path().join("contributors.csv"));
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!(
                "{HEADER}ACME|2020-01-01T00:00:00Z|10|true|Go,Rust||alice|3\n\
                 ACME|2020-01-01T00:00:00Z|10|true|Go,Rust||bob|3\n"
            )
        );
    }

    #[test]
    fn test_truncate_replaces_previous_run() {
        let dir = TempDir::new().unwrap();
        dump(dir.path(), "forks", &[profile("alice"), profile("bob")], WriteMode::Truncate).unwrap();
        let path = dump(dir.path(), "forks", &[profile("carol")], WriteMode::Truncate).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("|carol|"));
        assert!(!content.contains("|alice|"));
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = TempDir::new().unwrap();
        dump(dir.path(), "forks", &[profile("alice")], WriteMode::Append).unwrap();
        let path = dump(dir.path(), "forks", &[profile("bob")], WriteMode::Append).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER.trim_end());
        assert!(lines[1].ends_with("|alice|3"));
        assert!(lines[2].ends_with("|bob|3"));
    }

    #[test]
    fn test_empty_profiles_still_write_header() {
        let dir = TempDir::new().unwrap();
        let path = dump(dir.path(), "contributors", &[], WriteMode::Truncate).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), HEADER);
    }

    #[test]
    fn test_legacy_header_repeats_per_record() {
        let dir = TempDir::new().unwrap();
        let profiles = [profile("a"), profile("b"), profile("c")];
        dump(dir.path(), "contributors", &profiles, WriteMode::LegacyHeader).unwrap();
        let path = dump(dir.path(), "contributors", &profiles[..1], WriteMode::LegacyHeader).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, HEADER.repeat(4));
    }

    #[test]
    fn test_values_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let mut odd = profile("alice");
        odd.company = Some("Pipes | and\nnewlines".to_string());
        let path = dump(dir.path(), "contributors", &[odd], WriteMode::Truncate).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].split('|').count(), PROFILE_FIELDS.len());
        assert!(lines[1].starts_with("Pipes   and newlines|"));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = dump(&dir.path().join("nope"), "x", &[], WriteMode::Truncate).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
