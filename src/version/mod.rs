//! Version resolution from the authoritative version source.
//!
//! The source is a small text file read exactly once per run. It holds either
//! a bare version (`2.1.0`) or a single assignment such as
//! `__version__ = "2.1.0"`; blank lines and `#` comments are ignored.

use crate::error::{ConfigError, Result};
use semver::Version;
use std::path::Path;

/// Read and parse the version source at `path`
pub fn resolve_version(path: &Path) -> Result<Version> {
    let content =
        std::fs::read_to_string(path).map_err(|source| ConfigError::VersionSourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let version = parse_version_source(&content).map_err(|reason| {
        ConfigError::VersionSourceMalformed {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    log::info!("Resolved version {} from {}", version, path.display());
    Ok(version)
}

/// Extract the version from the text of a version source
pub fn parse_version_source(content: &str) -> std::result::Result<Version, String> {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .ok_or_else(|| "no version found".to_string())?;

    let raw = match line.split_once('=') {
        Some((_, value)) => value.trim().trim_matches(|c| c == '"' || c == '\''),
        None => line,
    };

    parse_version_str(raw).ok_or_else(|| format!("'{}' is not a semantic version", raw))
}

/// Parse a version, tolerating a leading `v` as used in tag names
pub fn parse_version_str(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('v').unwrap_or(raw);
    Version::parse(raw).ok()
}
