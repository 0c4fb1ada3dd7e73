//! Release notes composition.
//!
//! Placeholders are replaced in a single pass, so a substituted value is
//! never itself expanded. Any recognized placeholder still present afterwards
//! is reported as [`ReleaseError::Substitution`].

use crate::bundler::utils::fs::is_file;
use crate::error::{ErrorExt, ReleaseError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Version placeholder
pub const VERSION_TOKEN: &str = "{VERSION}";

/// Previous-version placeholder
pub const PREVIOUS_VERSION_TOKEN: &str = "{PREVIOUS_VERSION}";

/// Placeholder table for one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    /// Table for the recognized placeholders
    pub fn new(
        version: impl ToString,
        previous_version: impl ToString,
        maintainer_token: &str,
        maintainer: &str,
    ) -> Self {
        let values = BTreeMap::from([
            (VERSION_TOKEN.to_string(), version.to_string()),
            (PREVIOUS_VERSION_TOKEN.to_string(), previous_version.to_string()),
            (maintainer_token.to_string(), maintainer.to_string()),
        ]);
        Self { values }
    }

    /// Recognized placeholder tokens
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Replacement for `token`
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }
}

/// Resolve every placeholder in `template`.
pub fn compose(template: &str, substitutions: &Substitutions) -> Result<String> {
    let mut tokens: Vec<&str> = substitutions.tokens().collect();
    // Longest first, so a token containing another token matches whole.
    tokens.sort_by_key(|token| std::cmp::Reverse(token.len()));

    let mut composed = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(ch) = rest.chars().next() {
        match tokens.iter().find(|token| rest.starts_with(**token)) {
            Some(token) => {
                composed.push_str(substitutions.get(token).unwrap_or(token));
                rest = &rest[token.len()..];
            }
            None => {
                composed.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    let unresolved = unresolved_placeholders(&composed, substitutions);
    if !unresolved.is_empty() {
        return Err(ReleaseError::Substitution {
            placeholders: unresolved,
        });
    }
    Ok(composed)
}

/// Read `template_path` and resolve its placeholders
pub async fn compose_file(template_path: &Path, substitutions: &Substitutions) -> Result<String> {
    if !is_file(template_path).await? {
        return Err(ReleaseError::MissingPrerequisite {
            what: "release-notes template",
            path: template_path.to_path_buf(),
        });
    }
    let template = tokio::fs::read_to_string(template_path)
        .await
        .fs_context("reading release-notes template", template_path)?;
    compose(&template, substitutions)
}

/// Recognized placeholders occurring in `text`
pub fn unresolved_placeholders(text: &str, substitutions: &Substitutions) -> Vec<String> {
    substitutions
        .tokens()
        .filter(|token| text.contains(token))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs(maintainer: &str) -> Substitutions {
        Substitutions::new("1.0.0", "initial", "{MAINTAINER}", maintainer)
    }

    #[test]
    fn first_release_scenario() {
        let template = "# v{VERSION}\n\nChanges since {PREVIOUS_VERSION}.\n\
                        https://github.com/{MAINTAINER}/app/releases/tag/v{VERSION}\n";
        let composed = compose(template, &subs("octo")).unwrap();

        assert!(composed.contains("1.0.0"));
        assert!(composed.contains("initial"));
        assert!(!composed.contains('{'));
        assert_eq!(
            composed,
            "# v1.0.0\n\nChanges since initial.\n\
             https://github.com/octo/app/releases/tag/v1.0.0\n"
        );
    }

    #[test]
    fn values_are_not_re_expanded() {
        let err = compose("by {MAINTAINER}", &subs("{VERSION}")).unwrap_err();
        match err {
            ReleaseError::Substitution { placeholders } => {
                assert_eq!(placeholders, vec!["{VERSION}".to_string()]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn unknown_braces_are_left_alone() {
        let composed = compose("{VERSION} uses {braces}", &subs("octo")).unwrap();
        assert_eq!(composed, "1.0.0 uses {braces}");
    }

    #[test]
    fn overlapping_tokens_prefer_longest() {
        let subs = Substitutions::new("2.0.0", "1.0.0", "{VERSION}_OWNER", "octo");
        let composed = compose("{VERSION}_OWNER {VERSION}", &subs).unwrap();
        assert_eq!(composed, "octo 2.0.0");
    }

    #[tokio::test]
    async fn missing_template_is_missing_prerequisite() {
        let dir = tempfile::tempdir().unwrap();
        let err = compose_file(&dir.path().join("NOTES.md"), &subs("octo"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
