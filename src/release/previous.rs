//! Previous release lookup from tag history.

use crate::process::CommandRunner;
use crate::version::parse_version_str;
use semver::Version;
use std::fmt;

/// Substituted when there is no earlier release
pub const INITIAL_SENTINEL: &str = "initial";

/// The release preceding the current one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviousVersion {
    /// Version of the most recent earlier tag
    Tagged(Version),
    /// No earlier release exists
    Initial,
}

impl fmt::Display for PreviousVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviousVersion::Tagged(version) => write!(f, "{}", version),
            PreviousVersion::Initial => f.write_str(INITIAL_SENTINEL),
        }
    }
}

/// Arguments for `git` that print the nearest tag before `HEAD`
pub fn describe_args() -> Vec<String> {
    ["describe", "--tags", "--abbrev=0", "HEAD^"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Find the tag immediately preceding the current commit.
///
/// Never fails: a missing tag, a repository without history, an unavailable
/// git, or a tag that is not a semantic version all resolve to
/// [`PreviousVersion::Initial`].
pub async fn resolve_previous_version<R: CommandRunner>(runner: &R) -> PreviousVersion {
    let output = match runner.run("git", &describe_args()).await {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Cannot query tag history ({}), treating as first release", e);
            return PreviousVersion::Initial;
        }
    };

    if !output.success() {
        log::info!("No previous tag found, treating as first release");
        return PreviousVersion::Initial;
    }

    let tag = output.stdout.trim();
    if tag.is_empty() {
        return PreviousVersion::Initial;
    }

    match parse_version_str(tag) {
        Some(version) => {
            log::info!("Previous release is {} (tag {})", version, tag);
            PreviousVersion::Tagged(version)
        }
        None => {
            log::warn!(
                "Previous tag '{}' is not a semantic version, treating as first release",
                tag
            );
            PreviousVersion::Initial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReleaseError, Result};
    use crate::process::CommandOutput;

    enum GitReply {
        Output(CommandOutput),
        Missing,
    }

    impl CommandRunner for GitReply {
        async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
            assert_eq!(program, "git");
            assert_eq!(args, describe_args().as_slice());
            match self {
                GitReply::Output(output) => Ok(output.clone()),
                GitReply::Missing => Err(ReleaseError::ToolNotFound {
                    tool: "git".to_string(),
                    reason: "not installed".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn tagged_previous_release() {
        let runner = GitReply::Output(CommandOutput::ok("v1.4.0\n"));
        assert_eq!(
            resolve_previous_version(&runner).await,
            PreviousVersion::Tagged(Version::new(1, 4, 0))
        );
    }

    #[tokio::test]
    async fn no_tag_is_initial() {
        let runner = GitReply::Output(CommandOutput::failed(
            128,
            "fatal: No names found, cannot describe anything.",
        ));
        let previous = resolve_previous_version(&runner).await;
        assert_eq!(previous, PreviousVersion::Initial);
        assert_eq!(previous.to_string(), "initial");
    }

    #[tokio::test]
    async fn git_unavailable_is_initial() {
        assert_eq!(
            resolve_previous_version(&GitReply::Missing).await,
            PreviousVersion::Initial
        );
    }

    #[tokio::test]
    async fn non_semver_tag_is_initial() {
        let runner = GitReply::Output(CommandOutput::ok("nightly-2024\n"));
        assert_eq!(resolve_previous_version(&runner).await, PreviousVersion::Initial);
    }
}
