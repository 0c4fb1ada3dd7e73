//! Command line argument parsing and validation.

use crate::config::{MAINTAINER_ENV_VAR, PackagingConfig};
use crate::error::{ErrorExt, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Package a compiled desktop application and assemble its release bundle
#[derive(Parser, Debug)]
#[command(
    name = "deskpack",
    version,
    about = "Package a compiled desktop application and assemble its release bundle",
    long_about = "Turns a pre-built binary into a Debian package and a release directory.

Usage:
  deskpack build-package
  deskpack prepare-release --maintainer octocat
  deskpack --project-dir ../app --config packaging.toml build-package

Exit code 0 = every expected artifact exists."
)]
pub struct Args {
    /// Project directory all configured paths are relative to
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".", global = true)]
    pub project_dir: PathBuf,

    /// Configuration file (default: deskpack.toml in the project directory, if present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stage the binary and build the package
    BuildPackage,

    /// Assemble release_v{VERSION}/, building the package first if missing
    PrepareRelease {
        /// Identity substituted for the maintainer token in the release notes
        #[arg(long, env = MAINTAINER_ENV_VAR, value_name = "NAME")]
        maintainer: Option<String>,
    },

    /// Print the resolved version
    Version,
}

impl Command {
    /// Command name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::BuildPackage => "build-package",
            Command::PrepareRelease { .. } => "prepare-release",
            Command::Version => "version",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.project_dir.is_dir() {
            return Err(format!(
                "Project directory {} does not exist",
                self.project_dir.display()
            ));
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    project_dir: PathBuf,
    packaging: PackagingConfig,
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Load the packaging configuration selected by `args`.
    ///
    /// The project directory is made absolute so that paths handed to
    /// external tools stay valid inside their working directory.
    pub fn load(args: &Args) -> Result<Self> {
        let project_dir = args
            .project_dir
            .canonicalize()
            .fs_context("resolving project directory", &args.project_dir)?;
        let packaging = PackagingConfig::load(&project_dir, args.config.as_deref())?;
        Ok(Self {
            project_dir,
            packaging,
            output: super::OutputManager::new(args.quiet),
        })
    }

    /// Project directory
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Packaging configuration
    pub fn packaging(&self) -> &PackagingConfig {
        &self.packaging
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_prepare_release_with_globals() {
        let args = Args::try_parse_from([
            "deskpack",
            "prepare-release",
            "--maintainer",
            "octo",
            "-C",
            "/tmp",
        ])
        .unwrap();

        assert_eq!(args.project_dir, PathBuf::from("/tmp"));
        assert_eq!(
            args.command,
            Command::PrepareRelease {
                maintainer: Some("octo".to_string())
            }
        );
        assert_eq!(args.command.name(), "prepare-release");
    }

    #[test]
    fn validate_checks_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            project_dir: dir.path().to_path_buf(),
            config: None,
            quiet: true,
            command: Command::Version,
        };
        assert!(args.validate().is_ok());

        let missing = Args {
            project_dir: dir.path().join("absent"),
            ..args
        };
        let reason = missing.validate().unwrap_err();
        assert!(reason.contains("does not exist"));
    }
}
