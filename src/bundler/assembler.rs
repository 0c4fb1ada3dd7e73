//! Package assembly with `dpkg-deb`.

use crate::bundler::staging::StagingTree;
use crate::bundler::utils::fs::{create_dir_all, file_size, is_file, sha256_file};
use crate::config::PackagingConfig;
use crate::error::{ReleaseError, Result};
use crate::process::CommandRunner;
use semver::Version;
use std::path::{Path, PathBuf};

/// External packaging tool
pub const PACKAGING_TOOL: &str = "dpkg-deb";

/// A built package file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    /// Path of the package file
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Hex SHA-256 of the file
    pub checksum: String,
}

/// Turns a staging tree into a package file
#[derive(Debug)]
pub struct PackageAssembler<'a, R> {
    config: &'a PackagingConfig,
    project_dir: &'a Path,
    runner: &'a R,
}

impl<'a, R: CommandRunner> PackageAssembler<'a, R> {
    /// Assembler writing into the configured output directory
    pub fn new(config: &'a PackagingConfig, project_dir: &'a Path, runner: &'a R) -> Self {
        Self {
            config,
            project_dir,
            runner,
        }
    }

    /// Arguments passed to the packaging tool
    pub fn tool_args(tree: &StagingTree, output: &Path) -> Vec<String> {
        vec![
            "--root-owner-group".to_string(),
            "--build".to_string(),
            tree.root().display().to_string(),
            output.display().to_string(),
        ]
    }

    /// Run the packaging tool once; a non-zero exit is not retried.
    pub async fn assemble(&self, version: &Version, tree: &StagingTree) -> Result<PackageArtifact> {
        let output = self.config.package_path(self.project_dir, version);
        if let Some(parent) = output.parent() {
            create_dir_all(parent, false).await?;
        }

        log::info!("Building {}", output.display());
        let args = Self::tool_args(tree, &output);
        let result = self.runner.run(PACKAGING_TOOL, &args).await?;

        if !result.success() {
            return Err(ReleaseError::PackagingTool {
                tool: PACKAGING_TOOL.to_string(),
                status: result.status_description(),
                stderr: result.stderr.trim().to_string(),
            });
        }

        if !is_file(&output).await? {
            return Err(ReleaseError::PackagingTool {
                tool: PACKAGING_TOOL.to_string(),
                status: result.status_description(),
                stderr: format!("no package was written to {}", output.display()),
            });
        }

        let artifact = PackageArtifact {
            size: file_size(&output).await?,
            checksum: sha256_file(&output).await?,
            path: output,
        };
        log::info!(
            "Built {} ({} bytes)",
            artifact.path.display(),
            artifact.size
        );
        Ok(artifact)
    }
}
