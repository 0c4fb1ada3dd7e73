//! Debian packaging pipeline.
//!
//! [`Packager::build`] runs the packaging stages in order, each completing
//! before the next starts:
//!
//! 1. [`ArtifactLocator`] checks that the compiled binary exists, before
//!    anything on disk is touched
//! 2. [`StagingTreeBuilder`] removes stale trees and packages and stages the
//!    binary and documentation
//! 3. [`generate_metadata`] writes the control record, desktop entry,
//!    checksums and post-install hook
//! 4. [`PackageAssembler`] runs `dpkg-deb` and reports the package size
//!
//! ```no_run
//! use deskpack::bundler::Packager;
//! use deskpack::config::PackagingConfig;
//! use deskpack::process::SystemRunner;
//! use std::path::Path;
//!
//! # async fn example() -> deskpack::Result<()> {
//! let project = Path::new(".");
//! let config = PackagingConfig::load(project, None)?;
//! let runner = SystemRunner::new(project);
//! let version = semver::Version::new(2, 1, 0);
//!
//! let package = Packager::new(&config, project, &runner).build(&version).await?;
//! println!("{} ({} bytes)", package.path.display(), package.size);
//! # Ok(())
//! # }
//! ```

mod assembler;
mod locator;
pub mod metadata;
mod staging;
pub mod utils;

pub use assembler::{PACKAGING_TOOL, PackageArtifact, PackageAssembler};
pub use locator::ArtifactLocator;
pub use metadata::{DesktopEntry, PackageMetadata, generate_metadata};
pub use staging::{StagingTree, StagingTreeBuilder};

use crate::config::PackagingConfig;
use crate::error::{Context, Result};
use crate::process::CommandRunner;
use semver::Version;
use std::path::Path;

/// The "build package" pipeline for one project
#[derive(Debug)]
pub struct Packager<'a, R> {
    config: &'a PackagingConfig,
    project_dir: &'a Path,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Packager<'a, R> {
    /// Packager for `project_dir` running external tools through `runner`
    pub fn new(config: &'a PackagingConfig, project_dir: &'a Path, runner: &'a R) -> Self {
        Self {
            config,
            project_dir,
            runner,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &'a PackagingConfig {
        self.config
    }

    /// Project directory all relative paths resolve against
    pub fn project_dir(&self) -> &'a Path {
        self.project_dir
    }

    /// Artifact locator sharing this packager's configuration
    pub fn locator(&self) -> ArtifactLocator<'a> {
        ArtifactLocator::new(self.config, self.project_dir)
    }

    /// Build the package for `version`.
    ///
    /// Fails without touching the filesystem when the binary is missing.
    pub async fn build(&self, version: &Version) -> Result<PackageArtifact> {
        log::info!(
            "Packaging {} {} for {}",
            self.config.package_name,
            version,
            self.config.architecture
        );

        let binary = self
            .locator()
            .require_binary(version)
            .await
            .context("locating binary")?;

        let tree = StagingTreeBuilder::new(self.config, self.project_dir)
            .build(version, &binary)
            .await
            .context("building staging tree")?;

        generate_metadata(self.config, version, &tree)
            .await
            .context("generating package metadata")?;

        PackageAssembler::new(self.config, self.project_dir, self.runner)
            .assemble(version, &tree)
            .await
            .context("assembling package")
    }
}
