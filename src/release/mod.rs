//! Release bundle assembly.
//!
//! A release bundle is the `release_v{version}` directory holding exactly the
//! compiled binary, the package and the composed release notes. The
//! assembler owns a [`Packager`] and rebuilds the package when it is missing,
//! which is the only place the pipeline repairs a missing upstream artifact.

mod notes;
mod previous;

pub use notes::{
    PREVIOUS_VERSION_TOKEN, Substitutions, VERSION_TOKEN, compose, compose_file,
    unresolved_placeholders,
};
pub use previous::{INITIAL_SENTINEL, PreviousVersion, describe_args, resolve_previous_version};

use crate::bundler::Packager;
use crate::bundler::utils::fs::{copy_file, create_dir_all, file_size, sha256_file, write_file};
use crate::config::DEFAULT_MAINTAINER_IDENTITY;
use crate::error::{Context, ReleaseError, Result};
use crate::process::CommandRunner;
use semver::Version;
use std::path::{Path, PathBuf};

/// A file placed in the release bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledFile {
    /// Path inside the release directory
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Hex SHA-256
    pub checksum: String,
}

/// Result of assembling a release bundle
#[derive(Debug, Clone)]
pub struct ReleaseBundle {
    /// Release directory
    pub dir: PathBuf,
    /// Copied binary
    pub binary: BundledFile,
    /// Copied package
    pub package: BundledFile,
    /// Composed release notes
    pub notes: BundledFile,
    /// Previous release substituted into the notes
    pub previous_version: PreviousVersion,
    /// Whether the package had to be built first
    pub package_rebuilt: bool,
}

impl ReleaseBundle {
    /// The three bundled files in a fixed order
    pub fn files(&self) -> [&BundledFile; 3] {
        [&self.binary, &self.package, &self.notes]
    }
}

/// The "prepare release" pipeline
#[derive(Debug)]
pub struct ReleaseBundleAssembler<'a, R> {
    packager: Packager<'a, R>,
    runner: &'a R,
    maintainer: Option<String>,
}

impl<'a, R: CommandRunner> ReleaseBundleAssembler<'a, R> {
    /// Assembler that rebuilds missing packages with `packager`
    pub fn new(packager: Packager<'a, R>, runner: &'a R) -> Self {
        Self {
            packager,
            runner,
            maintainer: None,
        }
    }

    /// Maintainer identity substituted into the release notes
    pub fn with_maintainer(mut self, maintainer: Option<String>) -> Self {
        self.maintainer = maintainer.filter(|m| !m.trim().is_empty());
        self
    }

    /// Maintainer identity in effect, falling back to the documented default
    pub fn maintainer(&self) -> &str {
        self.maintainer
            .as_deref()
            .unwrap_or(DEFAULT_MAINTAINER_IDENTITY)
    }

    /// Assemble `release_v{version}`.
    ///
    /// The binary check and release-notes composition happen before anything
    /// on disk is changed.
    pub async fn assemble(&self, version: &Version) -> Result<ReleaseBundle> {
        let config = self.packager.config();
        let project_dir = self.packager.project_dir();
        let locator = self.packager.locator();

        let binary = locator
            .require_binary(version)
            .await
            .context("locating binary")?;

        let previous_version = resolve_previous_version(self.runner).await;
        let substitutions = Substitutions::new(
            version,
            &previous_version,
            &config.maintainer_token,
            self.maintainer(),
        );
        let notes = compose_file(
            &project_dir.join(&config.release_notes_template),
            &substitutions,
        )
        .await
        .context("composing release notes")?;

        let release_dir = config.release_dir(project_dir, version);
        create_dir_all(&release_dir, true)
            .await
            .context("creating release directory")?;
        log::info!("Assembling {}", release_dir.display());

        let (package, package_rebuilt) = match locator.find_package(version).await? {
            Some(path) => (path, false),
            None => {
                log::warn!("No package for {} found, building it first", version);
                let artifact = self.packager.build(version).await?;
                (artifact.path, true)
            }
        };

        let binary = bundle_copy(&binary, &release_dir).await?;
        let package = bundle_copy(&package, &release_dir).await?;

        let notes_path = release_dir.join(&config.release_notes_name);
        write_file(&notes_path, &notes)
            .await
            .context("writing release notes")?;
        let notes = describe(notes_path).await?;

        Ok(ReleaseBundle {
            dir: release_dir,
            binary,
            package,
            notes,
            previous_version,
            package_rebuilt,
        })
    }
}

async fn bundle_copy(src: &Path, release_dir: &Path) -> Result<BundledFile> {
    let file_name = src
        .file_name()
        .ok_or_else(|| ReleaseError::Filesystem {
            context: "resolving file name of",
            path: src.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        })?;
    let dest = release_dir.join(file_name);
    copy_file(src, &dest)
        .await
        .with_context(|| format!("copying {} into release bundle", src.display()))?;
    describe(dest).await
}

async fn describe(path: PathBuf) -> Result<BundledFile> {
    Ok(BundledFile {
        size: file_size(&path).await?,
        checksum: sha256_file(&path).await?,
        path,
    })
}
