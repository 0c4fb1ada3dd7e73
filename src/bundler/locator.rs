//! Prerequisite artifact lookup.

use crate::bundler::utils::fs::is_file;
use crate::config::PackagingConfig;
use crate::error::{ReleaseError, Result};
use semver::Version;
use std::path::{Path, PathBuf};

/// Finds the version-keyed input and output artifacts of a project
#[derive(Debug, Clone, Copy)]
pub struct ArtifactLocator<'a> {
    config: &'a PackagingConfig,
    project_dir: &'a Path,
}

impl<'a> ArtifactLocator<'a> {
    /// Locator for `project_dir` using `config`
    pub fn new(config: &'a PackagingConfig, project_dir: &'a Path) -> Self {
        Self {
            config,
            project_dir,
        }
    }

    /// Path of the compiled binary, failing if it does not exist.
    ///
    /// Performs no filesystem mutation.
    pub async fn require_binary(&self, version: &Version) -> Result<PathBuf> {
        let path = self.config.binary_path(self.project_dir, version);
        if !is_file(&path).await? {
            return Err(ReleaseError::MissingPrerequisite {
                what: "application binary",
                path,
            });
        }
        log::info!("Found binary {}", path.display());
        Ok(path)
    }

    /// Path of the built package for `version`, if present
    pub async fn find_package(&self, version: &Version) -> Result<Option<PathBuf>> {
        let path = self.config.package_path(self.project_dir, version);
        Ok(is_file(&path).await?.then_some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_missing_prerequisite() {
        let dir = tempfile::tempdir().unwrap();
        let config = PackagingConfig::default();
        let locator = ArtifactLocator::new(&config, dir.path());

        let err = locator
            .require_binary(&Version::new(2, 1, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, ReleaseError::MissingPrerequisite { .. }));
        assert!(err.to_string().contains("app-2.1.0"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn finds_existing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();
        std::fs::write(dir.path().join("dist/app-2.1.0"), "bin").unwrap();
        let config = PackagingConfig::default();
        let locator = ArtifactLocator::new(&config, dir.path());
        let version = Version::new(2, 1, 0);

        assert!(locator.require_binary(&version).await.is_ok());
        assert_eq!(locator.find_package(&version).await.unwrap(), None);

        std::fs::write(dir.path().join("app_2.1.0_amd64.deb"), "pkg").unwrap();
        assert!(locator.find_package(&version).await.unwrap().is_some());
    }
}
