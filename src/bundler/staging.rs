//! Staging tree construction.
//!
//! The staging tree mirrors the install layout consumed by `dpkg-deb`:
//!
//! ```text
//! build/staging/{name}_{version}_{arch}/
//!   DEBIAN/                      control subtree (not installed)
//!   usr/bin/{name}
//!   usr/share/applications/{name}.desktop
//!   usr/share/icons/hicolor/256x256/apps/{name}.png
//!   usr/share/doc/{name}/copyright
//!   usr/share/doc/{name}/README.md.gz
//! ```

use crate::bundler::utils::fs::{
    copy_file, create_dir_all, gzip_file, is_file, remove_matching_dirs, remove_matching_files,
    set_executable,
};
use crate::config::PackagingConfig;
use crate::error::Result;
use semver::Version;
use std::path::{Path, PathBuf};

/// Paths of one staging tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingTree {
    root: PathBuf,
}

impl StagingTree {
    /// Tree rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the tree, which is also the payload root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Control subtree
    pub fn control_dir(&self) -> PathBuf {
        self.root.join("DEBIAN")
    }

    /// Installed executable
    pub fn binary_path(&self, package: &str) -> PathBuf {
        self.root.join("usr/bin").join(package)
    }

    /// Desktop entry
    pub fn desktop_file_path(&self, package: &str) -> PathBuf {
        self.root
            .join("usr/share/applications")
            .join(format!("{}.desktop", package))
    }

    /// Hicolor theme icon
    pub fn icon_path(&self, package: &str) -> PathBuf {
        self.root
            .join("usr/share/icons/hicolor/256x256/apps")
            .join(format!("{}.png", package))
    }

    /// Package documentation directory
    pub fn doc_dir(&self, package: &str) -> PathBuf {
        self.root.join("usr/share/doc").join(package)
    }
}

/// Builds fresh staging trees for one project
#[derive(Debug)]
pub struct StagingTreeBuilder<'a> {
    config: &'a PackagingConfig,
    project_dir: &'a Path,
}

impl<'a> StagingTreeBuilder<'a> {
    /// Builder for `project_dir` using `config`
    pub fn new(config: &'a PackagingConfig, project_dir: &'a Path) -> Self {
        Self {
            config,
            project_dir,
        }
    }

    /// Location of the tree for `version`
    pub fn tree_for(&self, version: &Version) -> StagingTree {
        StagingTree::new(
            self.config
                .staging_path(self.project_dir)
                .join(self.config.package_base_name(version)),
        )
    }

    /// Remove stale staging content and packages, then stage `binary`.
    pub async fn build(&self, version: &Version, binary: &Path) -> Result<StagingTree> {
        self.clean().await?;

        let tree = self.tree_for(version);
        let package = &self.config.package_name;
        create_dir_all(&tree.control_dir(), false).await?;
        create_dir_all(&tree.root().join("usr/bin"), false).await?;

        let dest = tree.binary_path(package);
        copy_file(binary, &dest).await?;
        set_executable(&dest).await?;
        log::debug!("Staged binary {} -> {}", binary.display(), dest.display());

        self.stage_docs(&tree).await?;
        self.stage_icon(&tree).await?;

        log::info!("Staging tree ready at {}", tree.root().display());
        Ok(tree)
    }

    /// Remove every staging tree and package of this name and architecture.
    ///
    /// Other content of the staging root is left alone.
    pub async fn clean(&self) -> Result<()> {
        let staging_root = self.config.staging_path(self.project_dir);
        let removed = remove_matching_dirs(&staging_root, &self.config.package_base_glob()).await?;
        for path in removed {
            log::debug!("Removed previous staging tree {}", path.display());
        }

        let output_dir = self.config.output_path(self.project_dir);
        let removed = remove_matching_files(&output_dir, &self.config.package_glob()).await?;
        for path in removed {
            log::info!("Removed previous package {}", path.display());
        }
        Ok(())
    }

    async fn stage_docs(&self, tree: &StagingTree) -> Result<()> {
        let package = &self.config.package_name;
        let doc_dir = tree.doc_dir(package);

        let license = self.project_dir.join(&self.config.license_file);
        if is_file(&license).await? {
            copy_file(&license, &doc_dir.join("copyright")).await?;
        } else {
            log::warn!("No license file at {}, skipping", license.display());
        }

        let readme = self.project_dir.join(&self.config.readme_file);
        if is_file(&readme).await? {
            let file_name = readme
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "README".to_string());
            gzip_file(&readme, &doc_dir.join(format!("{}.gz", file_name))).await?;
        } else {
            log::warn!("No readme at {}, skipping", readme.display());
        }
        Ok(())
    }

    async fn stage_icon(&self, tree: &StagingTree) -> Result<()> {
        let Some(icon) = &self.config.icon_file else {
            return Ok(());
        };
        let icon = self.project_dir.join(icon);
        if is_file(&icon).await? {
            copy_file(&icon, &tree.icon_path(&self.config.package_name)).await?;
        } else {
            log::warn!("No icon at {}, skipping", icon.display());
        }
        Ok(())
    }
}
