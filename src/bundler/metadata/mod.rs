//! Package metadata generation.
//!
//! Renders the control record, desktop entry, checksums and post-install hook
//! into a [`StagingTree`]. The desktop entry goes into the payload first so
//! that the installed size and `md5sums` cover it.

mod control;
mod desktop;
mod postinst;

pub use control::{PackageMetadata, format_description_body};
pub use desktop::DesktopEntry;
pub use postinst::{CACHE_REFRESHES, CacheRefresh, render_postinst};

use crate::bundler::staging::StagingTree;
use crate::bundler::utils::fs::{dir_size, set_executable, write_file};
use crate::config::PackagingConfig;
use crate::error::{ErrorExt, ReleaseError, Result};
use semver::Version;
use std::{fs::File, io, path::PathBuf};
use walkdir::WalkDir;

/// Write all metadata files for `version` into `tree`
pub async fn generate_metadata(
    config: &PackagingConfig,
    version: &Version,
    tree: &StagingTree,
) -> Result<()> {
    let desktop_path = tree.desktop_file_path(&config.package_name);
    write_file(&desktop_path, DesktopEntry::new(config).render()).await?;
    log::debug!("Wrote {}", desktop_path.display());

    let installed_size_kb = dir_size(tree.root()).await?.div_ceil(1024);
    let md5sums = payload_md5sums(tree).await?;
    write_file(&tree.control_dir().join("md5sums"), md5sums).await?;

    let metadata = PackageMetadata::new(config, version, installed_size_kb);
    let control_path = tree.control_dir().join("control");
    write_file(&control_path, metadata.render()).await?;
    log::debug!("Wrote {}", control_path.display());

    let postinst_path = tree.control_dir().join("postinst");
    write_file(&postinst_path, render_postinst(&config.package_name, version)?).await?;
    set_executable(&postinst_path).await?;
    log::debug!("Wrote {}", postinst_path.display());

    Ok(())
}

/// `md5sums` content for every payload file, sorted by path.
async fn payload_md5sums(tree: &StagingTree) -> Result<String> {
    let root = tree.root().to_path_buf();
    let control_dir = tree.control_dir();

    tokio::task::spawn_blocking(move || -> Result<String> {
        let mut out = String::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.path() != control_dir);

        for entry in walker {
            let entry = entry.fs_context("walking staging tree", &root)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let mut file = File::open(entry.path()).fs_context("opening file for MD5", entry.path())?;
            let mut context = md5::Context::new();
            io::copy(&mut file, &mut context).fs_context("reading file for MD5", entry.path())?;
            let digest = context.finalize();

            let rel_path = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            out.push_str(&format!("{:x}  {}\n", digest, rel_path.display()));
        }
        Ok(out)
    })
    .await
    .map_err(|e| ReleaseError::Filesystem {
        context: "computing checksums",
        path: PathBuf::new(),
        source: io::Error::other(e.to_string()),
    })?
}
