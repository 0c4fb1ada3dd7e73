//! File system utilities for staging and bundling.
//!
//! Thin async wrappers that create parent directories as needed and attach
//! the operation and path to every I/O error.

use crate::error::{ErrorExt, ReleaseError, Result};
use flate2::{Compression, GzBuilder};
use sha2::{Digest, Sha256};
use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tokio::fs;
use walkdir::WalkDir;

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    if fs::try_exists(path).await.fs_context("checking directory", path)? {
        log::debug!("Removing {}", path.display());
        fs::remove_dir_all(path)
            .await
            .fs_context("removing directory", path)?;
    }
    Ok(())
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes every regular file in `dir` whose name matches `pattern`.
///
/// Returns the removed paths. A missing `dir` matches nothing.
pub async fn remove_matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    remove_matching(dir, pattern, false).await
}

/// Removes every directory directly in `dir` whose name matches `pattern`,
/// with its contents.
///
/// Returns the removed paths. A missing `dir` matches nothing.
pub async fn remove_matching_dirs(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    remove_matching(dir, pattern, true).await
}

async fn remove_matching(dir: &Path, pattern: &str, dirs: bool) -> Result<Vec<PathBuf>> {
    let pattern = glob::Pattern::new(pattern).map_err(|e| ReleaseError::Filesystem {
        context: "matching files in",
        path: dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
    })?;

    let mut removed = Vec::new();
    if !fs::try_exists(dir).await.fs_context("checking directory", dir)? {
        return Ok(removed);
    }

    let mut entries = fs::read_dir(dir).await.fs_context("listing directory", dir)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("listing directory", dir)?
    {
        let path = entry.path();
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));
        if !matches {
            continue;
        }
        let file_type = entry
            .file_type()
            .await
            .fs_context("inspecting file", &path)?;

        if dirs && file_type.is_dir() {
            log::debug!("Removing stale {}", path.display());
            fs::remove_dir_all(&path)
                .await
                .fs_context("removing stale directory", &path)?;
            removed.push(path);
        } else if !dirs && file_type.is_file() {
            log::debug!("Removing stale {}", path.display());
            fs::remove_file(&path)
                .await
                .fs_context("removing stale file", &path)?;
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)
}

/// Writes `content` to `path`, creating parent directories.
pub async fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    fs::write(path, content).await.fs_context("writing file", path)
}

/// Sets mode 0755 on Unix.
pub async fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("setting executable permission", path)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Gzip `src` into `dest` at maximum compression.
///
/// The header carries no file name and a zero timestamp, so identical input
/// always yields identical bytes.
pub async fn gzip_file(src: &Path, dest: &Path) -> Result<()> {
    let src = src.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut input = File::open(&src).fs_context("opening file to compress", &src)?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }
        let output = File::create(&dest).fs_context("creating compressed file", &dest)?;

        let mut encoder = GzBuilder::new().mtime(0).write(output, Compression::best());
        io::copy(&mut input, &mut encoder).fs_context("compressing file", &src)?;
        let mut finished = encoder.finish().fs_context("compressing file", &dest)?;
        finished.flush().fs_context("writing compressed file", &dest)?;
        Ok(())
    })
    .await
    .map_err(|e| join_error("compressing file", e))?
}

/// Hex SHA-256 digest of a file.
pub async fn sha256_file(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<String> {
        let mut file = File::open(&path).fs_context("opening file for checksum", &path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher).fs_context("reading file for checksum", &path)?;
        Ok(hex::encode(hasher.finalize()))
    })
    .await
    .map_err(|e| join_error("hashing file", e))?
}

/// Total size in bytes of the regular files under `dir`.
pub async fn dir_size(dir: &Path) -> Result<u64> {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<u64> {
        let mut total = 0u64;
        for entry in WalkDir::new(&dir) {
            let entry = entry.fs_context("walking directory", &dir)?;
            if entry.file_type().is_file() {
                total += entry
                    .metadata()
                    .fs_context("reading metadata", entry.path())?
                    .len();
            }
        }
        Ok(total)
    })
    .await
    .map_err(|e| join_error("measuring directory", e))?
}

/// Whether `path` is an existing regular file.
pub async fn is_file(path: &Path) -> Result<bool> {
    match fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("inspecting file", path),
    }
}

/// Size in bytes of a single file.
pub async fn file_size(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)
        .await
        .fs_context("reading metadata", path)?
        .len())
}

fn join_error(context: &'static str, e: tokio::task::JoinError) -> ReleaseError {
    ReleaseError::Filesystem {
        context,
        path: PathBuf::new(),
        source: io::Error::other(e.to_string()),
    }
}
