//! Shared fixtures for pipeline tests.

#![allow(dead_code)]

use deskpack::error::{ErrorExt, ReleaseError, Result};
use deskpack::{CommandOutput, CommandRunner, PackagingConfig};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// In-memory stand-in for `dpkg-deb` and `git`.
///
/// A successful `dpkg-deb` run writes the staged control record into the
/// package path so tests can inspect the metadata that was packaged.
#[derive(Debug, Default)]
pub struct FakeRunner {
    pub calls: RefCell<Vec<(String, Vec<String>)>>,
    pub dpkg_exit: i32,
    pub previous_tag: Option<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_previous_tag(tag: &str) -> Self {
        Self {
            previous_tag: Some(tag.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_dpkg(code: i32) -> Self {
        Self {
            dpkg_exit: code,
            ..Self::default()
        }
    }

    pub fn count(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(p, _)| p == program)
            .count()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));

        match program {
            "dpkg-deb" => {
                if self.dpkg_exit != 0 {
                    return Ok(CommandOutput::failed(
                        self.dpkg_exit,
                        "dpkg-deb: error: control file has bad permissions",
                    ));
                }
                let root = Path::new(&args[args.len() - 2]);
                let output = Path::new(&args[args.len() - 1]);
                let control_path = root.join("DEBIAN/control");
                let control = std::fs::read(&control_path)
                    .fs_context("reading control file", &control_path)?;
                std::fs::write(output, control).fs_context("writing package", output)?;
                Ok(CommandOutput::ok(""))
            }
            "git" => match &self.previous_tag {
                Some(tag) => Ok(CommandOutput::ok(format!("{}\n", tag))),
                None => Ok(CommandOutput::failed(
                    128,
                    "fatal: No names found, cannot describe anything.",
                )),
            },
            other => Err(ReleaseError::ToolNotFound {
                tool: other.to_string(),
                reason: "not provided by FakeRunner".to_string(),
            }),
        }
    }
}

/// Configuration used by the scenarios: package `pkg`, binary `dist/app-{version}`
pub fn config() -> PackagingConfig {
    PackagingConfig {
        package_name: "pkg".to_string(),
        binary_name: Some("app".to_string()),
        summary: "Prompt workbench".to_string(),
        description: "Improves prompts.\n\nWorks offline.".to_string(),
        depends: vec!["python3".to_string()],
        ..PackagingConfig::default()
    }
}

/// Project directory with a version source and optional docs.
pub fn project(version: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("VERSION"), format!("{}\n", version)).unwrap();
    std::fs::write(dir.path().join("LICENSE"), "MIT License\n").unwrap();
    std::fs::write(dir.path().join("README.md"), "# Prompt workbench\n").unwrap();
    std::fs::write(
        dir.path().join("RELEASE_NOTES_TEMPLATE.md"),
        "# Release v{VERSION}\n\n\
         Changes since {PREVIOUS_VERSION}.\n\n\
         Download: https://github.com/{MAINTAINER}/pkg/releases/tag/v{VERSION}\n",
    )
    .unwrap();
    dir
}

/// Project directory that also contains the compiled binary
pub fn project_with_binary(version: &str) -> TempDir {
    let dir = project(version);
    add_binary(dir.path(), version);
    dir
}

pub fn add_binary(project_dir: &Path, version: &str) {
    let dist = project_dir.join("dist");
    std::fs::create_dir_all(&dist).unwrap();
    std::fs::write(dist.join(format!("app-{}", version)), b"\x7fELF fake binary").unwrap();
}

/// Relative path -> contents of every file under `dir`
pub fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let rel = entry.path().strip_prefix(dir).unwrap().display().to_string();
            (rel, std::fs::read(entry.path()).unwrap())
        })
        .collect()
}

/// Sorted file names directly inside `dir`
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
