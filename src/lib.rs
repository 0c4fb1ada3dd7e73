//! # deskpack
//!
//! Release packaging for a pre-built desktop application.
//!
//! Two pipelines share one explicit [`PackagingConfig`]:
//!
//! - **build package**: resolve the version, check the compiled binary,
//!   stage the install tree, write package metadata and run `dpkg-deb`
//!   ([`bundler::Packager`])
//! - **prepare release**: collect the binary, the package (building it when
//!   missing) and the composed release notes into `release_v{version}/`
//!   ([`release::ReleaseBundleAssembler`])
//!
//! External programs run through the [`process::CommandRunner`] capability so
//! both pipelines can be driven by a fake runner in tests.
//!
//! ## Usage
//!
//! ```bash
//! deskpack build-package
//! deskpack prepare-release --maintainer octocat
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod process;
pub mod release;
pub mod version;

pub use bundler::{PackageArtifact, Packager};
pub use config::PackagingConfig;
pub use error::{ConfigError, ReleaseError, Result};
pub use process::{CommandOutput, CommandRunner, SystemRunner};
pub use release::{ReleaseBundle, ReleaseBundleAssembler};
