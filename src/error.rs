//! Error types for packaging and release operations.
//!
//! Every fatal condition of the pipeline maps to one [`ReleaseError`] variant.
//! Filesystem failures carry the operation and path through [`ErrorExt`], and
//! stage names are attached with [`Context`] so the operator can tell which
//! step of the run failed.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for deskpack operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all deskpack operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// Version source or configuration file unreadable or malformed
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A required input file does not exist
    #[error("Missing prerequisite {what}: {path} does not exist")]
    MissingPrerequisite {
        /// What was expected at the path
        what: &'static str,
        /// Path that was checked
        path: PathBuf,
    },

    /// File system error with path context
    #[error("{context} {path}: {source}")]
    Filesystem {
        /// Operation being performed (e.g. "copying binary")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// External packaging tool exited unsuccessfully
    #[error("{tool} failed with {status}: {stderr}")]
    PackagingTool {
        /// Tool that was run
        tool: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// External tool could not be found or started
    #[error("failed to run {tool}: {reason}")]
    ToolNotFound {
        /// Tool that was requested
        tool: String,
        /// Why it could not be started
        reason: String,
    },

    /// Recognized placeholders survived release-notes composition
    #[error("unresolved placeholders in release notes: {}", placeholders.join(", "))]
    Substitution {
        /// Placeholder tokens still present in the output
        placeholders: Vec<String>,
    },

    /// Lifecycle hook template could not be rendered
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),
}

/// Configuration errors: version source and config file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Version source could not be read
    #[error("cannot read version source {path}: {source}")]
    VersionSourceUnreadable {
        /// Path to the version source
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Version source does not contain a usable version
    #[error("malformed version source {path}: {reason}")]
    VersionSourceMalformed {
        /// Path to the version source
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Config file could not be read
    #[error("cannot read config file {path}: {source}")]
    ConfigUnreadable {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::PackagingConfig`]
    #[error("invalid config file {path}: {source}")]
    ConfigInvalid {
        /// Path to the config file
        path: PathBuf,
        /// Parse error
        #[source]
        source: toml::de::Error,
    },

    /// A config value is out of range
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Innermost error, skipping context wrappers
    pub fn root(&self) -> &ReleaseError {
        match self {
            ReleaseError::Context(_, inner) => inner.root(),
            other => other,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.root() {
            ReleaseError::Configuration(_) => 2,
            ReleaseError::MissingPrerequisite { .. } => 3,
            ReleaseError::Filesystem { .. } => 4,
            ReleaseError::PackagingTool { .. } | ReleaseError::ToolNotFound { .. } => 5,
            ReleaseError::Substitution { .. } => 6,
            _ => 1,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self.root() {
            ReleaseError::Configuration(ConfigError::VersionSourceMalformed { path, .. }) => vec![
                format!("Put a single semantic version (e.g. 1.2.3) in {}", path.display()),
            ],
            ReleaseError::Configuration(ConfigError::ConfigInvalid { path, .. }) => {
                vec![format!("Fix the TOML syntax or field types in {}", path.display())]
            }
            ReleaseError::MissingPrerequisite { what, path } => vec![
                format!("Build the {} first so that {} exists", what, path.display()),
                "Check that the version source matches the built artifact".to_string(),
            ],
            ReleaseError::ToolNotFound { tool, .. } => vec![
                format!("Install {} and make sure it is on PATH", tool),
            ],
            ReleaseError::PackagingTool { .. } => vec![
                "Inspect the staging tree under build/staging for malformed metadata".to_string(),
                "Re-running without changing inputs will fail the same way".to_string(),
            ],
            ReleaseError::Substitution { .. } => vec![
                "A substituted value contains a placeholder token; check the maintainer identity"
                    .to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Trait for adding stage context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| ReleaseError::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| ReleaseError::Context(f().to_string(), Box::new(e)))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying binary".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| ReleaseError::Filesystem {
            context,
            path: path.into(),
            source,
        })
    }
}

impl<T> ErrorExt<T> for std::result::Result<T, walkdir::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| path.into());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
            ReleaseError::Filesystem {
                context,
                path,
                source,
            }
        })
    }
}
