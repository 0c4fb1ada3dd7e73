//! External tool execution.
//!
//! Every external program the pipeline touches (the packaging tool and git)
//! is run through a [`CommandRunner`]. [`SystemRunner`] spawns real processes
//! with tokio; tests substitute an in-memory runner.

use crate::error::{ReleaseError, Result};
use std::future::Future;
use std::path::PathBuf;

/// Captured result of a finished external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with status zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable exit status
    pub fn status_description(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Capability to run an external program and wait for it to finish.
///
/// Only a failure to start the program is an `Err`; a non-zero exit is
/// reported through [`CommandOutput::code`] for the caller to judge.
pub trait CommandRunner {
    /// Run `program` with `args` to completion
    fn run(&self, program: &str, args: &[String]) -> impl Future<Output = Result<CommandOutput>>;
}

/// Runs real processes in a fixed working directory
#[derive(Debug, Clone)]
pub struct SystemRunner {
    work_dir: PathBuf,
}

impl SystemRunner {
    /// Create a runner executing commands inside `work_dir`
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let resolved = which::which(program).map_err(|e| ReleaseError::ToolNotFound {
            tool: program.to_string(),
            reason: e.to_string(),
        })?;

        log::debug!("Running {} {}", resolved.display(), args.join(" "));

        let output = tokio::process::Command::new(&resolved)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .await
            .map_err(|e| ReleaseError::ToolNotFound {
                tool: program.to_string(),
                reason: e.to_string(),
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        log::debug!("{} finished with {}", program, result.status_description());
        Ok(result)
    }
}
