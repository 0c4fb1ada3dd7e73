//! Command line interface for deskpack.
//!
//! This module provides argument parsing, command execution, and colored
//! operator feedback.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use commands::execute_command;
pub use output::{OutputManager, format_size};

/// Main CLI entry point, returning the process exit code
pub async fn run() -> i32 {
    let args = Args::parse_args();
    execute_command(args).await
}
