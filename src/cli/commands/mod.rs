//! Command execution.
//!
//! Each command runs its pipeline to completion or stops at the first error.
//! Errors are printed with recovery suggestions and turned into the process
//! exit code.

mod build_package;
mod prepare_release;
mod version;

use crate::cli::{Args, Command, OutputManager, RuntimeConfig};
use crate::error::{CliError, ReleaseError, Result};

use build_package::execute_build_package;
use prepare_release::execute_prepare_release;
use version::execute_version;

/// Execute the command selected by `args`, returning the exit code
pub async fn execute_command(args: Args) -> i32 {
    let output = OutputManager::new(args.quiet);

    let result = match args.validate() {
        Ok(()) => run(&args).await,
        Err(reason) => Err(ReleaseError::Cli(CliError::InvalidArguments { reason })),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            output.error(&format!("Command '{}' failed: {}", args.command.name(), e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&format!("• {}", suggestion));
                }
            }
            e.exit_code()
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let config = RuntimeConfig::load(args)?;

    match &args.command {
        Command::BuildPackage => execute_build_package(&config).await,
        Command::PrepareRelease { maintainer } => {
            execute_prepare_release(&config, maintainer.clone()).await
        }
        Command::Version => execute_version(&config),
    }
}
