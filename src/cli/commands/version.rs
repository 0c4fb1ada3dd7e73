//! `version` command.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::version::resolve_version;

/// Print the resolved version on stdout
pub(super) fn execute_version(config: &RuntimeConfig) -> Result<()> {
    let source = config.project_dir().join(&config.packaging().version_file);
    let version = resolve_version(&source)?;
    println!("{}", version);
    Ok(())
}
