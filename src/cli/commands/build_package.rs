//! `build-package` command.

use crate::bundler::Packager;
use crate::cli::RuntimeConfig;
use crate::cli::format_size;
use crate::error::Result;
use crate::process::SystemRunner;
use crate::version::resolve_version;

/// Resolve the version and build the package
pub(super) async fn execute_build_package(config: &RuntimeConfig) -> Result<()> {
    let output = config.output();
    let packaging = config.packaging();
    let project_dir = config.project_dir();

    let version = resolve_version(&project_dir.join(&packaging.version_file))?;
    output.section(&format!("Packaging {} {}", packaging.package_name, version));

    let runner = SystemRunner::new(project_dir);
    let package = Packager::new(packaging, project_dir, &runner)
        .build(&version)
        .await?;

    output.success(&format!("Built {}", package.path.display()));
    output.indent(&format!("Size:   {}", format_size(package.size)));
    output.indent(&format!("SHA256: {}", package.checksum));
    Ok(())
}
