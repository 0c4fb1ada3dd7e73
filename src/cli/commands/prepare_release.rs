//! `prepare-release` command.

use crate::bundler::Packager;
use crate::cli::RuntimeConfig;
use crate::cli::format_size;
use crate::config::{DEFAULT_MAINTAINER_IDENTITY, MAINTAINER_ENV_VAR};
use crate::error::Result;
use crate::process::SystemRunner;
use crate::release::ReleaseBundleAssembler;
use crate::version::resolve_version;

/// Resolve the version and assemble the release bundle
pub(super) async fn execute_prepare_release(
    config: &RuntimeConfig,
    maintainer: Option<String>,
) -> Result<()> {
    let output = config.output();
    let packaging = config.packaging();
    let project_dir = config.project_dir();

    let version = resolve_version(&project_dir.join(&packaging.version_file))?;
    output.section(&format!("Preparing release v{}", version));

    let runner = SystemRunner::new(project_dir);
    let packager = Packager::new(packaging, project_dir, &runner);
    let maintainer = maintainer.filter(|m| !m.trim().is_empty());
    if maintainer.is_none() {
        output.warn(&format!(
            "No maintainer identity given (--maintainer or {}), using '{}'",
            MAINTAINER_ENV_VAR, DEFAULT_MAINTAINER_IDENTITY
        ));
    }
    let assembler = ReleaseBundleAssembler::new(packager, &runner).with_maintainer(maintainer);

    let bundle = assembler.assemble(&version).await?;

    if bundle.package_rebuilt {
        output.progress("Package was missing and has been built");
    }
    output.success(&format!("Release bundle ready at {}", bundle.dir.display()));
    for file in bundle.files() {
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        output.indent(&format!("{:<40} {:>10}  {}", name, format_size(file.size), file.checksum));
    }
    output.indent(&format!("Previous version: {}", bundle.previous_version));
    Ok(())
}
