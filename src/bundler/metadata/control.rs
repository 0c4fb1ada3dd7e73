//! Debian control record.

use crate::config::PackagingConfig;
use semver::Version;
use std::fmt::Write;

/// Fields of the `DEBIAN/control` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,
    /// Package version, identical to the run's resolved version
    pub version: Version,
    /// Architecture tag, identical to the configured target
    pub architecture: String,
    /// Archive section
    pub section: String,
    /// Install priority
    pub priority: String,
    /// Runtime dependencies
    pub depends: Vec<String>,
    /// Maintainer identity (`Name <email>`)
    pub maintainer: String,
    /// Optional homepage URL
    pub homepage: Option<String>,
    /// Installed size in KiB
    pub installed_size_kb: u64,
    /// One-line summary
    pub summary: String,
    /// Extended description
    pub description: String,
}

impl PackageMetadata {
    /// Build metadata for `version` from static configuration
    pub fn new(config: &PackagingConfig, version: &Version, installed_size_kb: u64) -> Self {
        Self {
            name: config.package_name.clone(),
            version: version.clone(),
            architecture: config.architecture.clone(),
            section: config.section.clone(),
            priority: config.priority.clone(),
            depends: config.depends.clone(),
            maintainer: config.maintainer.clone(),
            homepage: config.homepage.clone(),
            installed_size_kb,
            summary: config.summary.clone(),
            description: config.description.clone(),
        }
    }

    /// Render the control record, one `Key: Value` line per field.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Package: {}", self.name);
        let _ = writeln!(out, "Version: {}", self.version);
        let _ = writeln!(out, "Architecture: {}", self.architecture);
        let _ = writeln!(out, "Installed-Size: {}", self.installed_size_kb);
        let _ = writeln!(out, "Maintainer: {}", self.maintainer);
        let _ = writeln!(out, "Section: {}", self.section);
        let _ = writeln!(out, "Priority: {}", self.priority);
        if let Some(homepage) = &self.homepage {
            let _ = writeln!(out, "Homepage: {}", homepage);
        }
        if !self.depends.is_empty() {
            let _ = writeln!(out, "Depends: {}", self.depends.join(", "));
        }

        let summary = self.summary.trim();
        let summary = if summary.is_empty() { "(no description)" } else { summary };
        let _ = writeln!(out, "Description: {}", summary);
        out.push_str(&format_description_body(&self.description));
        out
    }
}

/// Continuation lines of a multi-line description.
///
/// Each line is prefixed with a single space; a blank line becomes ` .`.
/// Leading and trailing blank lines are dropped.
pub fn format_description_body(description: &str) -> String {
    let lines: Vec<&str> = description.lines().map(str::trim).collect();
    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());

    let mut out = String::new();
    if let (Some(start), Some(end)) = (start, end) {
        for line in &lines[start..=end] {
            if line.is_empty() {
                out.push_str(" .\n");
            } else {
                out.push(' ');
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> PackageMetadata {
        let config = PackagingConfig {
            package_name: "pkg".to_string(),
            depends: vec!["libgtk-3-0".to_string(), "python3".to_string()],
            summary: "Prompt workbench".to_string(),
            description: "Improves prompts.\n\nWorks offline.".to_string(),
            ..Default::default()
        };
        PackageMetadata::new(&config, &Version::new(2, 1, 0), 12)
    }

    #[test]
    fn control_record_layout() {
        let rendered = metadata().render();
        assert_eq!(
            rendered,
            "Package: pkg\n\
             Version: 2.1.0\n\
             Architecture: amd64\n\
             Installed-Size: 12\n\
             Maintainer: Unknown <unknown@example.com>\n\
             Section: utils\n\
             Priority: optional\n\
             Depends: libgtk-3-0, python3\n\
             Description: Prompt workbench\n \
             Improves prompts.\n \
             .\n \
             Works offline.\n"
        );
    }

    #[test]
    fn empty_depends_and_description_are_omitted() {
        let mut meta = metadata();
        meta.depends.clear();
        meta.description = "\n\n".to_string();
        let rendered = meta.render();
        assert!(!rendered.contains("Depends:"));
        assert!(rendered.ends_with("Description: Prompt workbench\n"));
    }

    #[test]
    fn description_trims_outer_blank_lines() {
        assert_eq!(format_description_body("\n a \n\n\n b\n\n"), " a\n .\n .\n b\n");
    }
}
