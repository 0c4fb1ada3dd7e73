//! Packaging configuration.
//!
//! A [`PackagingConfig`] is built once per run, either from defaults or from a
//! `deskpack.toml` file, and passed by reference to every pipeline component.
//!
//! ```toml
//! package_name = "prompt-studio"
//! architecture = "amd64"
//! depends = ["libgtk-3-0", "python3 (>= 3.10)"]
//!
//! [desktop]
//! name = "Prompt Studio"
//! categories = ["Utility", "Development"]
//!
//! [desktop.name_locales]
//! de = "Prompt-Studio"
//! ```

use crate::error::{ConfigError, Result};
use crate::release::{PREVIOUS_VERSION_TOKEN, VERSION_TOKEN};
use semver::Version;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

/// Name of the config file looked up in the project directory
pub const DEFAULT_CONFIG_FILE: &str = "deskpack.toml";

/// Value substituted for the maintainer token when no identity is supplied
pub const DEFAULT_MAINTAINER_IDENTITY: &str = "YOUR_USERNAME";

/// Environment variable consulted by the CLI for the maintainer identity
pub const MAINTAINER_ENV_VAR: &str = "DESKPACK_MAINTAINER";

/// Immutable configuration for one packaging/release run
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackagingConfig {
    /// Debian package name, also used as the installed executable name
    pub package_name: String,
    /// Architecture tag written into the control record and file name
    pub architecture: String,
    /// Base name of the compiled binary in `binary_dir`; defaults to `package_name`
    pub binary_name: Option<String>,
    /// Directory holding `{binary_name}-{version}`
    pub binary_dir: PathBuf,
    /// Authoritative version source
    pub version_file: PathBuf,
    /// Where packages and release bundles are written
    pub output_dir: PathBuf,
    /// Root of the ephemeral staging trees
    pub staging_dir: PathBuf,
    /// Optional license file, installed as the copyright file
    pub license_file: PathBuf,
    /// Optional readme, installed gzip-compressed
    pub readme_file: PathBuf,
    /// Optional icon, installed into the hicolor theme
    pub icon_file: Option<PathBuf>,
    /// Release-notes template
    pub release_notes_template: PathBuf,
    /// File name of the composed release notes inside the bundle
    pub release_notes_name: String,
    /// Placeholder replaced with the maintainer identity
    pub maintainer_token: String,
    /// Control-record maintainer field
    pub maintainer: String,
    /// Control-record section
    pub section: String,
    /// Control-record priority
    pub priority: String,
    /// Optional project homepage
    pub homepage: Option<String>,
    /// Runtime package dependencies
    pub depends: Vec<String>,
    /// One-line package summary
    pub summary: String,
    /// Extended description, may span several paragraphs
    pub description: String,
    /// Desktop-entry settings
    pub desktop: DesktopSettings,
}

/// Desktop-entry settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesktopSettings {
    /// Display name; defaults to the package name
    pub name: Option<String>,
    /// Localized display names keyed by locale (e.g. `de`, `pt_BR`)
    pub name_locales: BTreeMap<String, String>,
    /// Tooltip comment; defaults to the package summary
    pub comment: Option<String>,
    /// Localized comments keyed by locale
    pub comment_locales: BTreeMap<String, String>,
    /// Icon name; defaults to the package name
    pub icon: Option<String>,
    /// Menu categories
    pub categories: Vec<String>,
    /// Whether the launcher shows a startup notification
    pub startup_notify: bool,
    /// Whether the application runs in a terminal
    pub terminal: bool,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            name: None,
            name_locales: BTreeMap::new(),
            comment: None,
            comment_locales: BTreeMap::new(),
            icon: None,
            categories: vec!["Utility".to_string()],
            startup_notify: true,
            terminal: false,
        }
    }
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            package_name: "app".to_string(),
            architecture: "amd64".to_string(),
            binary_name: None,
            binary_dir: PathBuf::from("dist"),
            version_file: PathBuf::from("VERSION"),
            output_dir: PathBuf::from("."),
            staging_dir: PathBuf::from("build/staging"),
            license_file: PathBuf::from("LICENSE"),
            readme_file: PathBuf::from("README.md"),
            icon_file: None,
            release_notes_template: PathBuf::from("RELEASE_NOTES_TEMPLATE.md"),
            release_notes_name: "RELEASE_NOTES.md".to_string(),
            maintainer_token: "{MAINTAINER}".to_string(),
            maintainer: "Unknown <unknown@example.com>".to_string(),
            section: "utils".to_string(),
            priority: "optional".to_string(),
            homepage: None,
            depends: Vec::new(),
            summary: "Desktop application".to_string(),
            description: String::new(),
            desktop: DesktopSettings::default(),
        }
    }
}

impl PackagingConfig {
    /// Load configuration for a project directory.
    ///
    /// An explicit `config_path` must exist. Without one, `deskpack.toml` in
    /// `project_dir` is used when present and defaults otherwise.
    pub fn load(project_dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        let (path, required) = match config_path {
            Some(path) => (project_dir.join(path), true),
            None => (project_dir.join(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            log::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| {
            ConfigError::ConfigUnreadable {
                path: path.clone(),
                source,
            }
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::ConfigInvalid {
            path: path.clone(),
            source,
        })?;
        config.validate()?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject values that would produce an invalid package name or path
    pub fn validate(&self) -> Result<()> {
        let is_alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
        let valid_name = self.package_name.len() >= 2
            && self.package_name.starts_with(is_alnum)
            && self
                .package_name
                .chars()
                .all(|c| is_alnum(c) || "+-.".contains(c));
        if !valid_name {
            return Err(ConfigError::InvalidValue {
                field: "package_name",
                reason: format!(
                    "'{}' must be at least two characters of lowercase alphanumerics, \
                     '+', '-' or '.', starting with an alphanumeric",
                    self.package_name
                ),
            }
            .into());
        }
        if self.architecture.is_empty() || self.architecture.contains(['_', '/', ' ']) {
            return Err(ConfigError::InvalidValue {
                field: "architecture",
                reason: format!("'{}' is not a valid architecture tag", self.architecture),
            }
            .into());
        }
        // Staging trees are deleted on every run.
        let nested = self.staging_dir.components().next().is_some()
            && self
                .staging_dir
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !nested {
            return Err(ConfigError::InvalidValue {
                field: "staging_dir",
                reason: format!(
                    "'{}' must be a relative path below the project directory",
                    self.staging_dir.display()
                ),
            }
            .into());
        }
        if self.maintainer_token.is_empty()
            || self.maintainer_token == VERSION_TOKEN
            || self.maintainer_token == PREVIOUS_VERSION_TOKEN
        {
            return Err(ConfigError::InvalidValue {
                field: "maintainer_token",
                reason: format!(
                    "'{}' must be non-empty and distinct from {} and {}",
                    self.maintainer_token, VERSION_TOKEN, PREVIOUS_VERSION_TOKEN
                ),
            }
            .into());
        }
        Ok(())
    }

    /// Package file extension
    pub fn package_extension(&self) -> &'static str {
        "deb"
    }

    /// Base name of the compiled binary
    pub fn binary_name(&self) -> &str {
        self.binary_name.as_deref().unwrap_or(&self.package_name)
    }

    /// `{binary_dir}/{binary_name}-{version}`
    pub fn binary_path(&self, project_dir: &Path, version: &Version) -> PathBuf {
        project_path(project_dir, &self.binary_dir)
            .join(format!("{}-{}", self.binary_name(), version))
    }

    /// Output directory resolved against `project_dir`
    pub fn output_path(&self, project_dir: &Path) -> PathBuf {
        project_path(project_dir, &self.output_dir)
    }

    /// Staging root resolved against `project_dir`
    pub fn staging_path(&self, project_dir: &Path) -> PathBuf {
        project_path(project_dir, &self.staging_dir)
    }

    /// `{package_name}_{version}_{architecture}`
    pub fn package_base_name(&self, version: &Version) -> String {
        format!("{}_{}_{}", self.package_name, version, self.architecture)
    }

    /// `{package_name}_{version}_{architecture}.deb`
    pub fn package_file_name(&self, version: &Version) -> String {
        format!(
            "{}.{}",
            self.package_base_name(version),
            self.package_extension()
        )
    }

    /// Full path of the package artifact for `version`
    pub fn package_path(&self, project_dir: &Path, version: &Version) -> PathBuf {
        self.output_path(project_dir)
            .join(self.package_file_name(version))
    }

    /// Glob matching `{package_name}_{version}_{architecture}` for any version
    pub fn package_base_glob(&self) -> String {
        format!(
            "{}_*_{}",
            glob::Pattern::escape(&self.package_name),
            glob::Pattern::escape(&self.architecture)
        )
    }

    /// Glob matching every package of this name and architecture, any version
    pub fn package_glob(&self) -> String {
        format!("{}.{}", self.package_base_glob(), self.package_extension())
    }

    /// `release_v{version}` directory in the output directory
    pub fn release_dir(&self, project_dir: &Path, version: &Version) -> PathBuf {
        self.output_path(project_dir)
            .join(format!("release_v{}", version))
    }
}

/// `project_dir` joined with `relative`, without `.` segments
fn project_path(project_dir: &Path, relative: &Path) -> PathBuf {
    project_dir.join(relative).components().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_expected_names() {
        let config = PackagingConfig::default();
        let version = Version::parse("2.1.0").unwrap();

        assert_eq!(config.package_file_name(&version), "app_2.1.0_amd64.deb");
        assert_eq!(
            config.binary_path(Path::new("/p"), &version),
            PathBuf::from("/p/dist/app-2.1.0")
        );
        assert_eq!(
            config.release_dir(Path::new("/p"), &version),
            PathBuf::from("/p/release_v2.1.0")
        );
        assert_eq!(
            config.package_path(Path::new("/p"), &version),
            PathBuf::from("/p/app_2.1.0_amd64.deb")
        );
        assert_eq!(config.package_glob(), "app_*_amd64.deb");
        assert_eq!(config.package_base_glob(), "app_*_amd64");
    }

    #[test]
    fn toml_overrides_and_locales() {
        let config = PackagingConfig::from_toml(
            r#"
            package_name = "prompt-studio"
            binary_name = "PromptStudio"
            depends = ["python3"]

            [desktop]
            name = "Prompt Studio"
            categories = ["Development"]

            [desktop.name_locales]
            de = "Prompt-Studio"
            "#,
        )
        .unwrap();

        assert_eq!(config.package_name, "prompt-studio");
        assert_eq!(config.binary_name(), "PromptStudio");
        assert_eq!(config.architecture, "amd64");
        assert_eq!(config.desktop.name_locales["de"], "Prompt-Studio");
        assert!(config.desktop.startup_notify);
        config.validate().unwrap();
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PackagingConfig::from_toml("pakage_name = \"x\"").is_err());
    }

    #[test]
    fn invalid_package_name_is_configuration_error() {
        let config = PackagingConfig {
            package_name: "My App".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn package_name_must_be_a_debian_name() {
        for name in ["a", "-app", "+app", ".app", "app_x"] {
            let config = PackagingConfig {
                package_name: name.to_string(),
                ..Default::default()
            };
            assert_eq!(config.validate().unwrap_err().exit_code(), 2, "{}", name);
        }
        let config = PackagingConfig {
            package_name: "0ad".to_string(),
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn staging_dir_must_stay_inside_project() {
        for dir in ["", ".", "..", "./build", "build/../..", "/home/me"] {
            let config =
                PackagingConfig::from_toml(&format!("staging_dir = {:?}", dir)).unwrap();
            let err = config.validate().unwrap_err();
            assert_eq!(err.exit_code(), 2, "{}", dir);
            assert!(err.to_string().contains("staging_dir"));
        }
        let config = PackagingConfig::from_toml("staging_dir = \"target/staging\"").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PackagingConfig::load(dir.path(), Some(Path::new("nope.toml"))).is_err());
        assert!(PackagingConfig::load(dir.path(), None).is_ok());
    }
}
