//! FreeDesktop.org desktop entry generation.

use crate::config::PackagingConfig;
use std::collections::BTreeMap;
use std::fmt::Write;

/// A `.desktop` launcher record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Display name
    pub name: String,
    /// Display names keyed by locale
    pub name_locales: BTreeMap<String, String>,
    /// Tooltip comment
    pub comment: String,
    /// Comments keyed by locale
    pub comment_locales: BTreeMap<String, String>,
    /// Absolute path of the installed executable
    pub exec: String,
    /// Icon name from the icon theme
    pub icon: String,
    /// Menu categories
    pub categories: Vec<String>,
    /// Startup notification support
    pub startup_notify: bool,
    /// Run inside a terminal
    pub terminal: bool,
}

impl DesktopEntry {
    /// Build the entry from static configuration
    pub fn new(config: &PackagingConfig) -> Self {
        let desktop = &config.desktop;
        Self {
            name: desktop
                .name
                .clone()
                .unwrap_or_else(|| config.package_name.clone()),
            name_locales: desktop.name_locales.clone(),
            comment: desktop
                .comment
                .clone()
                .unwrap_or_else(|| config.summary.clone()),
            comment_locales: desktop.comment_locales.clone(),
            exec: format!("/usr/bin/{}", config.package_name),
            icon: desktop
                .icon
                .clone()
                .unwrap_or_else(|| config.package_name.clone()),
            categories: desktop.categories.clone(),
            startup_notify: desktop.startup_notify,
            terminal: desktop.terminal,
        }
    }

    /// Render as flat `key=value` pairs under a `[Desktop Entry]` header
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[Desktop Entry]");
        let _ = writeln!(out, "Type=Application");
        let _ = writeln!(out, "Name={}", escape(&self.name));
        for (locale, name) in &self.name_locales {
            let _ = writeln!(out, "Name[{}]={}", locale, escape(name));
        }
        if !self.comment.is_empty() {
            let _ = writeln!(out, "Comment={}", escape(&self.comment));
        }
        for (locale, comment) in &self.comment_locales {
            let _ = writeln!(out, "Comment[{}]={}", locale, escape(comment));
        }
        let _ = writeln!(out, "Exec={}", self.exec);
        let _ = writeln!(out, "Icon={}", self.icon);
        let _ = writeln!(out, "Terminal={}", self.terminal);
        if !self.categories.is_empty() {
            // List values end with a separator.
            let _ = writeln!(out, "Categories={};", self.categories.join(";"));
        }
        let _ = writeln!(out, "StartupNotify={}", self.startup_notify);
        out
    }
}

/// Escape characters that would break a single-line desktop value
fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesktopSettings;

    #[test]
    fn localized_keys_follow_base_keys() {
        let config = PackagingConfig {
            package_name: "pkg".to_string(),
            desktop: DesktopSettings {
                name: Some("Prompt Studio".to_string()),
                name_locales: BTreeMap::from([
                    ("de".to_string(), "Prompt-Studio".to_string()),
                    ("fr".to_string(), "Studio de prompts".to_string()),
                ]),
                comment: Some("Improve prompts".to_string()),
                comment_locales: BTreeMap::from([(
                    "de".to_string(),
                    "Prompts verbessern".to_string(),
                )]),
                categories: vec!["Utility".to_string(), "Development".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            DesktopEntry::new(&config).render(),
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Prompt Studio\n\
             Name[de]=Prompt-Studio\n\
             Name[fr]=Studio de prompts\n\
             Comment=Improve prompts\n\
             Comment[de]=Prompts verbessern\n\
             Exec=/usr/bin/pkg\n\
             Icon=pkg\n\
             Terminal=false\n\
             Categories=Utility;Development;\n\
             StartupNotify=true\n"
        );
    }

    #[test]
    fn defaults_fall_back_to_package_fields() {
        let config = PackagingConfig::default();
        let entry = DesktopEntry::new(&config);
        assert_eq!(entry.name, "app");
        assert_eq!(entry.comment, "Desktop application");
        assert_eq!(entry.icon, "app");
    }

    #[test]
    fn newlines_are_escaped() {
        assert_eq!(escape("a\nb"), "a\\nb");
    }
}
