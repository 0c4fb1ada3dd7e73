//! Post-install lifecycle hook.
//!
//! The hook only refreshes desktop-integration caches. Each step checks that
//! its tool is installed, ignores the tool's exit status, and the script
//! always ends with `exit 0`.

use crate::error::Result;
use handlebars::Handlebars;
use semver::Version;
use serde::Serialize;

const POSTINST_TEMPLATE: &str = r#"#!/bin/sh
# postinst for {{package}} {{version}}

{{#each refreshes}}
if command -v {{tool}} >/dev/null 2>&1; then
    {{tool}} {{args}} || true
fi
{{/each}}

exit 0
"#;

/// One best-effort cache refresh
#[derive(Debug, Clone, Serialize)]
pub struct CacheRefresh {
    /// Program to run
    pub tool: &'static str,
    /// Arguments, already shell-safe
    pub args: &'static str,
}

/// Refresh steps run after install
pub const CACHE_REFRESHES: &[CacheRefresh] = &[
    CacheRefresh {
        tool: "update-desktop-database",
        args: "-q /usr/share/applications",
    },
    CacheRefresh {
        tool: "gtk-update-icon-cache",
        args: "-q -t -f /usr/share/icons/hicolor",
    },
];

#[derive(Serialize)]
struct HookData<'a> {
    package: &'a str,
    version: String,
    refreshes: &'a [CacheRefresh],
}

/// Render the `postinst` script
pub fn render_postinst(package: &str, version: &Version) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let data = HookData {
        package,
        version: version.to_string(),
        refreshes: CACHE_REFRESHES,
    };
    Ok(handlebars.render_template(POSTINST_TEMPLATE, &data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_refresh_is_guarded_and_non_fatal() {
        let script = render_postinst("pkg", &Version::new(1, 0, 0)).unwrap();

        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.trim_end().ends_with("exit 0"));
        assert!(!script.contains("set -e"));
        for refresh in CACHE_REFRESHES {
            assert!(script.contains(&format!(
                "if command -v {} >/dev/null 2>&1; then",
                refresh.tool
            )));
            assert!(script.contains(&format!("{} {} || true", refresh.tool, refresh.args)));
        }
    }

    #[test]
    fn header_names_package_and_version() {
        let script = render_postinst("pkg", &Version::new(2, 1, 0)).unwrap();
        assert!(script.contains("# postinst for pkg 2.1.0"));
    }
}
