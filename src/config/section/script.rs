//! `[script]` section configuration.
//!
//! Controls how the script of a request is chosen.
//!
//! # Example
//!
//! ```toml
//! [script]
//! source = "cir"          # Script the content is authored in
//! default = "cir"         # Script for visitors without any preference
//! url_param = "pismo"     # Query parameter: ?pismo=lat
//! priority = "url"        # "url": slug-free URLs serve the source script
//!                         # "cookie": a stored preference wins
//! cookie = "stl_script"   # Preference cookie name
//! bypass_paths = ["/wp-admin", "/wp-login", "/wp-json"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::script::Script;
use serde::{Deserialize, Serialize};

/// What decides the script when the URL carries no slug and no query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptPriority {
    /// Slug-free URLs always serve the source script.
    #[default]
    Url,
    /// The preference cookie is honoured.
    Cookie,
}

/// Script selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Script content is authored in.
    pub source: Script,

    /// Script used when no signal selects one.
    pub default: Script,

    /// Query parameter name.
    pub url_param: String,

    pub priority: ScriptPriority,

    /// Preference cookie name.
    pub cookie: String,

    /// Path prefixes that are never transliterated (admin, login, API).
    pub bypass_paths: Vec<String>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            source: Script::Cyrillic,
            default: Script::Cyrillic,
            url_param: "pismo".into(),
            priority: ScriptPriority::Url,
            cookie: "stl_script".into(),
            bypass_paths: vec!["/wp-admin".into(), "/wp-login".into(), "/wp-json".into()],
        }
    }
}

/// RFC 6265 token characters allowed in a cookie name.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

impl ScriptConfig {
    pub const URL_PARAM: FieldPath = FieldPath::new("script.url_param");
    pub const COOKIE: FieldPath = FieldPath::new("script.cookie");
    pub const BYPASS_PATHS: FieldPath = FieldPath::new("script.bypass_paths");

    /// Validate script configuration.
    ///
    /// # Checks
    /// - `url_param` is a non-empty query key
    /// - `cookie` is a valid cookie name
    /// - every bypass path starts with `/`
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.url_param.is_empty()
            || self.url_param.contains(['&', '=', '#', '?', ' '])
        {
            diag.error_with_hint(
                Self::URL_PARAM,
                format!("'{}' is not a usable query parameter name", self.url_param),
                "use a plain name like \"pismo\"",
            );
        }

        if !is_cookie_token(&self.cookie) {
            diag.error_with_hint(
                Self::COOKIE,
                format!("'{}' is not a valid cookie name", self.cookie),
                "use letters, digits, '-' or '_'",
            );
        }

        for path in &self.bypass_paths {
            if !path.starts_with('/') {
                diag.error_with_hint(
                    Self::BYPASS_PATHS,
                    format!("'{path}' must start with '/'"),
                    format!("use \"/{}\"", path.trim_start_matches('/')),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_script_config() {
        let config = test_parse_config(
            "[script]\nsource = \"lat\"\ndefault = \"lat\"\nurl_param = \"script\"\npriority = \"cookie\"",
        );
        assert_eq!(config.script.source, Script::Latin);
        assert_eq!(config.script.default, Script::Latin);
        assert_eq!(config.script.url_param, "script");
        assert_eq!(config.script.priority, ScriptPriority::Cookie);
    }

    #[test]
    fn test_script_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.script.source, Script::Cyrillic);
        assert_eq!(config.script.default, Script::Cyrillic);
        assert_eq!(config.script.url_param, "pismo");
        assert_eq!(config.script.priority, ScriptPriority::Url);
        assert_eq!(config.script.cookie, "stl_script");
        assert_eq!(config.script.bypass_paths.len(), 3);
    }

    #[test]
    fn test_validate() {
        let mut config = test_parse_config("");
        config.script.url_param = "a=b".into();
        config.script.cookie = "bad cookie".into();
        config.script.bypass_paths = vec!["admin".into()];

        let mut diag = ConfigDiagnostics::new();
        config.script.validate(&mut diag);
        assert_eq!(diag.len(), 3);
    }
}
