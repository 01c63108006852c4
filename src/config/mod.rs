//! Site configuration management for `pismo.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   ├── script     # [script]
//! │   ├── advanced   # [advanced]
//! │   ├── seo        # [seo]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Reloadable ConfigHandle
//! └── mod.rs         # PismoConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                           |
//! |----------------|---------------------------------------------------|
//! | `[site]`       | Home URL and locale                               |
//! | `[script]`     | Source/default script, query param, cookie        |
//! | `[advanced]`   | Search, title, AJAX and media fixes               |
//! | `[seo]`        | Canonical policy, integration, sitemap parameter  |
//! | `[serve]`      | Reference server (interface, port, root)          |

pub mod section;
pub mod types;

pub use section::{
    AdvancedConfig, CanonicalPolicy, ScriptConfig, ScriptPriority, SeoConfig, ServeConfig,
    SiteConfig,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, ConfigHandle, FieldPath};

use crate::log;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing pismo.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PismoConfig {
    /// Directory containing the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub script: ScriptConfig,

    #[serde(default)]
    pub advanced: AdvancedConfig,

    #[serde(default)]
    pub seo: SeoConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl PismoConfig {
    /// Parse configuration from TOML string without validation.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse the content of the config file at `path`.
    ///
    /// Unknown fields are reported as warnings, validation errors are
    /// returned as [`ConfigError::Diagnostics`].
    pub fn parse_file(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let (mut config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate all sections, printing warnings and returning errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let diag = self.diagnostics();
        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Collect diagnostics of all sections.
    pub fn diagnostics(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        self.site.validate(&mut diag);
        self.script.validate(&mut diag);
        self.seo.validate(&mut diag);
        diag
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Directory served by the reference server.
    pub fn serve_root(&self) -> PathBuf {
        self.root.join(&self.serve.root)
    }

    /// Fill `site.url` from the bind address when it is not configured.
    pub fn apply_serve_defaults(&mut self) {
        if self.site.url.is_none() {
            self.site.url = Some(format!(
                "http://{}:{}",
                self.serve.interface, self.serve.port
            ));
        }
    }
}

/// Parse a config string for tests, panicking on errors.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PismoConfig {
    PismoConfig::from_str(content).expect("test config should parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_ignored_collects_unknown_fields() {
        let (config, ignored) =
            PismoConfig::parse_with_ignored("[script]\nsource = \"lat\"\ncolour = 1\n[extra]\na = 1")
                .unwrap();
        assert_eq!(config.script.source, crate::script::Script::Latin);
        assert!(ignored.contains(&"script.colour".to_string()));
        assert!(ignored.contains(&"extra".to_string()));
    }

    #[test]
    fn test_parse_file_sets_root() {
        let config =
            PismoConfig::parse_file("[serve]\nroot = \"www\"", Path::new("/srv/site/pismo.toml"))
                .unwrap();
        assert_eq!(config.root, Path::new("/srv/site"));
        assert_eq!(config.serve_root(), Path::new("/srv/site/www"));
    }

    #[test]
    fn test_parse_file_rejects_invalid() {
        let err = PismoConfig::parse_file("[site]\nurl = \"nope\"", Path::new("pismo.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Diagnostics(_)));
    }

    #[test]
    fn test_invalid_enum_value_is_parse_error() {
        assert!(matches!(
            PismoConfig::from_str("[script]\nsource = \"greek\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_apply_serve_defaults() {
        let mut config = test_parse_config("[serve]\nport = 9000");
        config.apply_serve_defaults();
        assert_eq!(config.site.url.as_deref(), Some("http://127.0.0.1:9000"));

        let mut config = test_parse_config("[site]\nurl = \"https://primer.rs\"");
        config.apply_serve_defaults();
        assert_eq!(config.site.url.as_deref(), Some("https://primer.rs"));
    }
}
