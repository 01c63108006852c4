//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.rs"   # Home URL: cookie domain, canonical and sitemap links
//! locale = "sr_RS"             # Dual-script handling applies to sr_RS, bs_BA, mk_MK
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::script::Locale;
use serde::{Deserialize, Serialize};

/// Site identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Home URL (e.g. `https://example.rs`).
    pub url: Option<String>,

    /// Site locale (e.g. `sr_RS`).
    pub locale: Locale,
}

impl SiteConfig {
    pub const URL: FieldPath = FieldPath::new("site.url");
    pub const LOCALE: FieldPath = FieldPath::new("site.locale");

    /// Home URL without a trailing slash, or empty when not configured.
    pub fn home(&self) -> &str {
        self.url.as_deref().map_or("", |u| u.trim_end_matches('/'))
    }

    /// Host of the home URL.
    pub fn host(&self) -> Option<String> {
        let url = url::Url::parse(self.url.as_deref()?).ok()?;
        url.host_str().map(str::to_string)
    }

    /// Home URL uses https.
    pub fn is_secure(&self) -> bool {
        self.url
            .as_deref()
            .and_then(|u| url::Url::parse(u).ok())
            .is_some_and(|u| u.scheme() == "https")
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` must be a valid http(s) URL with a host
    /// - a locale without dual-script handling is reported as a warning
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url_str) = &self.url {
            match url::Url::parse(url_str) {
                Ok(parsed) => {
                    if !matches!(parsed.scheme(), "http" | "https") {
                        diag.error_with_hint(
                            Self::URL,
                            format!(
                                "scheme '{}' not supported, must be http or https",
                                parsed.scheme()
                            ),
                            "use format like https://example.rs",
                        );
                    }
                    if parsed.host_str().is_none() {
                        diag.error_with_hint(
                            Self::URL,
                            "URL must have a valid host",
                            "use format like https://example.rs",
                        );
                    }
                }
                Err(e) => {
                    diag.error_with_hint(
                        Self::URL,
                        format!("invalid URL: {e}"),
                        "use format like https://example.rs",
                    );
                }
            }
        }

        if !self.locale.is_dual_script() {
            diag.warn(
                Self::LOCALE,
                format!("locale '{}' is served without transliteration", self.locale),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_site_config() {
        let config = test_parse_config("[site]\nurl = \"https://Primer.rs/\"\nlocale = \"bs_BA\"");
        assert_eq!(config.site.home(), "https://Primer.rs");
        assert_eq!(config.site.host().as_deref(), Some("primer.rs"));
        assert!(config.site.is_secure());
        assert_eq!(config.site.locale.as_str(), "bs_BA");
    }

    #[test]
    fn test_non_ascii_home() {
        let config = test_parse_config("[site]\nurl = \"http://ђура.срб\"");
        assert!(!config.site.is_secure());
        assert_eq!(config.site.home(), "http://ђура.срб");

        let config = test_parse_config("[site]\nurl = \"https://ђура.срб/\"");
        assert!(config.site.is_secure());
    }

    #[test]
    fn test_site_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.home(), "");
        assert_eq!(config.site.host(), None);
        assert!(!config.site.is_secure());
        assert_eq!(config.site.locale.as_str(), "sr_RS");
    }

    #[test]
    fn test_validate_url() {
        let config = test_parse_config("[site]\nurl = \"ftp://primer.rs\"");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.has_errors());

        let config = test_parse_config("[site]\nurl = \"not a url\"");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_validate_locale_warns() {
        let config = test_parse_config("[site]\nlocale = \"en_US\"");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }
}
