//! `[seo]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [seo]
//! canonical = "self"             # "source" | "target" | "self"
//! integration = false            # A third-party SEO layer emits canonical tags
//! sitemap_param = "lcb_script"   # Sitemap query parameter selecting the script
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Which script variant the canonical link points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CanonicalPolicy {
    /// Always the source-script URL.
    #[serde(rename = "source")]
    Source,
    /// Always the non-source-script URL.
    #[serde(rename = "target")]
    Target,
    /// The script being served.
    #[default]
    #[serde(rename = "self")]
    Served,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub canonical: CanonicalPolicy,

    /// A third-party SEO integration is active and emits its own canonical.
    pub integration: bool,

    pub sitemap_param: String,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            canonical: CanonicalPolicy::Served,
            integration: false,
            sitemap_param: "lcb_script".into(),
        }
    }
}

impl SeoConfig {
    pub const SITEMAP_PARAM: FieldPath = FieldPath::new("seo.sitemap_param");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.sitemap_param.is_empty() || self.sitemap_param.contains(['&', '=', '#', '?']) {
            diag.error_with_hint(
                Self::SITEMAP_PARAM,
                format!("'{}' is not a usable query parameter name", self.sitemap_param),
                "use the default \"lcb_script\"",
            );
        }
    }
}
