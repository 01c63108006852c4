//! Site locale and BCP-47 tags.

use super::Script;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Locales whose content is published in both scripts.
const DUAL_SCRIPT: [&str; 3] = ["sr_RS", "bs_BA", "mk_MK"];

/// Site locale as configured by the host (e.g. `sr_RS`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Default for Locale {
    fn default() -> Self {
        Self::new("sr_RS")
    }
}

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dual-script handling (transliteration) applies to this locale.
    pub fn is_dual_script(&self) -> bool {
        DUAL_SCRIPT.contains(&self.0.as_str())
    }

    pub fn is_serbian(&self) -> bool {
        self.0 == "sr_RS"
    }

    /// BCP-47 tag combining language, script and region (`sr-Latn-RS`).
    ///
    /// Only Serbian and Bosnian publish script-tagged variants.
    pub fn lang_tag(&self, script: Script) -> Option<String> {
        let (lang, region) = match self.0.as_str() {
            "sr_RS" => ("sr", "RS"),
            "bs_BA" => ("bs", "BA"),
            _ => return None,
        };
        Some(format!("{lang}-{}-{region}", script.subtag()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
