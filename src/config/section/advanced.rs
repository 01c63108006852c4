//! `[advanced]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [advanced]
//! fix_search = false      # Search in both scripts (sr_RS only)
//! fix_titles = false      # Transliterate document titles
//! fix_ajax = false        # Transliterate whitelisted AJAX responses
//! fix_media = true        # Swap __cir/__lat image variants
//! ajax_actions = ["load_more", "filter_posts"]
//! ```

use serde::{Deserialize, Serialize};

/// Optional output fixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    pub fix_search: bool,
    pub fix_titles: bool,
    pub fix_ajax: bool,
    pub fix_media: bool,

    /// AJAX actions whose responses are transliterated.
    pub ajax_actions: Vec<String>,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            fix_search: false,
            fix_titles: false,
            fix_ajax: false,
            fix_media: true,
            ajax_actions: Vec::new(),
        }
    }
}

impl AdvancedConfig {
    /// Whether responses of `action` are transliterated.
    ///
    /// Comparison ignores surrounding whitespace and ASCII case.
    pub fn allows_ajax(&self, action: &str) -> bool {
        let action = action.trim();
        self.fix_ajax
            && !action.is_empty()
            && self
                .ajax_actions
                .iter()
                .any(|allowed| allowed.trim().eq_ignore_ascii_case(action))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_advanced_config_defaults() {
        let config = test_parse_config("");
        assert!(!config.advanced.fix_search);
        assert!(!config.advanced.fix_titles);
        assert!(!config.advanced.fix_ajax);
        assert!(config.advanced.fix_media);
        assert!(config.advanced.ajax_actions.is_empty());
    }

    #[test]
    fn test_allows_ajax() {
        let config =
            test_parse_config("[advanced]\nfix_ajax = true\najax_actions = [\" load_more \", \"Filter\"]");
        assert!(config.advanced.allows_ajax("load_more"));
        assert!(config.advanced.allows_ajax("filter"));
        assert!(!config.advanced.allows_ajax("heartbeat"));
        assert!(!config.advanced.allows_ajax(""));

        let disabled = test_parse_config("[advanced]\najax_actions = [\"load_more\"]");
        assert!(!disabled.advanced.allows_ajax("load_more"));
    }
}
