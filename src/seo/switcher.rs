//! Script switcher links.

use crate::html;
use crate::script::Script;
use crate::url::ScriptUrl;

/// Captions and separator of the switcher.
#[derive(Debug, Clone)]
pub struct SwitcherOptions {
    pub cir_caption: String,
    pub lat_caption: String,
    /// Inserted as markup between the two links.
    pub separator: String,
}

impl Default for SwitcherOptions {
    fn default() -> Self {
        Self {
            cir_caption: "Ћирилица".into(),
            lat_caption: "Latinica".into(),
            separator: " | ".into(),
        }
    }
}

impl SwitcherOptions {
    fn caption(&self, script: Script) -> &str {
        match script {
            Script::Cyrillic => &self.cir_caption,
            Script::Latin => &self.lat_caption,
        }
    }
}

/// Two links pointing at both script variants of `current_url`, Cyrillic first.
pub fn switcher_html(options: &SwitcherOptions, urls: &ScriptUrl, current_url: &str) -> String {
    let links: Vec<String> = Script::ALL
        .iter()
        .map(|&script| {
            format!(
                r#"<a href="{}">{}</a>"#,
                html::escape_attr(&urls.script_url(script, current_url)),
                html::escape(options.caption(script))
            )
        })
        .collect();
    links.join(&options.separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_switcher() {
        let urls = ScriptUrl::new(Script::Cyrillic);
        assert_eq!(
            switcher_html(&SwitcherOptions::default(), &urls, "https://x.rs/lat/vesti/"),
            r#"<a href="https://x.rs/vesti/">Ћирилица</a> | <a href="https://x.rs/lat/vesti/">Latinica</a>"#
        );
    }

    #[test]
    fn test_custom_captions_are_escaped() {
        let options = SwitcherOptions {
            cir_caption: "Ћ<".into(),
            lat_caption: "L".into(),
            separator: "<span>/</span>".into(),
        };
        let urls = ScriptUrl::new(Script::Latin);
        assert_eq!(
            switcher_html(&options, &urls, "/"),
            r#"<a href="/cir/">Ћ&lt;</a><span>/</span><a href="/">L</a>"#
        );
    }
}
