//! SEO metadata for dual-script sites.
//!
//! Every page has a Cyrillic and a Latin address. This module keeps search
//! engines informed about both:
//!
//! - `lang` attribute with the script subtag (`sr-Latn-RS`)
//! - canonical link following `seo.canonical`
//! - `hreflang` alternates for both variants
//! - transliterated meta strings and structured data
//! - script variants of sitemaps

mod lang;
mod sitemap;
mod switcher;

pub use crate::config::CanonicalPolicy;
pub use lang::language_attributes;
pub use sitemap::{
    LEGACY_LATIN_PARAM, SitemapLink, index_entry_xml, rewrite_sitemap, sitemap_index_entry,
    sitemap_target,
};
pub use switcher::{SwitcherOptions, switcher_html};

use crate::config::PismoConfig;
use crate::html;
use crate::pipeline::{Fragment, convert_markup};
use crate::resolve::ScriptState;
use crate::script::{Direction, Script, contains_cyrillic};
use crate::translit::Transliterator;
use crate::url::ScriptUrl;
use std::borrow::Cow;

/// One `hreflang` alternate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

/// Per-request SEO helper.
pub struct SeoAdapter<'a> {
    state: &'a ScriptState,
    urls: &'a ScriptUrl,
    translit: Transliterator,
    config: &'a PismoConfig,
    current_url: String,
    hreflang_emitted: bool,
    head_buffering: bool,
}

impl<'a> SeoAdapter<'a> {
    pub fn new(
        state: &'a ScriptState,
        urls: &'a ScriptUrl,
        translit: Transliterator,
        config: &'a PismoConfig,
        current_url: impl Into<String>,
    ) -> Self {
        Self {
            state,
            urls,
            translit,
            config,
            current_url: current_url.into(),
            hreflang_emitted: false,
            head_buffering: false,
        }
    }

    #[inline]
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Rewrite the `<html>` attribute string with the served script's tag.
    pub fn language_attributes<'b>(&self, output: &'b str) -> Cow<'b, str> {
        language_attributes(output, self.state.locale(), self.state.target())
    }

    fn canonical_script(&self) -> Script {
        match self.config.seo.canonical {
            CanonicalPolicy::Source => self.state.source(),
            CanonicalPolicy::Target => self.state.source().other(),
            CanonicalPolicy::Served => self.state.target(),
        }
    }

    /// Canonical URL of the current page.
    pub fn canonical(&self) -> String {
        self.urls.script_url(self.canonical_script(), &self.current_url)
    }

    /// Canonical for an SEO integration. The integration's own URL is
    /// replaced by the one built from the current request.
    pub fn filter_canonical(&self, _url: &str) -> String {
        self.canonical()
    }

    fn alternate_list(&self) -> Option<[Alternate; 2]> {
        let locale = self.state.locale();
        let alternate = |script: Script| {
            Some(Alternate {
                hreflang: locale.lang_tag(script)?,
                href: self.urls.script_url(script, &self.current_url),
            })
        };
        Some([alternate(Script::Cyrillic)?, alternate(Script::Latin)?])
    }

    /// Both script variants for an integration's `hreflang` output, Cyrillic
    /// first. Fallback tags skip their own alternates afterwards.
    ///
    /// `None` for locales without script-tagged variants.
    pub fn alternates(&mut self) -> Option<[Alternate; 2]> {
        let list = self.alternate_list()?;
        self.hreflang_emitted = true;
        Some(list)
    }

    /// Open Graph URL pointing at the served variant.
    pub fn og_url(&self, url: &str) -> String {
        self.urls.script_url(self.state.target(), url)
    }

    /// `<link>` tags for pages without an SEO integration.
    ///
    /// The canonical is left to the integration when one is active, the
    /// alternates are skipped once `alternates()` handed them out.
    pub fn fallback_tags(&self) -> String {
        let Some(alternates) = self.alternate_list() else {
            return String::new();
        };

        let mut out = String::new();
        if !self.config.seo.integration {
            out.push_str(&format!(
                "<link rel=\"canonical\" href=\"{}\" />\n",
                html::escape_attr(&self.canonical())
            ));
        }
        if !self.hreflang_emitted {
            for alt in &alternates {
                out.push_str(&format!(
                    "<link rel=\"alternate\" href=\"{}\" hreflang=\"{}\" />\n",
                    html::escape_attr(&alt.href),
                    html::escape_attr(&alt.hreflang)
                ));
            }
        }
        out
    }

    /// Convert a meta string for the served script.
    ///
    /// Serbian Latin pages without a conversion direction (Latin-source
    /// sites) still get Cyrillic values (author names and the like) in Latin.
    pub fn transliterate_meta<'b>(&self, value: &'b str) -> Cow<'b, str> {
        let direction = self.state.direction();
        if !direction.is_none() {
            return convert_markup(self.translit, direction, value);
        }
        if self.state.target() == Script::Latin
            && self.state.locale().is_serbian()
            && contains_cyrillic(value)
        {
            return convert_markup(self.translit, Direction::CirToLat, value);
        }
        Cow::Borrowed(value)
    }

    /// Convert every string of a structured-data graph.
    pub fn transliterate_graph(&self, graph: Fragment) -> Fragment {
        if self.state.direction().is_none() {
            return graph;
        }
        graph.map_text(&|text: &str| self.transliterate_meta(text))
    }

    /// Start capturing integration head output. `false` when nothing needs
    /// converting or a capture is already running.
    pub fn head_buffer_start(&mut self) -> bool {
        if self.state.direction().is_none() || self.head_buffering {
            return false;
        }
        self.head_buffering = true;
        true
    }

    /// End the capture and return the converted head output.
    pub fn head_buffer_end(&mut self, output: String) -> String {
        if !self.head_buffering {
            return output;
        }
        self.head_buffering = false;
        let converted = match self.transliterate_meta(&output) {
            Cow::Owned(converted) => Some(converted),
            Cow::Borrowed(_) => None,
        };
        converted.unwrap_or(output)
    }

    pub fn switcher_html(&self, options: &SwitcherOptions) -> String {
        switcher_html(options, self.urls, &self.current_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::script::Locale;

    const HOME: &str = "[site]\nurl = \"https://example.rs\"\n";

    fn state(target: Script, locale: &str) -> ScriptState {
        ScriptState::new(Script::Cyrillic, target, Locale::new(locale)).with_route("vesti/", target == Script::Latin)
    }

    fn check<F>(config: &str, state: &ScriptState, f: F)
    where
        F: FnOnce(&mut SeoAdapter<'_>),
    {
        let config = test_parse_config(config);
        let urls = ScriptUrl::new(config.script.source);
        let mut seo = SeoAdapter::new(
            state,
            &urls,
            Transliterator::new(),
            &config,
            "https://example.rs/vesti/",
        );
        f(&mut seo);
    }

    #[test]
    fn test_language_attributes() {
        check(HOME, &state(Script::Latin, "sr_RS"), |seo| {
            assert_eq!(seo.language_attributes(r#"lang="sr-RS""#), r#"lang="sr-Latn-RS""#);
        });
        check(HOME, &state(Script::Cyrillic, "mk_MK"), |seo| {
            assert_eq!(seo.language_attributes(r#"lang="mk""#), r#"lang="mk""#);
        });
    }

    #[test]
    fn test_canonical_policies() {
        let latin = state(Script::Latin, "sr_RS");
        check(HOME, &latin, |seo| {
            assert_eq!(seo.canonical(), "https://example.rs/lat/vesti/");
        });
        check(&format!("{HOME}[seo]\ncanonical = \"source\""), &latin, |seo| {
            assert_eq!(seo.canonical(), "https://example.rs/vesti/");
            assert_eq!(seo.filter_canonical("https://other/"), "https://example.rs/vesti/");
        });
        check(
            &format!("{HOME}[seo]\ncanonical = \"target\""),
            &state(Script::Cyrillic, "sr_RS"),
            |seo| assert_eq!(seo.canonical(), "https://example.rs/lat/vesti/"),
        );
    }

    #[test]
    fn test_alternates_and_fallback_tags() {
        check(HOME, &state(Script::Latin, "sr_RS"), |seo| {
            let tags = seo.fallback_tags();
            assert_eq!(
                tags,
                "<link rel=\"canonical\" href=\"https://example.rs/lat/vesti/\" />\n\
                 <link rel=\"alternate\" href=\"https://example.rs/vesti/\" hreflang=\"sr-Cyrl-RS\" />\n\
                 <link rel=\"alternate\" href=\"https://example.rs/lat/vesti/\" hreflang=\"sr-Latn-RS\" />\n"
            );

            let alts = seo.alternates().unwrap();
            assert_eq!(alts[0].hreflang, "sr-Cyrl-RS");
            assert_eq!(alts[1].href, "https://example.rs/lat/vesti/");
            assert_eq!(
                seo.fallback_tags(),
                "<link rel=\"canonical\" href=\"https://example.rs/lat/vesti/\" />\n"
            );
        });
    }

    #[test]
    fn test_fallback_tags_with_integration() {
        check(
            &format!("{HOME}[seo]\nintegration = true"),
            &state(Script::Cyrillic, "bs_BA"),
            |seo| {
                let tags = seo.fallback_tags();
                assert!(!tags.contains("canonical"));
                assert!(tags.contains("hreflang=\"bs-Cyrl-BA\""));
                assert!(tags.contains("hreflang=\"bs-Latn-BA\""));
            },
        );
    }

    #[test]
    fn test_untagged_locale_has_no_alternates() {
        check(HOME, &state(Script::Latin, "mk_MK"), |seo| {
            assert!(seo.alternates().is_none());
            assert_eq!(seo.fallback_tags(), "");
        });
    }

    #[test]
    fn test_og_url() {
        check(HOME, &state(Script::Latin, "sr_RS"), |seo| {
            assert_eq!(seo.og_url("https://example.rs/o-nama/"), "https://example.rs/lat/o-nama/");
        });
    }

    #[test]
    fn test_transliterate_meta() {
        check(HOME, &state(Script::Latin, "sr_RS"), |seo| {
            assert_eq!(seo.transliterate_meta("Петар Петровић"), "Petar Petrović");
        });
        // Latin-source Serbian site: no direction, Cyrillic names still become Latin
        let latin_source = ScriptState::new(Script::Latin, Script::Latin, Locale::new("sr_RS"));
        check(HOME, &latin_source, |seo| {
            assert_eq!(seo.transliterate_meta("Петар"), "Petar");
        });
        // Other locales are left alone
        check(HOME, &state(Script::Latin, "en_US"), |seo| {
            assert_eq!(seo.transliterate_meta("Петар"), "Петар");
        });
        check(HOME, &state(Script::Cyrillic, "sr_RS"), |seo| {
            assert_eq!(seo.transliterate_meta("Петар"), "Петар");
        });
    }

    #[test]
    fn test_transliterate_graph() {
        check(HOME, &state(Script::Latin, "sr_RS"), |seo| {
            let graph = Fragment::Map(vec![
                ("@type".into(), Fragment::from("Article")),
                ("headline".into(), Fragment::from("Вест")),
            ]);
            let out = seo.transliterate_graph(graph);
            assert_eq!(
                out,
                Fragment::Map(vec![
                    ("@type".into(), Fragment::from("Article")),
                    ("headline".into(), Fragment::from("Vest")),
                ])
            );
        });
    }

    #[test]
    fn test_head_buffer_guard() {
        check(HOME, &state(Script::Latin, "sr_RS"), |seo| {
            assert!(seo.head_buffer_start());
            assert!(!seo.head_buffer_start());
            let head = seo.head_buffer_end(r#"<meta property="og:title" content="Вест" />"#.into());
            assert_eq!(head, r#"<meta property="og:title" content="Vest" />"#);
            assert_eq!(seo.head_buffer_end("Вест".into()), "Вест");
        });
        check(HOME, &state(Script::Cyrillic, "sr_RS"), |seo| {
            assert!(!seo.head_buffer_start());
        });
    }

    #[test]
    fn test_switcher() {
        check(HOME, &state(Script::Latin, "sr_RS"), |seo| {
            let html = seo.switcher_html(&SwitcherOptions::default());
            assert!(html.starts_with(r#"<a href="https://example.rs/vesti/">Ћирилица</a>"#));
        });
    }
}
