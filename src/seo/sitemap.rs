//! Script variants of sitemaps.
//!
//! A sitemap requested with `?lcb_script=<slug>` lists every URL in that
//! script. The source-script sitemap index links to the other variant so
//! crawlers find it without extra setup.
//!
//! ```xml
//! <sitemap>
//!   <loc>https://example.rs/sitemap_index.xml?lcb_script=lat&amp;lcb_lat=1</loc>
//!   <lastmod>2025-01-01T00:00:00+00:00</lastmod>
//! </sitemap>
//! ```

use crate::config::PismoConfig;
use crate::resolve::query_param;
use crate::script::Script;
use crate::url::ScriptUrl;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Older links select the Latin sitemap with `lcb_lat=1`.
pub const LEGACY_LATIN_PARAM: &str = "lcb_lat";

const INDEX_PATH: &str = "/sitemap_index.xml";

static RE_LOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<loc>\s*([^<\s]+)\s*</loc>").unwrap());

/// An entry of the sitemap index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapLink {
    pub loc: String,
    pub lastmod: String,
}

/// Script requested by the sitemap query string.
///
/// `param` wins when present. An empty `param` with a truthy legacy flag
/// selects Latin. Unknown values select nothing.
pub fn sitemap_target(query: &str, param: &str) -> Option<Script> {
    let value = query_param(query, param).filter(|v| !v.is_empty());
    match value {
        Some(value) => Script::parse(&value),
        None => query_param(query, LEGACY_LATIN_PARAM)
            .filter(|v| !v.is_empty() && v != "0")
            .map(|_| Script::Latin),
    }
}

/// Index link to the non-source variant, for Serbian sites only.
pub fn sitemap_index_entry(config: &PismoConfig, lastmod: &str) -> Option<SitemapLink> {
    if !config.site.locale.is_serbian() {
        return None;
    }
    let alt = config.script.source.other();
    let mut loc = format!(
        "{}{INDEX_PATH}?{}={}",
        config.site.home(),
        config.seo.sitemap_param,
        alt.slug()
    );
    if alt == Script::Latin {
        loc.push('&');
        loc.push_str(LEGACY_LATIN_PARAM);
        loc.push_str("=1");
    }
    Some(SitemapLink {
        loc,
        lastmod: lastmod.to_string(),
    })
}

/// Render an index entry as a `<sitemap>` element.
pub fn index_entry_xml(link: &SitemapLink) -> String {
    format!(
        "<sitemap><loc>{}</loc><lastmod>{}</lastmod></sitemap>",
        escape_xml(&link.loc),
        escape_xml(&link.lastmod)
    )
}

/// Point every `<loc>` of a sitemap at its `target` variant.
pub fn rewrite_sitemap<'a>(content: &'a str, target: Script, urls: &ScriptUrl) -> Cow<'a, str> {
    RE_LOC.replace_all(content, |caps: &Captures<'_>| {
        let url = caps[1].replace("&amp;", "&");
        format!("<loc>{}</loc>", escape_xml(&urls.script_url(target, &url)))
    })
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_sitemap_target() {
        assert_eq!(sitemap_target("lcb_script=lat", "lcb_script"), Some(Script::Latin));
        assert_eq!(sitemap_target("lcb_script=cir&lcb_lat=1", "lcb_script"), Some(Script::Cyrillic));
        assert_eq!(sitemap_target("lcb_lat=1", "lcb_script"), Some(Script::Latin));
        assert_eq!(sitemap_target("lcb_lat=0", "lcb_script"), None);
        assert_eq!(sitemap_target("lcb_script=xyz&lcb_lat=1", "lcb_script"), None);
        assert_eq!(sitemap_target("", "lcb_script"), None);
        assert_eq!(sitemap_target("pismo=lat", "pismo"), Some(Script::Latin));
    }

    #[test]
    fn test_index_entry_for_cyrillic_source() {
        let config = test_parse_config("[site]\nurl = \"https://example.rs/\"");
        let link = sitemap_index_entry(&config, "2025-01-01").unwrap();
        assert_eq!(
            link.loc,
            "https://example.rs/sitemap_index.xml?lcb_script=lat&lcb_lat=1"
        );
        assert_eq!(
            index_entry_xml(&link),
            "<sitemap><loc>https://example.rs/sitemap_index.xml?lcb_script=lat&amp;lcb_lat=1</loc>\
             <lastmod>2025-01-01</lastmod></sitemap>"
        );
    }

    #[test]
    fn test_index_entry_for_latin_source() {
        let config = test_parse_config(
            "[site]\nurl = \"https://example.rs\"\n[script]\nsource = \"lat\"",
        );
        let link = sitemap_index_entry(&config, "x").unwrap();
        assert_eq!(link.loc, "https://example.rs/sitemap_index.xml?lcb_script=cir");
    }

    #[test]
    fn test_index_entry_serbian_only() {
        let config = test_parse_config("[site]\nurl = \"https://example.ba\"\nlocale = \"bs_BA\"");
        assert!(sitemap_index_entry(&config, "x").is_none());
    }

    #[test]
    fn test_rewrite_sitemap() {
        let xml = "<urlset>\n<url><loc>https://example.rs/</loc></url>\n\
                   <url><LOC> https://example.rs/vesti/?a=1&amp;b=2 </LOC></url>\n</urlset>";
        let out = rewrite_sitemap(xml, Script::Latin, &ScriptUrl::new(Script::Cyrillic));
        assert_eq!(
            out,
            "<urlset>\n<url><loc>https://example.rs/lat/</loc></url>\n\
             <url><loc>https://example.rs/lat/vesti/?a=1&amp;b=2</loc></url>\n</urlset>"
        );
    }

    #[test]
    fn test_rewrite_sitemap_to_source_is_idempotent() {
        let xml = "<loc>https://example.rs/lat/o-nama/</loc>";
        let urls = ScriptUrl::new(Script::Cyrillic);
        let out = rewrite_sitemap(xml, Script::Cyrillic, &urls);
        assert_eq!(out, "<loc>https://example.rs/o-nama/</loc>");
        assert_eq!(rewrite_sitemap(&out, Script::Cyrillic, &urls), out);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }
}
