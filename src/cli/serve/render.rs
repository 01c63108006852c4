//! Runs served files through the dual-script pipeline.
//!
//! | File                         | Treatment                                   |
//! |------------------------------|---------------------------------------------|
//! | `*.html`                     | page surface, lang, head tags, link rewrite |
//! | `*.rss`, `*.atom`, `feed*.xml` | feed surface                              |
//! | `sitemap*.xml`               | `<loc>` rewrite or index link               |
//! | `*.json`                     | AJAX surface                                |
//! | anything else                | sent as is                                  |

use pismo::html::{self, Segment};
use pismo::seo::{index_entry_xml, rewrite_sitemap, sitemap_index_entry, sitemap_target};
use pismo::{
    LinkRewriter, OutputPipeline, PismoConfig, RenderInterceptor, RequestKind, ScriptState,
    ScriptUrl, SeoAdapter, Surface, Transliterator,
};
use std::borrow::Cow;
use std::path::Path;

/// How a served file is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Page,
    Feed,
    Sitemap { index: bool },
    Json,
    Other,
}

impl BodyKind {
    pub fn of(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let ext = name.rsplit_once('.').map_or("", |(_, ext)| ext);

        match ext {
            "html" | "htm" => Self::Page,
            "rss" | "atom" => Self::Feed,
            "json" => Self::Json,
            "xml" if name.starts_with("sitemap") => Self::Sitemap {
                index: name.starts_with("sitemap_index"),
            },
            "xml" if name.starts_with("feed") || name.starts_with("rss") || name.starts_with("atom") => {
                Self::Feed
            }
            _ => Self::Other,
        }
    }

    #[inline]
    pub fn is_text(self) -> bool {
        self != Self::Other
    }
}

/// Everything the renderer needs to know about one request.
pub struct RenderContext<'a> {
    pub config: &'a PismoConfig,
    pub state: &'a ScriptState,
    pub kind: &'a RequestKind,
    /// Raw query string of the request.
    pub query: &'a str,
    /// Modification time of the served file (RFC 3339).
    pub lastmod: Option<String>,
}

impl RenderContext<'_> {
    fn urls(&self) -> ScriptUrl {
        ScriptUrl::new(self.config.script.source)
    }

    fn pipeline(&self) -> OutputPipeline {
        OutputPipeline::new(self.state, Transliterator::new(), self.config, self.kind)
    }
}

/// Process the text body of a served file.
pub fn render(ctx: &RenderContext<'_>, kind: BodyKind, body: String) -> String {
    if ctx.kind.is_bypass() {
        return body;
    }
    match kind {
        BodyKind::Page => render_page(ctx, body),
        BodyKind::Feed => intercept(&mut ctx.pipeline(), Surface::Feed, body),
        BodyKind::Json => intercept(&mut ctx.pipeline(), Surface::Ajax, body),
        BodyKind::Sitemap { index } => render_sitemap(ctx, index, body),
        BodyKind::Other => body,
    }
}

fn intercept(pipeline: &mut impl RenderInterceptor, surface: Surface, body: String) -> String {
    if pipeline.before_render(surface) {
        pipeline.after_render(surface, body)
    } else {
        body
    }
}

fn render_page(ctx: &RenderContext<'_>, body: String) -> String {
    let translit = Transliterator::new();
    let urls = ctx.urls();
    let body = intercept(&mut ctx.pipeline(), Surface::Page, body);

    let current = urls.current_url(ctx.config.site.home(), ctx.state.routed_path());
    let seo = SeoAdapter::new(ctx.state, &urls, translit, ctx.config, current);
    let body = set_html_lang(&body, &seo);
    let body = inject_head(&body, &seo.fallback_tags());

    let rewriter = LinkRewriter::new(
        urls,
        ctx.state.target(),
        ctx.config.site.home(),
        &ctx.config.script.bypass_paths,
    );
    rewriter.rewrite_html(&body).into_owned()
}

fn render_sitemap(ctx: &RenderContext<'_>, index: bool, body: String) -> String {
    if let Some(target) = sitemap_target(ctx.query, &ctx.config.seo.sitemap_param) {
        return rewrite_sitemap(&body, target, &ctx.urls()).into_owned();
    }
    if !index {
        return body;
    }

    let lastmod = ctx.lastmod.as_deref().unwrap_or_default();
    let Some(link) = sitemap_index_entry(ctx.config, lastmod) else {
        return body;
    };
    match find_ci(&body, "</sitemapindex>") {
        Some(pos) => format!("{}{}\n{}", &body[..pos], index_entry_xml(&link), &body[pos..]),
        None => body,
    }
}

/// Rewrite the attributes of the `<html>` start tag with the script-tagged `lang`.
fn set_html_lang<'a>(page: &'a str, seo: &SeoAdapter<'_>) -> Cow<'a, str> {
    let mut done = false;
    html::map_segments(page, |segment| {
        let Segment::Tag(tag) = segment else {
            return None;
        };
        if done || tag.starts_with("</") || !html::tag_name(tag).eq_ignore_ascii_case("html") {
            return None;
        }
        done = true;

        let name_end = 1 + html::tag_name(tag).len();
        let close = tag.strip_suffix('>').map_or(tag.len(), str::len);
        let attrs = seo.language_attributes(tag[name_end..close].trim());
        let separator = if attrs.is_empty() { "" } else { " " };
        Some(format!("{}{separator}{attrs}{}", &tag[..name_end], &tag[close..]))
    })
}

/// Insert `tags` before `</head>`.
fn inject_head(page: &str, tags: &str) -> String {
    match find_ci(page, "</head>") {
        Some(pos) if !tags.is_empty() => format!("{}{tags}{}", &page[..pos], &page[pos..]),
        _ => page.to_string(),
    }
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}
