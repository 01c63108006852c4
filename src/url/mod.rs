//! Script-variant URLs.
//!
//! Every page exists at two addresses: the slug-free path serves the source
//! script and `/<slug>/...` serves the other one.
//!
//! ```text
//! source = cir
//! script_url(lat, "https://x.rs/vesti/?p=2")      -> "https://x.rs/lat/vesti/?p=2"
//! script_url(cir, "https://x.rs/lat/vesti/?p=2")  -> "https://x.rs/vesti/?p=2"
//! script_url(lat, "/")                            -> "/lat/"
//! ```
//!
//! URLs are split by hand so that scheme, authority, query and fragment are
//! copied exactly as given.

use crate::html::{self, Segment};
use crate::script::Script;
use std::borrow::Cow;

/// A URL split into origin (`scheme://authority`), path and tail (`?query#fragment`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UrlParts<'a> {
    origin: &'a str,
    path: &'a str,
    tail: &'a str,
}

impl<'a> UrlParts<'a> {
    fn split(url: &'a str) -> Self {
        let path_start = match url.find("//") {
            Some(i) if url[..i].bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.' | b':'))
                && (i == 0 || url[..i].ends_with(':')) =>
            {
                let after = i + 2;
                url[after..]
                    .find(['/', '?', '#'])
                    .map_or(url.len(), |j| after + j)
            }
            _ => 0,
        };
        let (origin, rest) = url.split_at(path_start);
        let tail_start = rest.find(['?', '#']).unwrap_or(rest.len());
        let (path, tail) = rest.split_at(tail_start);
        Self { origin, path, tail }
    }

    /// Absolute (`https://host/...`, `//host/...`) or root-relative (`/...`).
    fn is_addressable(&self) -> bool {
        !self.origin.is_empty() || self.path.starts_with('/')
    }
}

/// Whether `path` is `/<slug>` or starts with `/<slug>/`.
fn has_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Path without leading script slugs. `/lat` becomes `/`, stacked slugs
/// (`/lat/cir/x`) are all removed.
fn strip_slug(mut path: &str) -> &str {
    while let Some(rest) = strip_one_slug(path) {
        path = rest;
    }
    path
}

fn strip_one_slug(path: &str) -> Option<&str> {
    for script in Script::ALL {
        if let Some(rest) = path
            .strip_prefix('/')
            .and_then(|p| p.strip_prefix(script.slug()))
        {
            if rest.is_empty() {
                return Some("/");
            }
            if rest.starts_with('/') {
                return Some(rest);
            }
        }
    }
    None
}

/// Maps URLs between the source-script and target-script address spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptUrl {
    source: Script,
}

impl ScriptUrl {
    pub const fn new(source: Script) -> Self {
        Self { source }
    }

    #[inline]
    pub const fn source(&self) -> Script {
        self.source
    }

    /// Address of `url` when served in `target`.
    ///
    /// Relative URLs (`about`, `#top`, `mailto:`) are returned unchanged.
    /// Idempotent: mapping an already mapped URL gives the same URL.
    pub fn script_url(&self, target: Script, url: &str) -> String {
        let parts = UrlParts::split(url);
        if !parts.is_addressable() {
            return url.to_string();
        }

        let stripped = strip_slug(parts.path);
        let mut out = String::with_capacity(url.len() + 5);
        out.push_str(parts.origin);

        if target == self.source {
            out.push_str(stripped);
        } else {
            out.push('/');
            out.push_str(target.slug());
            if stripped.is_empty() || stripped == "/" {
                out.push('/');
            } else {
                out.push_str(stripped);
            }
        }

        out.push_str(parts.tail);
        out
    }

    /// Source-script (slug-free) address of `url`.
    #[inline]
    pub fn base_url(&self, url: &str) -> String {
        self.script_url(self.source, url)
    }

    /// Slug-free URL of the current request.
    pub fn current_url(&self, home: &str, routed_path: &str) -> String {
        format!(
            "{}/{}",
            home.trim_end_matches('/'),
            routed_path.trim_start_matches('/')
        )
    }
}

/// Rewrites internal links to the script being served.
///
/// Inactive when the served script is the source script. Only URLs on the
/// home host (or root-relative ones) are touched, bypass paths and URLs that
/// already carry a slug are left alone.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    mapper: ScriptUrl,
    served: Script,
    home_host: Option<String>,
    bypass: Vec<String>,
}

impl LinkRewriter {
    pub fn new(mapper: ScriptUrl, served: Script, home: &str, bypass: &[String]) -> Self {
        let home_host = url::Url::parse(home)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase));
        Self {
            mapper,
            served,
            home_host,
            bypass: bypass.to_vec(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.served != self.mapper.source()
    }

    fn is_internal(&self, url: &str, parts: &UrlParts<'_>) -> bool {
        if parts.origin.is_empty() {
            return parts.path.starts_with('/');
        }
        let absolute = if url.starts_with("//") {
            Cow::Owned(format!("http:{url}"))
        } else {
            Cow::Borrowed(url)
        };
        let host = url::Url::parse(&absolute)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase));
        host.is_some() && host == self.home_host
    }

    /// Served-script address of `url`, or the URL itself when it is not an
    /// internal frontend link.
    pub fn rewrite<'a>(&self, url: &'a str) -> Cow<'a, str> {
        if !self.is_active() {
            return Cow::Borrowed(url);
        }

        let parts = UrlParts::split(url);
        let path = if parts.path.is_empty() { "/" } else { parts.path };
        let skip = !self.is_internal(url, &parts)
            || self.bypass.iter().any(|prefix| path.starts_with(prefix.as_str()))
            || Script::ALL
                .iter()
                .any(|s| has_prefix(path, &format!("/{}", s.slug())));

        if skip {
            Cow::Borrowed(url)
        } else {
            Cow::Owned(self.mapper.script_url(self.served, url))
        }
    }

    /// Rewrite `href` on `<a>` and `action` on `<form>` throughout a page.
    pub fn rewrite_html<'a>(&self, markup: &'a str) -> Cow<'a, str> {
        if !self.is_active() {
            return Cow::Borrowed(markup);
        }

        html::map_segments(markup, |segment| {
            let Segment::Tag(tag) = segment else {
                return None;
            };
            let name = html::tag_name(tag);
            let target_attr = if name.eq_ignore_ascii_case("a") {
                "href"
            } else if name.eq_ignore_ascii_case("form") {
                "action"
            } else {
                return None;
            };

            let rewritten = html::rewrite_attributes(tag, |attr, value| {
                if !attr.eq_ignore_ascii_case(target_attr) {
                    return None;
                }
                match self.rewrite(value) {
                    Cow::Owned(url) => Some(url),
                    Cow::Borrowed(_) => None,
                }
            });
            match rewritten {
                Cow::Owned(tag) => Some(tag),
                Cow::Borrowed(_) => None,
            }
        })
    }
}
