//! Per-request script resolution.
//!
//! Signals are consulted in order, the first valid one wins:
//!
//! | Step | Signal                  | Notes                                   |
//! |------|-------------------------|-----------------------------------------|
//! | 1    | path prefix `/lat/...`  | slug stripped from the routed path      |
//! | 2    | query `?pismo=lat`      | both priority modes                     |
//! | 3    | priority mode           | `url`: source script, `cookie`: cookie  |
//! | 4    | configured default      |                                         |
//!
//! Admin and REST requests always get the source script and never touch the
//! preference cookie.

mod cookie;
mod prefix;

pub use cookie::{CookieSink, ResponseCookies, ScriptCookie, cookie_value};
pub use prefix::{decoded_path, query_param, script_prefix, split_uri};

use crate::config::{PismoConfig, ScriptPriority};
use crate::debug;
use crate::script::{Direction, Locale, Script};
use serde::Serialize;

/// What kind of request is being served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RequestKind {
    Frontend,
    Admin,
    Rest,
    Ajax { action: String },
}

impl RequestKind {
    #[inline]
    pub fn is_bypass(&self) -> bool {
        matches!(self, Self::Admin | Self::Rest)
    }
}

/// Raw signals of one request.
#[derive(Debug, Clone)]
pub struct RequestSignals {
    /// Request target as received (`/lat/vesti/?pismo=cir`).
    pub uri: String,
    /// Value of the preference cookie, if the request carried one.
    pub cookie: Option<String>,
    pub kind: RequestKind,
}

impl RequestSignals {
    pub fn frontend(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            cookie: None,
            kind: RequestKind::Frontend,
        }
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn with_kind(mut self, kind: RequestKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Resolved script of a request. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptState {
    source: Script,
    target: Script,
    is_prefixed: bool,
    locale: Locale,
    routed_path: String,
    direction: Direction,
}

impl ScriptState {
    pub fn new(source: Script, target: Script, locale: Locale) -> Self {
        let direction = if locale.is_dual_script() {
            Direction::between(source, target)
        } else {
            Direction::None
        };
        Self {
            source,
            target,
            is_prefixed: false,
            locale,
            routed_path: String::new(),
            direction,
        }
    }

    /// Set the routed path and whether it came from a slug prefix.
    pub fn with_route(mut self, routed_path: impl Into<String>, is_prefixed: bool) -> Self {
        self.routed_path = routed_path.into();
        self.is_prefixed = is_prefixed;
        self
    }

    /// Script content is stored in.
    #[inline]
    pub fn source(&self) -> Script {
        self.source
    }

    /// Script being served.
    #[inline]
    pub fn target(&self) -> Script {
        self.target
    }

    #[inline]
    pub fn is_prefixed(&self) -> bool {
        self.is_prefixed
    }

    #[inline]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Request path with the script slug removed, no leading slash.
    #[inline]
    pub fn routed_path(&self) -> &str {
        &self.routed_path
    }

    /// `None` when the scripts match or the locale has a single script.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Serving the source script.
    #[inline]
    pub fn is_source(&self) -> bool {
        self.target == self.source
    }
}

/// Where the resolved script came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Prefix,
    Query,
    /// URL-first mode re-asserting the source script.
    Source,
    Cookie,
    Default,
}

impl Origin {
    /// Script choices that are remembered in the cookie.
    fn persists(self) -> bool {
        !matches!(self, Self::Cookie)
    }
}

/// Resolves the script of each request from one config snapshot.
pub struct Resolver<'a> {
    config: &'a PismoConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a PismoConfig) -> Self {
        Self { config }
    }

    /// Classify a request from its URI.
    ///
    /// `admin-ajax.php` is AJAX (action from the `action` query parameter),
    /// `/wp-json` is REST, other bypass prefixes are admin.
    pub fn classify(&self, uri: &str) -> RequestKind {
        let (path, query) = split_uri(uri);
        if path.ends_with("/admin-ajax.php") {
            let action = query_param(query, "action").unwrap_or_default();
            return RequestKind::Ajax { action };
        }
        if path == "/wp-json" || path.contains("/wp-json/") {
            return RequestKind::Rest;
        }
        let bypassed = self.config.script.bypass_paths.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '.', '?']))
        });
        if bypassed {
            RequestKind::Admin
        } else {
            RequestKind::Frontend
        }
    }

    /// Resolve the script of a request, asking `sink` to store a changed
    /// preference.
    pub fn resolve(&self, signals: &RequestSignals, sink: &mut dyn CookieSink) -> ScriptState {
        let script = &self.config.script;
        let locale = self.config.site.locale.clone();
        let (raw_path, query) = split_uri(&signals.uri);
        let path = decoded_path(raw_path);

        if signals.kind.is_bypass() {
            return ScriptState::new(script.source, script.source, locale).with_route(path, false);
        }

        let cookie = signals.cookie.as_deref().and_then(Script::parse);
        let prefix = script_prefix(&path).map(|(s, rest)| (s, rest.to_string()));
        let is_ajax = matches!(signals.kind, RequestKind::Ajax { .. });

        let (target, origin) = if let Some((s, _)) = &prefix {
            (*s, Origin::Prefix)
        } else if let Some(s) = query_param(query, &script.url_param)
            .as_deref()
            .and_then(Script::parse)
        {
            (s, Origin::Query)
        } else if let Some(s) = cookie.filter(|_| is_ajax || script.priority == ScriptPriority::Cookie)
        {
            (s, Origin::Cookie)
        } else if script.priority == ScriptPriority::Url && !is_ajax {
            (script.source, Origin::Source)
        } else {
            (script.default, Origin::Default)
        };

        debug!("resolve"; "{} -> {} ({:?})", signals.uri, target, origin);

        if origin.persists() && cookie != Some(target) && !is_ajax {
            self.write_cookie(target, sink);
        }

        let (routed, is_prefixed) = match prefix {
            Some((_, rest)) => (rest, true),
            None => (path, false),
        };
        ScriptState::new(script.source, target, locale).with_route(routed, is_prefixed)
    }

    /// Preference cookie for `script`.
    pub fn cookie(&self, script: Script) -> ScriptCookie {
        ScriptCookie {
            name: self.config.script.cookie.clone(),
            value: script,
            domain: self.config.site.host(),
            path: "/",
            secure: self.config.site.is_secure(),
        }
    }

    fn write_cookie(&self, script: Script, sink: &mut dyn CookieSink) {
        if sink.headers_sent() {
            debug!("resolve"; "cookie write skipped: headers already sent");
            return;
        }
        sink.set_cookie(self.cookie(script));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn config(extra: &str) -> PismoConfig {
        test_parse_config(&format!("[site]\nurl = \"https://primer.rs\"\n{extra}"))
    }

    fn resolve(config: &PismoConfig, signals: RequestSignals) -> (ScriptState, ResponseCookies) {
        let mut sink = ResponseCookies::new();
        let state = Resolver::new(config).resolve(&signals, &mut sink);
        (state, sink)
    }

    #[test]
    fn test_prefix_selects_latin() {
        let config = config("");
        let (state, sink) = resolve(&config, RequestSignals::frontend("/lat/about-us"));
        assert_eq!(state.target(), Script::Latin);
        assert!(state.is_prefixed());
        assert_eq!(state.routed_path(), "about-us");
        assert_eq!(state.direction(), Direction::CirToLat);
        assert_eq!(sink.cookies()[0].value, Script::Latin);
    }

    #[test]
    fn test_cookie_for_non_ascii_home() {
        let config = test_parse_config("[site]\nurl = \"http://ђура.срб\"");
        let (state, sink) = resolve(&config, RequestSignals::frontend("/lat/"));
        assert_eq!(state.target(), Script::Latin);
        let cookie = &sink.cookies()[0];
        assert!(!cookie.secure);
        assert!(cookie.domain.as_deref().is_some_and(|d| d.starts_with("xn--")));
    }

    #[test]
    fn test_prefix_beats_cookie_and_query() {
        let config = config("[script]\npriority = \"cookie\"");
        let signals = RequestSignals::frontend("/lat/?pismo=cir").with_cookie("cir");
        let (state, _) = resolve(&config, signals);
        assert_eq!(state.target(), Script::Latin);
        assert_eq!(state.routed_path(), "");
    }

    #[test]
    fn test_source_prefix_selects_source() {
        let config = config("");
        let (state, _) = resolve(&config, RequestSignals::frontend("/cir/vesti"));
        assert_eq!(state.target(), Script::Cyrillic);
        assert!(state.is_prefixed());
        assert_eq!(state.routed_path(), "vesti");
        assert_eq!(state.direction(), Direction::None);
    }

    #[test]
    fn test_url_first_ignores_stale_cookie() {
        let config = config("");
        let signals = RequestSignals::frontend("/about").with_cookie("lat");
        let (state, sink) = resolve(&config, signals);
        assert_eq!(state.target(), Script::Cyrillic);
        assert!(!state.is_prefixed());
        assert_eq!(state.routed_path(), "about");
        assert_eq!(sink.cookies()[0].value, Script::Cyrillic);
    }

    #[test]
    fn test_query_param() {
        let config = config("");
        let (state, sink) = resolve(&config, RequestSignals::frontend("/about?pismo=LAT"));
        assert_eq!(state.target(), Script::Latin);
        assert!(!state.is_prefixed());
        assert_eq!(sink.cookies().len(), 1);
    }

    #[test]
    fn test_cookie_priority_uses_cookie() {
        let config = config("[script]\npriority = \"cookie\"");
        let signals = RequestSignals::frontend("/about").with_cookie("lat");
        let (state, sink) = resolve(&config, signals);
        assert_eq!(state.target(), Script::Latin);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_invalid_signals_fall_through_to_default() {
        let config = config("[script]\npriority = \"cookie\"\ndefault = \"lat\"");
        let signals = RequestSignals::frontend("/about?pismo=greek").with_cookie("xyz");
        let (state, sink) = resolve(&config, signals);
        assert_eq!(state.target(), Script::Latin);
        assert_eq!(sink.cookies()[0].value, Script::Latin);
    }

    #[test]
    fn test_no_cookie_write_when_unchanged() {
        let config = config("");
        let signals = RequestSignals::frontend("/lat/").with_cookie("lat");
        let (_, sink) = resolve(&config, signals);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_cookie_write_skipped_after_headers_sent() {
        let config = config("");
        let mut sink = ResponseCookies::new();
        sink.mark_sent();
        let state = Resolver::new(&config).resolve(&RequestSignals::frontend("/lat/"), &mut sink);
        assert_eq!(state.target(), Script::Latin);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_cookie_attributes() {
        let config = config("");
        let (_, sink) = resolve(&config, RequestSignals::frontend("/lat/"));
        let cookie = &sink.cookies()[0];
        assert_eq!(cookie.name, "stl_script");
        assert_eq!(cookie.domain.as_deref(), Some("primer.rs"));
        assert_eq!(cookie.path, "/");
        assert!(cookie.secure);
    }

    #[test]
    fn test_admin_and_rest_use_source_without_cookie() {
        let config = config("");
        for kind in [RequestKind::Admin, RequestKind::Rest] {
            let signals = RequestSignals::frontend("/lat/wp-admin/?pismo=lat")
                .with_cookie("lat")
                .with_kind(kind);
            let (state, sink) = resolve(&config, signals);
            assert_eq!(state.target(), Script::Cyrillic);
            assert!(!state.is_prefixed());
            assert_eq!(state.direction(), Direction::None);
            assert!(sink.is_empty());
        }
    }

    #[test]
    fn test_ajax_follows_cookie() {
        let config = config("");
        let kind = RequestKind::Ajax {
            action: "load_more".into(),
        };
        let signals = RequestSignals::frontend("/wp-admin/admin-ajax.php?action=load_more")
            .with_cookie("lat")
            .with_kind(kind);
        let (state, sink) = resolve(&config, signals);
        assert_eq!(state.target(), Script::Latin);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_non_dual_script_locale_has_no_direction() {
        let config = test_parse_config("[site]\nlocale = \"en_US\"");
        let (state, _) = resolve(&config, RequestSignals::frontend("/lat/"));
        assert_eq!(state.target(), Script::Latin);
        assert_eq!(state.direction(), Direction::None);
    }

    #[test]
    fn test_latin_source() {
        let config = config("[script]\nsource = \"lat\"\ndefault = \"lat\"");
        let (state, _) = resolve(&config, RequestSignals::frontend("/cir/"));
        assert_eq!(state.direction(), Direction::LatToCir);
    }

    #[test]
    fn test_classify() {
        let config = config("");
        let resolver = Resolver::new(&config);
        assert_eq!(resolver.classify("/lat/vesti/"), RequestKind::Frontend);
        assert_eq!(resolver.classify("/wp-admin/edit.php"), RequestKind::Admin);
        assert_eq!(resolver.classify("/wp-login.php"), RequestKind::Admin);
        assert_eq!(resolver.classify("/wp-json/wp/v2/posts"), RequestKind::Rest);
        assert_eq!(
            resolver.classify("/wp-admin/admin-ajax.php?action=load_more"),
            RequestKind::Ajax {
                action: "load_more".into()
            }
        );
        assert_eq!(resolver.classify("/wp-administrator"), RequestKind::Frontend);
    }
}
