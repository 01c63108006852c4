//! Script preference cookie.

use crate::script::Script;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt::Write;

/// The `Set-Cookie` the resolver asks for.
///
/// Carries no expiry, so browsers keep it for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCookie {
    pub name: String,
    pub value: Script,
    /// Home URL host; `None` gives a host-only cookie.
    pub domain: Option<String>,
    pub path: &'static str,
    pub secure: bool,
}

impl ScriptCookie {
    /// `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path={}",
            self.name,
            utf8_percent_encode(self.value.slug(), NON_ALPHANUMERIC),
            self.path
        );
        if let Some(domain) = &self.domain {
            let _ = write!(header, "; Domain={domain}");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

/// Where the resolver writes the preference cookie.
pub trait CookieSink {
    /// Response headers are already on the wire; cookies can no longer be set.
    fn headers_sent(&self) -> bool;

    fn set_cookie(&mut self, cookie: ScriptCookie);
}

/// Collects cookies for a response that has not been sent yet.
#[derive(Debug, Default)]
pub struct ResponseCookies {
    cookies: Vec<ScriptCookie>,
    sent: bool,
}

impl ResponseCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark headers as sent; later writes are refused.
    pub fn mark_sent(&mut self) {
        self.sent = true;
    }

    pub fn cookies(&self) -> &[ScriptCookie] {
        &self.cookies
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// `Set-Cookie` header values in insertion order.
    pub fn header_values(&self) -> impl Iterator<Item = String> + '_ {
        self.cookies.iter().map(ScriptCookie::to_header_value)
    }
}

impl CookieSink for ResponseCookies {
    fn headers_sent(&self) -> bool {
        self.sent
    }

    fn set_cookie(&mut self, cookie: ScriptCookie) {
        self.cookies.push(cookie);
    }
}

/// Value of cookie `name` in a `Cookie` request header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}
