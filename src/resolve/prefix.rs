//! Request URI parsing: script slug prefix and query parameters.

use crate::script::Script;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Split a request URI into path and query (fragment dropped).
pub fn split_uri(uri: &str) -> (&str, &str) {
    let uri = uri.split('#').next().unwrap_or(uri);
    uri.split_once('?').unwrap_or((uri, ""))
}

/// Percent-decoded path, leading slashes trimmed.
pub fn decoded_path(path: &str) -> String {
    let decoded: Cow<'_, str> = percent_decode_str(path).decode_utf8_lossy();
    decoded.trim_start_matches('/').to_string()
}

/// Script slug at the start of a decoded path (`lat`, `lat/...`), with the
/// remaining path.
pub fn script_prefix(path: &str) -> Option<(Script, &str)> {
    Script::ALL.into_iter().find_map(|script| {
        let rest = path.strip_prefix(script.slug())?;
        if rest.is_empty() {
            Some((script, ""))
        } else {
            rest.strip_prefix('/')
                .map(|rest| (script, rest.trim_start_matches('/')))
        }
    })
}

/// First value of `name` in a query string.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
