//! Cross-script search.
//!
//! A visitor may type a query in either script. The helpers here let a host
//! match content stored in the other one and send the visitor to the
//! variant of the results page that matches what they typed.
//!
//! Enabled by `advanced.fix_search` on Serbian sites only.

use crate::config::PismoConfig;
use crate::debug;
use crate::resolve::ScriptState;
use crate::script::{Script, ScriptMix, detect_script};
use crate::translit::Transliterator;
use crate::url::ScriptUrl;
use url::form_urlencoded;

/// Queries with more terms than this are matched as one sentence.
const MAX_TERMS: usize = 9;

const STOPWORDS: [&str; 29] = [
    "about", "an", "are", "as", "at", "be", "by", "com", "for", "from", "how", "in", "is", "it",
    "of", "on", "or", "that", "the", "this", "to", "was", "what", "when", "where", "who", "will",
    "with", "www",
];

/// Original, Latin and Cyrillic forms of `term`: unique, non-empty, in that order.
pub fn search_variants(translit: Transliterator, term: &str) -> Vec<String> {
    let candidates = [
        term.to_string(),
        translit.to_latin(term).into_owned(),
        translit.to_cyrillic(term).into_owned(),
    ];
    let mut variants: Vec<String> = Vec::with_capacity(3);
    for candidate in candidates {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

/// One search term with its script variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub variants: Vec<String>,
    /// Prefixed with `-`: results must not contain the term.
    pub exclude: bool,
}

/// Split a query into terms: whitespace, `,` and `+` separate terms,
/// double quotes group a phrase.
fn split_terms(query: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut rest = query;
    loop {
        rest = rest.trim_start_matches(['\t', ' ', ',', '+']);
        if rest.is_empty() {
            break;
        }
        let end = if let Some(quoted) = rest.strip_prefix('"') {
            quoted.find('"').map_or(rest.len(), |i| i + 2)
        } else {
            rest.find(['\t', ' ', '"', ',', '+']).unwrap_or(rest.len())
        };
        let (term, tail) = rest.split_at(end);
        terms.push(term);
        rest = tail;
    }
    terms
}

fn is_searchable(term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    if term.len() == 1 && term.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-') {
        return false;
    }
    let lower = term.to_lowercase();
    !STOPWORDS.contains(&lower.as_str())
}

/// Search helper bound to one request.
pub struct SearchAssist<'a> {
    config: &'a PismoConfig,
    state: &'a ScriptState,
    urls: &'a ScriptUrl,
    translit: Transliterator,
}

impl<'a> SearchAssist<'a> {
    pub fn new(
        config: &'a PismoConfig,
        state: &'a ScriptState,
        urls: &'a ScriptUrl,
        translit: Transliterator,
    ) -> Self {
        Self {
            config,
            state,
            urls,
            translit,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.advanced.fix_search && self.state.locale().is_serbian()
    }

    /// Terms of `query`, each with its script variants.
    ///
    /// Empty when disabled or when the query has nothing to transliterate.
    /// Short, stopword-only or very long queries become a single term.
    pub fn terms(&self, query: &str) -> Vec<SearchTerm> {
        let query = query.replace(['\r', '\n'], "");
        if !self.is_enabled() || query.trim().is_empty() || detect_script(&query) == ScriptMix::None {
            return Vec::new();
        }

        let mut terms: Vec<&str> = split_terms(&query)
            .into_iter()
            .map(|term| {
                if term.len() > 1 && term.starts_with('"') && term.ends_with('"') {
                    term.trim_matches(['"', '\''])
                } else {
                    term.trim_matches(['"', '\'', ' '])
                }
            })
            .filter(|term| is_searchable(term))
            .collect();
        if terms.is_empty() || terms.len() > MAX_TERMS {
            terms = vec![query.as_str()];
        }

        terms
            .into_iter()
            .map(|term| {
                let (term, exclude) = match term.strip_prefix('-') {
                    Some(rest) => (rest, true),
                    None => (term, false),
                };
                SearchTerm {
                    variants: search_variants(self.translit, term),
                    exclude,
                }
            })
            .collect()
    }

    /// Results page in the script the query was typed in.
    ///
    /// `None` when disabled, when the query is mixed or has no letters,
    /// when it already matches the served script, or when the destination
    /// is the current URL. `query_args` are merged into the destination.
    pub fn search_redirect(
        &self,
        query: &str,
        current_url: &str,
        query_args: &[(String, String)],
    ) -> Option<String> {
        let query = query.trim();
        if !self.is_enabled() || query.is_empty() {
            return None;
        }

        let typed = match detect_script(query) {
            ScriptMix::Cyrillic => Script::Cyrillic,
            ScriptMix::Latin => Script::Latin,
            ScriptMix::None | ScriptMix::Mixed => return None,
        };
        if typed == self.state.target() {
            return None;
        }

        let destination = self.urls.script_url(typed, current_url);
        if destination == current_url {
            return None;
        }
        debug!("search"; "query typed in {}, redirecting to {}", typed, destination);
        Some(add_query_args(&destination, query_args))
    }
}

/// Merge `args` into the query string of `url`, replacing existing keys.
fn add_query_args(url: &str, args: &[(String, String)]) -> String {
    if args.is_empty() {
        return url.to_string();
    }
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let (path, query) = base.split_once('?').unwrap_or((base, ""));

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    for (key, value) in args {
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value.clone(),
            None => pairs.push((key.clone(), value.clone())),
        }
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish();
    let mut out = format!("{path}?{query}");
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
