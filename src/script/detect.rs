//! Detect which script a piece of text is written in.

use serde::Serialize;

/// Scripts present in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptMix {
    /// No letters of either script (digits, punctuation, other scripts).
    None,
    Cyrillic,
    Latin,
    /// Letters of both scripts.
    Mixed,
}

#[inline]
fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

#[inline]
fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
        || (('\u{00C0}'..='\u{024F}').contains(&c) && c != '\u{00D7}' && c != '\u{00F7}')
        || ('\u{1E00}'..='\u{1EFF}').contains(&c)
}

/// Whether `text` contains any Cyrillic character (U+0400–U+04FF).
pub fn contains_cyrillic(text: &str) -> bool {
    text.chars().any(is_cyrillic)
}

/// Classify the scripts used in `text`.
pub fn detect_script(text: &str) -> ScriptMix {
    let mut latin = false;
    let mut cyrillic = false;
    for c in text.chars() {
        latin |= is_latin(c);
        cyrillic |= is_cyrillic(c);
        if latin && cyrillic {
            return ScriptMix::Mixed;
        }
    }
    match (latin, cyrillic) {
        (true, false) => ScriptMix::Latin,
        (false, true) => ScriptMix::Cyrillic,
        _ => ScriptMix::None,
    }
}
