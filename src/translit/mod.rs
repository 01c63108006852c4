//! Cyrillic ⇄ Latin transliteration.
//!
//! Conversion is a single greedy longest-match scan over static tables:
//!
//! ```text
//! "Љубав"  --CirToLat-->  "Ljubav"
//! "LJUBAV" --LatToCir-->  "ЉУБАВ"
//! "Ђорђе"  --CirToLat, cut-->  "Djordje"
//! ```
//!
//! Characters outside the tables pass through unchanged. Text that contains
//! nothing to convert is returned borrowed.

mod slug;
mod table;

pub use slug::slugify;

use crate::script::{Direction, Script};
use std::borrow::Cow;
use table::{CIR_TO_LAT, CUT_LATIN, LAT_TO_CIR};

/// Handle to the process-wide transliteration tables.
///
/// Zero-sized and stateless, so it is freely copied into per-request
/// components and shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transliterator;

impl Transliterator {
    pub const fn new() -> Self {
        Self
    }

    /// Convert `text` in `direction`.
    ///
    /// `cut` drops diacritics from the Latin output and only applies to
    /// [`Direction::CirToLat`].
    pub fn convert<'a>(&self, text: &'a str, direction: Direction, cut: bool) -> Cow<'a, str> {
        match direction {
            Direction::None => Cow::Borrowed(text),
            Direction::CirToLat if cut => match CIR_TO_LAT.apply(text) {
                Cow::Borrowed(text) => cut_latin(text),
                Cow::Owned(latin) => Cow::Owned(cut_latin(&latin).into_owned()),
            },
            Direction::CirToLat => CIR_TO_LAT.apply(text),
            Direction::LatToCir => LAT_TO_CIR.apply(text),
        }
    }

    /// Convert `text` so that it reads in `target`, whatever it is written in.
    pub fn to_script<'a>(&self, text: &'a str, target: Script) -> Cow<'a, str> {
        match target {
            Script::Latin => self.to_latin(text),
            Script::Cyrillic => self.to_cyrillic(text),
        }
    }

    #[inline]
    pub fn to_latin<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.convert(text, Direction::CirToLat, false)
    }

    #[inline]
    pub fn to_cut_latin<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.convert(text, Direction::CirToLat, true)
    }

    #[inline]
    pub fn to_cyrillic<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.convert(text, Direction::LatToCir, false)
    }
}

/// Convert with the shared tables. See [`Transliterator::convert`].
#[inline]
pub fn convert(text: &str, direction: Direction, cut: bool) -> Cow<'_, str> {
    Transliterator.convert(text, direction, cut)
}

/// Reduce Latin text to ASCII letters.
fn cut_latin(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(CUT_LATIN.scan(text, strip_diacritic))
}

fn strip_diacritic(c: char, out: &mut String) {
    match c {
        // Combining diacritical marks
        '\u{0300}'..='\u{036F}' => {}
        // × and ÷ are symbols, not letters
        '\u{00D7}' | '\u{00F7}' => out.push(c),
        '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}' => match deunicode::deunicode_char(c) {
            Some(ascii) => out.push_str(ascii),
            None => out.push(c),
        },
        _ => out.push(c),
    }
}
