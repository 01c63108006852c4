//! Static mapping tables and the longest-match scanner.
//!
//! Tables store lowercase keys only. Keys are one character or a two
//! character digraph (`lj`, `nj`, `dž`); digraphs are tried first.

use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Serbian alphabet, Cyrillic to Latin. This part is a bijection.
#[rustfmt::skip]
const SERBIAN: &[(&str, &str)] = &[
    ("а", "a"), ("б", "b"), ("в", "v"), ("г", "g"), ("д", "d"),
    ("ђ", "đ"), ("е", "e"), ("ж", "ž"), ("з", "z"), ("и", "i"),
    ("ј", "j"), ("к", "k"), ("л", "l"), ("љ", "lj"), ("м", "m"),
    ("н", "n"), ("њ", "nj"), ("о", "o"), ("п", "p"), ("р", "r"),
    ("с", "s"), ("т", "t"), ("ћ", "ć"), ("у", "u"), ("ф", "f"),
    ("х", "h"), ("ц", "c"), ("ч", "č"), ("џ", "dž"), ("ш", "š"),
];

/// Macedonian letters, mapped to Latin only.
const MACEDONIAN: &[(&str, &str)] = &[("ѓ", "ǵ"), ("ќ", "ḱ"), ("ѕ", "dz")];

/// Latin letters reduced to ASCII by the cut variant.
const CUT: &[(&str, &str)] = &[("č", "c"), ("ć", "c"), ("đ", "dj"), ("š", "s"), ("ž", "z")];

pub(super) static CIR_TO_LAT: LazyLock<Table> =
    LazyLock::new(|| Table::build(SERBIAN.iter().chain(MACEDONIAN).copied()));

pub(super) static LAT_TO_CIR: LazyLock<Table> =
    LazyLock::new(|| Table::build(SERBIAN.iter().map(|&(cir, lat)| (lat, cir))));

pub(super) static CUT_LATIN: LazyLock<Table> = LazyLock::new(|| Table::build(CUT.iter().copied()));

/// Lowercase form of a single character, or the character itself when the
/// lowercase form is not a single character.
#[inline]
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

pub(super) struct Table {
    single: FxHashMap<char, &'static str>,
    digraphs: FxHashMap<(char, char), &'static str>,
}

impl Table {
    fn build(entries: impl Iterator<Item = (&'static str, &'static str)>) -> Self {
        let mut single = FxHashMap::default();
        let mut digraphs = FxHashMap::default();
        for (from, to) in entries {
            let mut chars = from.chars();
            match (chars.next(), chars.next()) {
                (Some(a), None) => {
                    single.insert(a, to);
                }
                (Some(a), Some(b)) => {
                    digraphs.insert((a, b), to);
                }
                _ => {}
            }
        }
        Self { single, digraphs }
    }

    /// Whether `c` starts any mapping.
    #[inline]
    pub(super) fn matches(&self, c: char) -> bool {
        let c = fold(c);
        self.single.contains_key(&c) || self.digraphs.keys().any(|&(a, _)| a == c)
    }

    /// Convert `text`, borrowing it when nothing maps.
    pub(super) fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.chars().any(|c| self.matches(c)) {
            Cow::Owned(self.scan(text, |c, out| out.push(c)))
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Single left-to-right pass. Characters without a mapping go to `unmapped`.
    pub(super) fn scan(&self, text: &str, mut unmapped: impl FnMut(char, &mut String)) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len() + text.len() / 4);
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let upper = c.is_uppercase();

            if let Some(&next) = chars.get(i + 1)
                && digraph_case_matches(c, next)
                && let Some(target) = self.digraphs.get(&(fold(c), fold(next)))
            {
                push_cased(&mut out, target, upper, &chars, i, 2);
                i += 2;
                continue;
            }

            match self.single.get(&fold(c)) {
                Some(target) => push_cased(&mut out, target, upper, &chars, i, 1),
                None => unmapped(c, &mut out),
            }
            i += 1;
        }
        out
    }
}

/// `lj`, `Lj` and `LJ` form a digraph; `lJ` does not.
#[inline]
fn digraph_case_matches(first: char, second: char) -> bool {
    first.is_uppercase() || !second.is_uppercase()
}

/// Case of the letter right after the match, otherwise right before it.
fn neighbour_is_upper(chars: &[char], start: usize, len: usize) -> bool {
    let next = chars.get(start + len).filter(|c| c.is_alphabetic());
    let prev = start
        .checked_sub(1)
        .and_then(|p| chars.get(p))
        .filter(|c| c.is_alphabetic());
    next.or(prev).is_some_and(|c| c.is_uppercase())
}

fn push_cased(out: &mut String, target: &str, upper: bool, chars: &[char], start: usize, len: usize) {
    if !upper {
        out.push_str(target);
        return;
    }

    let mut target_chars = target.chars();
    if target.chars().nth(1).is_none() || neighbour_is_upper(chars, start, len) {
        out.extend(target_chars.flat_map(char::to_uppercase));
    } else if let Some(first) = target_chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(target_chars.as_str());
    }
}
