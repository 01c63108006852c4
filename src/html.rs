//! HTML utility functions.
//!
//! Provides the markup handling the output pipeline and SEO adapter need:
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `is_raw_text_element()` - Raw text elements (script, style)
//! - `segments()` - split markup into text, tags, CDATA and raw pieces
//! - `map_segments()` - rebuild markup with some segments replaced
//! - `attributes()`, `rewrite_attributes()` - position-aware attribute access
//! - `map_text()` - transform text while keeping entities intact

use std::borrow::Cow;
use std::ops::Range;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape HTML attribute values.
///
/// Identical to `escape()` but semantically indicates attribute context.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Element Classification
// =============================================================================

/// Check if tag is a raw text element (content is not markup).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style")
}

// =============================================================================
// Segment Scanner
// =============================================================================

/// A piece of markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Character data between tags.
    Text(&'a str),
    /// A start or end tag including its angle brackets.
    Tag(&'a str),
    /// Inner content of a `<![CDATA[...]]>` section (delimiters excluded).
    Cdata(&'a str),
    /// Copied verbatim: comments, doctype, processing instructions and the
    /// content of `<script>`/`<style>`.
    Raw(&'a str),
}

/// Split markup into segments. Concatenating the segments (with CDATA
/// delimiters restored) yields the input.
pub fn segments(markup: &str) -> Segments<'_> {
    Segments {
        rest: markup,
        raw_until: None,
    }
}

pub struct Segments<'a> {
    rest: &'a str,
    /// Set after a `<script>`/`<style>` start tag: name of the closing tag.
    raw_until: Option<&'a str>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        if let Some(name) = self.raw_until.take() {
            let closing = format!("</{name}");
            let end = find_ascii_ci(self.rest, &closing).unwrap_or(self.rest.len());
            if end > 0 {
                return Some(Segment::Raw(self.advance(end)));
            }
        }

        let rest = self.rest;
        if rest.starts_with("<!--") {
            let end = rest.find("-->").map_or(rest.len(), |i| i + 3);
            return Some(Segment::Raw(self.advance(end)));
        }
        if rest.starts_with("<![CDATA[") {
            let (inner_end, end) = match rest.find("]]>") {
                Some(i) => (i, i + 3),
                None => (rest.len(), rest.len()),
            };
            let inner = &rest[9..inner_end.max(9)];
            self.advance(end);
            return Some(Segment::Cdata(inner));
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').map_or(rest.len(), |i| i + 1);
            return Some(Segment::Raw(self.advance(end)));
        }
        if starts_tag(rest) {
            let end = tag_end(rest);
            let tag = self.advance(end);
            let name = tag_name(tag);
            if !tag.starts_with("</") && !tag.ends_with("/>") && is_raw_text_element(name) {
                self.raw_until = Some(name);
            }
            return Some(Segment::Tag(tag));
        }

        // Text runs to the next '<' that is not the first byte.
        let skip = usize::from(rest.starts_with('<'));
        let end = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        Some(Segment::Text(self.advance(end)))
    }
}

impl<'a> Segments<'a> {
    fn advance(&mut self, len: usize) -> &'a str {
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        head
    }
}

/// Rebuild markup segment by segment.
///
/// `f` returns the replacement text of a segment (CDATA delimiters
/// included) or `None` to copy it unchanged. Borrowed when nothing changed.
pub fn map_segments<'a>(
    markup: &'a str,
    mut f: impl FnMut(Segment<'a>) -> Option<String>,
) -> Cow<'a, str> {
    let mut iter = segments(markup);
    let mut out: Option<String> = None;
    let mut start = 0;

    while let Some(segment) = iter.next() {
        let end = markup.len() - iter.rest.len();
        match f(segment) {
            Some(replacement) => {
                let buf = out.get_or_insert_with(|| {
                    let mut buf = String::with_capacity(markup.len() + markup.len() / 8);
                    buf.push_str(&markup[..start]);
                    buf
                });
                buf.push_str(&replacement);
            }
            None => {
                if let Some(buf) = out.as_mut() {
                    buf.push_str(&markup[start..end]);
                }
            }
        }
        start = end;
    }

    out.map_or(Cow::Borrowed(markup), Cow::Owned)
}

/// `<` followed by a letter or `/letter`.
fn starts_tag(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        Some(b'/') => bytes.get(2).is_some_and(u8::is_ascii_alphabetic),
        Some(b) => b.is_ascii_alphabetic(),
        None => false,
    }
}

/// Byte length of the tag at the start of `s`, honouring quoted values.
fn tag_end(s: &str) -> usize {
    let mut quote = None;
    for (i, b) in s.bytes().enumerate().skip(1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return i + 1,
            _ => {}
        }
    }
    s.len()
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Element name of a tag (`<img src=..>` → `img`, `</p>` → `p`).
pub fn tag_name(tag: &str) -> &str {
    let inner = tag.trim_start_matches('<').trim_start_matches('/');
    let end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(inner.len());
    &inner[..end]
}

// =============================================================================
// Attributes
// =============================================================================

/// An attribute of a tag, borrowing from the tag text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// `None` for boolean attributes.
    pub value: Option<&'a str>,
    value_range: Range<usize>,
}

/// Parse the attributes of a start tag.
///
/// Input: `<img src="a.png" alt='Logo' width=10 hidden>`
/// Output: `src=a.png`, `alt=Logo`, `width=10`, `hidden`
pub fn attributes(tag: &str) -> Vec<Attribute<'_>> {
    let bytes = tag.as_bytes();
    let mut attrs = Vec::new();
    if tag.starts_with("</") {
        return attrs;
    }
    let mut i = 1 + tag_name(tag).len();
    let len = bytes.len();

    let is_name_end = |b: u8| b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/');

    while i < len {
        while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len || bytes[i] == b'>' {
            break;
        }

        let name_start = i;
        while i < len && !is_name_end(bytes[i]) {
            i += 1;
        }
        let name = &tag[name_start..i];

        let mut j = i;
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= len || bytes[j] != b'=' {
            attrs.push(Attribute {
                name,
                value: None,
                value_range: i..i,
            });
            continue;
        }

        // Skip '=' and whitespace
        j += 1;
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }

        let range = match bytes.get(j) {
            Some(&q @ (b'"' | b'\'')) => {
                let start = j + 1;
                let end = tag[start..].find(q as char).map_or(len, |e| start + e);
                i = (end + 1).min(len);
                start..end
            }
            _ => {
                let start = j;
                let mut end = j;
                while end < len && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>' {
                    end += 1;
                }
                i = end;
                start..end
            }
        };

        attrs.push(Attribute {
            name,
            value: Some(&tag[range.clone()]),
            value_range: range,
        });
    }

    attrs
}

/// Replace attribute values in a tag.
///
/// `f(name, value)` returns the new value or `None` to keep it. Everything
/// else in the tag is copied byte for byte.
pub fn rewrite_attributes<'a>(
    tag: &'a str,
    mut f: impl FnMut(&str, &str) -> Option<String>,
) -> Cow<'a, str> {
    let mut out: Option<String> = None;
    let mut copied = 0;

    for attr in attributes(tag) {
        let Some(value) = attr.value else { continue };
        if let Some(new_value) = f(attr.name, value) {
            let out = out.get_or_insert_with(|| String::with_capacity(tag.len() + 16));
            out.push_str(&tag[copied..attr.value_range.start]);
            out.push_str(&new_value);
            copied = attr.value_range.end;
        }
    }

    match out {
        Some(mut out) => {
            out.push_str(&tag[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(tag),
    }
}

// =============================================================================
// Entity-aware text mapping
// =============================================================================

/// Length of a character reference at the start of `s` (`&amp;`, `&#1234;`).
fn entity_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('&')?;
    let end = body.find(';')?;
    let name = &body[..end];
    let valid = !name.is_empty()
        && name.len() <= 32
        && match name.strip_prefix('#') {
            Some(num) => match num.strip_prefix(['x', 'X']) {
                Some(hex) => !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()),
                None => !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()),
            },
            None => name.bytes().all(|b| b.is_ascii_alphanumeric()),
        };
    valid.then_some(end + 2)
}

/// Apply `f` to the text between character references, copying the
/// references themselves unchanged.
pub fn map_text<'a>(text: &'a str, f: impl Fn(&str) -> Cow<'_, str>) -> Cow<'a, str> {
    if !text.contains('&') {
        return match f(text) {
            Cow::Borrowed(_) => Cow::Borrowed(text),
            Cow::Owned(mapped) => Cow::Owned(mapped),
        };
    }

    let mut out = String::with_capacity(text.len());
    let mut plain_start = 0;
    let mut i = 0;
    while let Some(offset) = text[i..].find('&') {
        let at = i + offset;
        match entity_len(&text[at..]) {
            Some(len) => {
                out.push_str(&f(&text[plain_start..at]));
                out.push_str(&text[at..at + len]);
                i = at + len;
                plain_start = i;
            }
            None => i = at + 1,
        }
    }
    out.push_str(&f(&text[plain_start..]));
    Cow::Owned(out)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(markup: &str) -> String {
        segments(markup)
            .map(|segment| match segment {
                Segment::Cdata(inner) => format!("<![CDATA[{inner}]]>"),
                Segment::Text(s) | Segment::Tag(s) | Segment::Raw(s) => s.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape("hello world"), "hello world");
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
        assert_eq!(escape_attr("it's"), "it&#39;s");
    }

    #[test]
    fn test_raw_text_elements() {
        assert!(is_raw_text_element("script"));
        assert!(is_raw_text_element("STYLE"));
        assert!(!is_raw_text_element("pre"));
    }

    #[test]
    fn test_segments_basic() {
        let parts: Vec<_> = segments("<p class=\"x\">Здраво</p>").collect();
        assert_eq!(
            parts,
            vec![
                Segment::Tag("<p class=\"x\">"),
                Segment::Text("Здраво"),
                Segment::Tag("</p>"),
            ]
        );
    }

    #[test]
    fn test_segments_raw_content() {
        let markup = "<!DOCTYPE html><!-- коментар --><script>var a = '<b>';</script><style>p{}</style>x";
        let parts: Vec<_> = segments(markup).collect();
        assert_eq!(parts[0], Segment::Raw("<!DOCTYPE html>"));
        assert_eq!(parts[1], Segment::Raw("<!-- коментар -->"));
        assert_eq!(parts[2], Segment::Tag("<script>"));
        assert_eq!(parts[3], Segment::Raw("var a = '<b>';"));
        assert_eq!(parts[4], Segment::Tag("</script>"));
        assert_eq!(parts[6], Segment::Raw("p{}"));
        assert_eq!(parts.last(), Some(&Segment::Text("x")));
    }

    #[test]
    fn test_segments_cdata_and_stray_lt() {
        let parts: Vec<_> = segments("<title><![CDATA[Вести]]></title>a < b").collect();
        assert_eq!(parts[1], Segment::Cdata("Вести"));
        assert_eq!(parts[3], Segment::Text("a "));
        assert_eq!(parts[4], Segment::Text("< b"));
    }

    #[test]
    fn test_segments_rebuild_is_lossless() {
        let markup = r#"<!doctype html><html lang="sr"><head><title>Наслов</title>
<script src="a.js"></script></head><body><img alt='Слика > лого' src=x.png>
<![CDATA[ data ]]><?xml-stylesheet href="s.xsl"?>1 < 2 &amp; 3</body></html>"#;
        assert_eq!(rebuild(markup), markup);
    }

    #[test]
    fn test_map_segments() {
        let markup = "<p>a</p><![CDATA[b]]><!-- c -->";
        let out = map_segments(markup, |segment| match segment {
            Segment::Text(s) => Some(s.to_uppercase()),
            Segment::Cdata(s) => Some(format!("<![CDATA[{}]]>", s.to_uppercase())),
            _ => None,
        });
        assert_eq!(out, "<p>A</p><![CDATA[B]]><!-- c -->");

        let same = map_segments(markup, |_| None);
        assert!(matches!(same, Cow::Borrowed(_)));
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name("<img src=\"a\">"), "img");
        assert_eq!(tag_name("</p>"), "p");
        assert_eq!(tag_name("<br/>"), "br");
    }

    #[test]
    fn test_attributes() {
        let attrs = attributes(r#"<img src="a.png" alt='Logo' width=10 hidden>"#);
        let pairs: Vec<_> = attrs.iter().map(|a| (a.name, a.value)).collect();
        assert_eq!(
            pairs,
            vec![
                ("src", Some("a.png")),
                ("alt", Some("Logo")),
                ("width", Some("10")),
                ("hidden", None),
            ]
        );
    }

    #[test]
    fn test_attributes_self_closing() {
        let attrs = attributes(r#"<meta name="x" content="y" />"#);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].value, Some("y"));
    }

    #[test]
    fn test_rewrite_attributes() {
        let tag = r#"<img  src="a.png" alt='Лого' hidden>"#;
        let out = rewrite_attributes(tag, |name, value| {
            (name == "alt").then(|| value.to_uppercase())
        });
        assert_eq!(out, r#"<img  src="a.png" alt='ЛОГО' hidden>"#);

        let untouched = rewrite_attributes(tag, |_, _| None);
        assert!(matches!(untouched, Cow::Borrowed(_)));
    }

    #[test]
    fn test_map_text_keeps_entities() {
        let out = map_text("a &amp; b &#169; c &x d", |s| Cow::Owned(s.to_uppercase()));
        assert_eq!(out, "A &amp; B &#169; C &X D");
    }

    #[test]
    fn test_map_text_borrowed_when_unchanged() {
        let out = map_text("plain", |s| Cow::Borrowed(s));
        assert!(matches!(out, Cow::Borrowed(_)));
    }
}
