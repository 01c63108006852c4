//! `<html lang>` attribute.

use crate::html;
use crate::script::{Locale, Script};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static RE_LANG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)(^|\s)lang="[^"]*""#).unwrap());

/// Set the script-tagged language on an attribute string such as
/// `lang="sr-RS" dir="ltr"`.
///
/// An existing `lang="..."` is replaced, otherwise one is appended.
/// Locales without a script-tagged variant are left alone.
pub fn language_attributes<'a>(output: &'a str, locale: &Locale, served: Script) -> Cow<'a, str> {
    let Some(tag) = locale.lang_tag(served) else {
        return Cow::Borrowed(output);
    };
    let attr = format!(r#"lang="{}""#, html::escape_attr(&tag));

    if RE_LANG.is_match(output) {
        let replaced = RE_LANG.replace_all(output, |caps: &Captures<'_>| format!("{}{attr}", &caps[1]));
        Cow::Owned(replaced.into_owned())
    } else if output.is_empty() {
        Cow::Owned(attr)
    } else {
        Cow::Owned(format!("{output} {attr}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_existing() {
        let sr = Locale::new("sr_RS");
        assert_eq!(
            language_attributes(r#"LANG="sr-RS" dir="ltr""#, &sr, Script::Latin),
            r#"lang="sr-Latn-RS" dir="ltr""#
        );
    }

    #[test]
    fn test_prefixed_lang_attributes_are_kept() {
        let sr = Locale::new("sr_RS");
        assert_eq!(
            language_attributes(r#"data-lang="en" xml:lang="sr" lang="sr-RS""#, &sr, Script::Latin),
            r#"data-lang="en" xml:lang="sr" lang="sr-Latn-RS""#
        );
        assert_eq!(
            language_attributes(r#"data-lang="en""#, &sr, Script::Latin),
            r#"data-lang="en" lang="sr-Latn-RS""#
        );
    }

    #[test]
    fn test_appends_when_missing() {
        let bs = Locale::new("bs_BA");
        assert_eq!(
            language_attributes(r#"dir="ltr""#, &bs, Script::Cyrillic),
            r#"dir="ltr" lang="bs-Cyrl-BA""#
        );
        assert_eq!(language_attributes("", &bs, Script::Latin), r#"lang="bs-Latn-BA""#);
    }

    #[test]
    fn test_untagged_locale() {
        let mk = Locale::new("mk_MK");
        assert_eq!(language_attributes(r#"lang="mk""#, &mk, Script::Latin), r#"lang="mk""#);
    }
}
