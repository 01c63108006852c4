//! Script-specific image variants.
//!
//! Images uploaded in two versions carry the script in the file name
//! (`logo__cir.png`, `logo__lat.png`). Served pages point at the variant
//! matching the displayed script.

use crate::html::{self, Segment};
use crate::script::Script;
use std::borrow::Cow;

const DELIMITER: &str = "__";

/// Swap `__<from>` for `__<to>` in `src` and `srcset` of every `<img>`.
pub fn swap_image_variants(markup: &str, from: Script, to: Script) -> Cow<'_, str> {
    let from_marker = format!("{DELIMITER}{}", from.slug());
    let to_marker = format!("{DELIMITER}{}", to.slug());
    if !markup.contains(&from_marker) {
        return Cow::Borrowed(markup);
    }

    html::map_segments(markup, |segment| {
        let Segment::Tag(tag) = segment else {
            return None;
        };
        if !html::tag_name(tag).eq_ignore_ascii_case("img") {
            return None;
        }
        let rewritten = html::rewrite_attributes(tag, |name, value| {
            let is_source = name.eq_ignore_ascii_case("src") || name.eq_ignore_ascii_case("srcset");
            (is_source && value.contains(&from_marker)).then(|| value.replace(&from_marker, &to_marker))
        });
        match rewritten {
            Cow::Owned(tag) => Some(tag),
            Cow::Borrowed(_) => None,
        }
    })
}
