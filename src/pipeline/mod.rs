//! Output pipeline.
//!
//! Applies the request direction to everything a host renders:
//!
//! | Surface | Content                 | Active when                               |
//! |---------|-------------------------|-------------------------------------------|
//! | `Page`  | full HTML page          | frontend request, direction set           |
//! | `Feed`  | RSS/Atom XML            | frontend request, direction set           |
//! | `Ajax`  | JSON or text body       | whitelisted action, `fix_ajax`, direction |
//!
//! Markup is converted segment by segment: text, CDATA and a few
//! human-readable attributes change, tags, comments, scripts, styles and
//! character references are copied.

mod fragment;
mod media;

pub use fragment::Fragment;
pub use media::swap_image_variants;

use crate::config::PismoConfig;
use crate::debug;
use crate::html::{self, Segment};
use crate::resolve::{RequestKind, ScriptState};
use crate::script::Direction;
use crate::translit::Transliterator;
use std::borrow::Cow;

/// A rendering boundary the pipeline can intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Page,
    Feed,
    Ajax,
}

impl Surface {
    const fn index(self) -> usize {
        match self {
            Self::Page => 0,
            Self::Feed => 1,
            Self::Ajax => 2,
        }
    }
}

/// Hooks a host calls around rendering a surface.
pub trait RenderInterceptor {
    /// Start capturing `surface`. Returns `false` when the surface is
    /// inactive or already capturing.
    fn before_render(&mut self, surface: Surface) -> bool;

    /// Finish capturing and return the body to send.
    fn after_render(&mut self, surface: Surface, body: String) -> String;
}

/// Attributes whose values are read by people.
const TEXT_ATTRIBUTES: [&str; 4] = ["alt", "title", "placeholder", "aria-label"];

/// `<meta>` names/properties whose `content` is prose.
const TEXT_META: [&str; 10] = [
    "description",
    "keywords",
    "author",
    "og:title",
    "og:description",
    "og:site_name",
    "og:image:alt",
    "twitter:title",
    "twitter:description",
    "twitter:image:alt",
];

/// Convert markup with `direction`, leaving structure untouched.
pub fn convert_markup(translit: Transliterator, direction: Direction, markup: &str) -> Cow<'_, str> {
    convert_markup_with(translit, direction, false, markup)
}

/// [`convert_markup`] with the cut (ASCII) Latin variant when `cut` is set.
pub fn convert_markup_with(
    translit: Transliterator,
    direction: Direction,
    cut: bool,
    markup: &str,
) -> Cow<'_, str> {
    if direction.is_none() {
        return Cow::Borrowed(markup);
    }
    let convert = |text: &str| html::map_text(text, |s| translit.convert(s, direction, cut)).into_owned();

    html::map_segments(markup, |segment| match segment {
        Segment::Text(text) => {
            let converted = html::map_text(text, |s| translit.convert(s, direction, cut));
            match converted {
                Cow::Owned(text) => Some(text),
                Cow::Borrowed(_) => None,
            }
        }
        Segment::Cdata(inner) => match translit.convert(inner, direction, cut) {
            Cow::Owned(inner) => Some(format!("<![CDATA[{inner}]]>")),
            Cow::Borrowed(_) => None,
        },
        Segment::Tag(tag) => {
            let is_prose_meta = html::tag_name(tag).eq_ignore_ascii_case("meta")
                && html::attributes(tag).iter().any(|attr| {
                    matches!(attr.name.to_ascii_lowercase().as_str(), "name" | "property")
                        && attr
                            .value
                            .is_some_and(|v| TEXT_META.iter().any(|m| m.eq_ignore_ascii_case(v)))
                });
            let rewritten = html::rewrite_attributes(tag, |name, value| {
                let is_text = TEXT_ATTRIBUTES.iter().any(|a| a.eq_ignore_ascii_case(name))
                    || (is_prose_meta && name.eq_ignore_ascii_case("content"));
                if !is_text {
                    return None;
                }
                let converted = convert(value);
                (converted != value).then_some(converted)
            });
            match rewritten {
                Cow::Owned(tag) => Some(tag),
                Cow::Borrowed(_) => None,
            }
        }
        Segment::Raw(_) => None,
    })
}

/// Per-request output transformer.
///
/// Built from the resolved script state; never mutates stored content.
#[derive(Debug, Clone)]
pub struct OutputPipeline {
    translit: Transliterator,
    direction: Direction,
    markup_active: bool,
    ajax_active: bool,
    fix_titles: bool,
    fix_media: bool,
    buffering: [bool; 3],
}

impl OutputPipeline {
    pub fn new(
        state: &ScriptState,
        translit: Transliterator,
        config: &PismoConfig,
        kind: &RequestKind,
    ) -> Self {
        let direction = state.direction();
        let converting = !direction.is_none();
        let ajax_active = match kind {
            RequestKind::Ajax { action } => converting && config.advanced.allows_ajax(action),
            _ => false,
        };

        Self {
            translit,
            direction,
            markup_active: converting && matches!(kind, RequestKind::Frontend),
            ajax_active,
            fix_titles: config.advanced.fix_titles,
            fix_media: config.advanced.fix_media,
            buffering: [false; 3],
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether `surface` is converted for this request.
    pub fn is_active(&self, surface: Surface) -> bool {
        match surface {
            Surface::Page | Surface::Feed => self.markup_active,
            Surface::Ajax => self.ajax_active,
        }
    }

    pub fn is_buffering(&self, surface: Surface) -> bool {
        self.buffering[surface.index()]
    }

    /// Convert a rendered body of `surface`. Inactive surfaces pass through.
    pub fn transform(&self, surface: Surface, body: String) -> String {
        if !self.is_active(surface) {
            return body;
        }
        match surface {
            Surface::Page | Surface::Feed => self.transform_markup(&body).into_owned(),
            Surface::Ajax => self.transform_json(&body),
        }
    }

    fn transform_markup<'a>(&self, markup: &'a str) -> Cow<'a, str> {
        let converted = convert_markup(self.translit, self.direction, markup);
        let Some((from, to)) = self.direction.scripts().filter(|_| self.fix_media) else {
            return converted;
        };
        let swapped = match swap_image_variants(&converted, from, to) {
            Cow::Owned(swapped) => Some(swapped),
            Cow::Borrowed(_) => None,
        };
        swapped.map_or(converted, Cow::Owned)
    }

    /// Convert one translatable string.
    pub fn translate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.markup_active {
            return Cow::Borrowed(text);
        }
        convert_markup(self.translit, self.direction, text)
    }

    /// Convert a document title unless the theme renders the title tag itself.
    pub fn title<'a>(&self, title: &'a str, theme_title_tag: bool) -> Cow<'a, str> {
        if !self.fix_titles || theme_title_tag {
            return Cow::Borrowed(title);
        }
        self.translate(title)
    }

    /// Convert each part of a document title.
    pub fn title_parts(&self, parts: Vec<String>) -> Vec<String> {
        if !self.fix_titles || !self.markup_active {
            return parts;
        }
        parts
            .into_iter()
            .map(|part| self.translate(&part).into_owned())
            .collect()
    }

    /// Convert every text leaf of a structured value.
    pub fn transform_fragment(&self, fragment: Fragment) -> Fragment {
        if self.direction.is_none() {
            return fragment;
        }
        fragment.map_text(&|text: &str| convert_markup(self.translit, self.direction, text))
    }

    /// Convert a JSON body field by field.
    ///
    /// Bodies that are not a JSON object or array are converted as text.
    pub fn transform_json(&self, body: &str) -> String {
        let parsed = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .map(Fragment::from)
            .filter(Fragment::is_container);

        let Some(fragment) = parsed else {
            debug!("pipeline"; "body is not a JSON container, converting as text");
            return convert_markup(self.translit, self.direction, body).into_owned();
        };

        let value = serde_json::Value::from(self.transform_fragment(fragment));
        match serde_json::to_string(&value) {
            Ok(json) => json,
            Err(_) => convert_markup(self.translit, self.direction, body).into_owned(),
        }
    }
}

impl RenderInterceptor for OutputPipeline {
    fn before_render(&mut self, surface: Surface) -> bool {
        let slot = &mut self.buffering[surface.index()];
        if *slot {
            return false;
        }
        let active = match surface {
            Surface::Page | Surface::Feed => self.markup_active,
            Surface::Ajax => self.ajax_active,
        };
        *slot = active;
        active
    }

    fn after_render(&mut self, surface: Surface, body: String) -> String {
        let slot = &mut self.buffering[surface.index()];
        if !*slot {
            return body;
        }
        *slot = false;
        self.transform(surface, body)
    }
}
