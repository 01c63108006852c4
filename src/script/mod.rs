//! Script model - the two writing systems and the conversion direction.
//!
//! - `Script`: `cir` (Serbian Cyrillic) or `lat` (Serbian Latin)
//! - `Direction`: derived per request from (source, target)
//! - `Locale`: site locale, decides whether dual-script handling applies
//! - `ScriptMix`: which scripts a piece of text is written in

mod detect;
mod locale;

pub use detect::{ScriptMix, contains_cyrillic, detect_script};
pub use locale::Locale;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two writing systems a page can be served in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Script {
    /// Serbian Cyrillic (`cir`).
    #[default]
    #[serde(rename = "cir")]
    Cyrillic,
    /// Serbian Latin (`lat`).
    #[serde(rename = "lat")]
    Latin,
}

impl Script {
    /// Both scripts, Cyrillic first.
    pub const ALL: [Script; 2] = [Script::Cyrillic, Script::Latin];

    /// URL slug / cookie value for this script.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Cyrillic => "cir",
            Self::Latin => "lat",
        }
    }

    /// ISO 15924 subtag used in BCP-47 language tags.
    pub const fn subtag(self) -> &'static str {
        match self {
            Self::Cyrillic => "Cyrl",
            Self::Latin => "Latn",
        }
    }

    /// The counterpart script.
    pub const fn other(self) -> Self {
        match self {
            Self::Cyrillic => Self::Latin,
            Self::Latin => Self::Cyrillic,
        }
    }

    /// Parse a slug from an untrusted signal.
    ///
    /// Case-insensitive, surrounding whitespace ignored. Unknown values are
    /// treated as absent.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("cir") {
            Some(Self::Cyrillic)
        } else if value.eq_ignore_ascii_case("lat") {
            Some(Self::Latin)
        } else {
            None
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Transliteration mode for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Serve stored content as-is.
    None,
    /// Cyrillic source, Latin display.
    CirToLat,
    /// Latin source, Cyrillic display.
    LatToCir,
}

impl Direction {
    /// Direction needed to display `target` when content is stored in `source`.
    pub const fn between(source: Script, target: Script) -> Self {
        match (source, target) {
            (Script::Cyrillic, Script::Latin) => Self::CirToLat,
            (Script::Latin, Script::Cyrillic) => Self::LatToCir,
            _ => Self::None,
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// `(from, to)` scripts, or `None` for the identity direction.
    pub const fn scripts(self) -> Option<(Script, Script)> {
        match self {
            Self::None => None,
            Self::CirToLat => Some((Script::Cyrillic, Script::Latin)),
            Self::LatToCir => Some((Script::Latin, Script::Cyrillic)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CirToLat => "cir_to_lat",
            Self::LatToCir => "lat_to_cir",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_slugs_only() {
        assert_eq!(Script::parse("lat"), Some(Script::Latin));
        assert_eq!(Script::parse(" CIR "), Some(Script::Cyrillic));
        assert_eq!(Script::parse("latin"), None);
        assert_eq!(Script::parse(""), None);
    }

    #[test]
    fn test_direction_none_iff_same_script() {
        for source in Script::ALL {
            for target in Script::ALL {
                let direction = Direction::between(source, target);
                assert_eq!(direction.is_none(), source == target, "{source} -> {target}");
            }
        }
    }

    #[test]
    fn test_direction_scripts() {
        assert_eq!(
            Direction::CirToLat.scripts(),
            Some((Script::Cyrillic, Script::Latin))
        );
        assert_eq!(Direction::None.scripts(), None);
        assert_eq!(Direction::LatToCir.to_string(), "lat_to_cir");
    }

    #[test]
    fn test_serde_uses_slugs() {
        let json = serde_json::to_string(&Script::Latin).unwrap();
        assert_eq!(json, "\"lat\"");
        let parsed: Script = serde_json::from_str("\"cir\"").unwrap();
        assert_eq!(parsed, Script::Cyrillic);
    }
}
