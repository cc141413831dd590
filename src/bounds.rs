//! Character classes used to pick line-break positions.

use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Horizontal ellipsis glyph used for `text-overflow: ellipsis`.
pub const ELLIPSIS: &str = "\u{2026}";

const HYPHEN_MINUS: char = '-';
const EN_DASH: char = '\u{2013}';
const EM_DASH: char = '\u{2014}';

/// Returns true if `c` can be used as a break between words.
pub fn is_word_bound(c: char) -> bool {
    c.is_whitespace() || matches!(c, HYPHEN_MINUS | EN_DASH | EM_DASH)
}

/// Returns true if `c` stays attached to the preceding word when a line is
/// broken after it.
///
/// The em dash is a word bound but not a hyphen.
pub fn is_hyphen(c: char) -> bool {
    matches!(c, HYPHEN_MINUS | EN_DASH)
}

/// Translates a `text-overflow` code into the marker appended to a truncated
/// final line.
pub fn overflow_marker(code: Option<&str>) -> &str {
    match code {
        Some("ellipsis") => ELLIPSIS,
        Some("clip") | None => "",
        Some(custom) => custom,
    }
}

/// What to append to the last allowed line when text remains.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum Overflow {
    /// Cut the text without a marker.
    #[default]
    Clip,
    /// Append `…`.
    Ellipsis,
    /// Append a caller-supplied literal, e.g. `">"`.
    Custom(String),
}

impl Overflow {
    /// Parses an overflow code; `None` means clip.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("ellipsis") => Self::Ellipsis,
            Some("clip") | None => Self::Clip,
            Some(custom) => Self::Custom(custom.to_string()),
        }
    }

    /// Interprets a loosely typed JSON value. Non-string values clip.
    pub fn from_value(value: &Value) -> Self {
        Self::from_code(value.as_str())
    }

    /// Marker text appended on truncation.
    pub fn marker(&self) -> &str {
        match self {
            Self::Clip => "",
            Self::Ellipsis => ELLIPSIS,
            Self::Custom(custom) => custom,
        }
    }
}

impl From<Value> for Overflow {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<Overflow> for String {
    fn from(value: Overflow) -> Self {
        match value {
            Overflow::Clip => "clip".to_string(),
            Overflow::Ellipsis => "ellipsis".to_string(),
            Overflow::Custom(custom) => custom,
        }
    }
}
