//! Text box options and their reduction to breaking constraints.
//!
//! Options mirror the loosely typed JSON a host passes in: any size that is
//! not a finite, non-negative number means "auto". Padding and margin accept
//! CSS shorthand.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bounds::Overflow;
use crate::error::TextFlowError;

/// Font size assumed when none is given.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;
/// Line height as a multiple of font size when none is given.
pub const DEFAULT_LINE_HEIGHT_RATIO: f32 = 1.2;

/// Width/height/line limits handed to the line breaker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Constraints {
    /// Maximum line width; `None` is unconstrained.
    pub max_width: Option<f32>,
    /// Maximum block height; `None` is unconstrained.
    pub max_height: Option<f32>,
    /// Maximum number of lines; `None` is unconstrained.
    pub max_lines: Option<usize>,
    /// Vertical advance per line.
    pub line_height: f32,
    /// Marker for a truncated final line.
    pub overflow: Overflow,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_lines: None,
            line_height: DEFAULT_FONT_SIZE_PX * DEFAULT_LINE_HEIGHT_RATIO,
            overflow: Overflow::Clip,
        }
    }
}

impl Constraints {
    /// Width-limited constraints with everything else unconstrained.
    pub fn for_width(max_width: f32, line_height: f32) -> Self {
        Self {
            max_width: Some(max_width),
            line_height,
            ..Self::default()
        }
    }

    /// True when neither width nor height limits the text.
    pub fn is_unbounded(&self) -> bool {
        self.max_width.is_none() && self.max_height.is_none()
    }
}

/// Four-sided insets in `[top, right, bottom, left]` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "[f32; 4]")]
pub struct Insets {
    /// Top inset.
    pub top: f32,
    /// Right inset.
    pub right: f32,
    /// Bottom inset.
    pub bottom: f32,
    /// Left inset.
    pub left: f32,
}

impl Insets {
    /// Same inset on every side.
    pub fn uniform(v: f32) -> Self {
        Self::from_array([v; 4])
    }

    /// Builds insets from `[top, right, bottom, left]`.
    pub fn from_array([top, right, bottom, left]: [f32; 4]) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// `[top, right, bottom, left]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// Parses CSS shorthand such as `"10px 20px"`. Unparsable parts are 0.
    pub fn parse(value: &str) -> Self {
        let parts: Vec<f32> = value
            .split_whitespace()
            .take(4)
            .map(parse_leading_float)
            .collect();
        if parts.is_empty() {
            return Self::from_shorthand(&[parse_leading_float(value)]);
        }
        Self::from_shorthand(&parts)
    }

    /// Interprets a number, shorthand string, or array of either.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => Self::uniform(finite_or_zero(n.as_f64())),
            Value::String(s) => Self::parse(s),
            Value::Array(items) => {
                let parts: Vec<f32> = items
                    .iter()
                    .take(4)
                    .map(|item| match item {
                        Value::Number(n) => finite_or_zero(n.as_f64()),
                        Value::String(s) => parse_leading_float(s),
                        _ => 0.0,
                    })
                    .collect();
                Self::from_shorthand(&parts)
            }
            _ => Self::default(),
        }
    }

    fn from_shorthand(parts: &[f32]) -> Self {
        match *parts {
            [all] => Self::uniform(all),
            [vertical, horizontal] => Self::from_array([vertical, horizontal, vertical, horizontal]),
            [top, horizontal, bottom] => Self::from_array([top, horizontal, bottom, horizontal]),
            [top, right, bottom, left, ..] => Self::from_array([top, right, bottom, left]),
            [] => Self::default(),
        }
    }

    fn horizontal(self) -> f32 {
        self.left + self.right
    }

    fn vertical(self) -> f32 {
        self.top + self.bottom
    }
}

impl From<Value> for Insets {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<Insets> for [f32; 4] {
    fn from(value: Insets) -> Self {
        value.to_array()
    }
}

/// Host-facing description of a text box.
///
/// Sizes are kept as raw JSON so `"auto"`, `null`, negatives, and numbers
/// can all be passed; only finite non-negative numbers constrain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextBoxOptions {
    /// Marked-up text to lay out.
    pub text: String,
    /// Preferred box width.
    pub width: Value,
    /// Upper bound on box width.
    pub max_width: Value,
    /// Preferred box height.
    pub height: Value,
    /// Upper bound on box height.
    pub max_height: Value,
    /// Width including margins.
    pub outer_width: Value,
    /// Height including margins.
    pub outer_height: Value,
    /// Maximum number of lines.
    pub max_lines: Value,
    /// Space between the box edge and the text.
    pub padding: Insets,
    /// Space outside the box.
    pub margin: Insets,
    /// Font size, used for the default line height.
    pub font_size: Option<f32>,
    /// Explicit line height.
    pub line_height: Value,
    /// `clip`, `ellipsis`, or a custom marker.
    pub text_overflow: Overflow,
}

impl TextBoxOptions {
    /// Options for `text` with every size left on auto.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Decodes options from JSON.
    pub fn from_json(json: &str) -> Result<Self, TextFlowError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Effective line height: explicit if valid, else `font_size * 1.2`.
    pub fn resolved_line_height(&self) -> Result<f32, TextFlowError> {
        if let Some(explicit) = pos_num(&self.line_height) {
            if explicit > 0.0 {
                return Ok(explicit);
            }
        }
        let font_size = self.font_size.unwrap_or(DEFAULT_FONT_SIZE_PX);
        let line_height = font_size * DEFAULT_LINE_HEIGHT_RATIO;
        if !line_height.is_finite() || line_height <= 0.0 {
            return Err(TextFlowError::invalid("fontSize", font_size.to_string()));
        }
        Ok(line_height)
    }

    /// Reduces the options to limits on the text content area.
    pub fn resolve(&self) -> Result<Constraints, TextFlowError> {
        let line_height = self.resolved_line_height()?;

        let mut max_width = pos_num(&self.max_width);
        if let Some(outer) = pos_num(&self.outer_width) {
            let cap = outer - self.margin.horizontal();
            // A margin wider than the outer box leaves the width on auto.
            max_width = Some(max_width.map_or(cap, |w| w.min(cap)))
                .filter(|w| w.is_finite() && *w >= 0.0);
        }
        let mut max_height = pos_num(&self.max_height);
        if let Some(outer) = pos_num(&self.outer_height) {
            let cap = outer - self.margin.vertical();
            max_height = Some(max_height.map_or(cap, |h| h.min(cap)))
                .filter(|h| h.is_finite() && *h >= 0.0);
        }

        let pad_w = self.padding.horizontal();
        let pad_h = self.padding.vertical();
        let content_width = min_present(
            pos_num(&self.width).map(|w| (w - pad_w).max(0.0)),
            max_width.map(|w| (w - pad_w).max(0.0)),
        );
        let content_height = min_present(
            pos_num(&self.height).map(|h| (h - pad_h).max(0.0)),
            max_height.map(|h| (h - pad_h).max(0.0)),
        );

        let max_lines = pos_num(&self.max_lines).map(|n| n.floor() as usize);

        log::debug!(
            "resolved text box: width={:?} height={:?} lines={:?} line_height={}",
            content_width,
            content_height,
            max_lines,
            line_height
        );
        Ok(Constraints {
            max_width: content_width,
            max_height: content_height,
            max_lines,
            line_height,
            overflow: self.text_overflow.clone(),
        })
    }
}

/// Finite, non-negative JSON number.
fn pos_num(value: &Value) -> Option<f32> {
    let n = value.as_f64()?;
    (n.is_finite() && n >= 0.0).then_some(n as f32)
}

fn min_present(a: Option<f32>, b: Option<f32>) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn finite_or_zero(n: Option<f64>) -> f32 {
    n.filter(|n| n.is_finite()).map_or(0.0, |n| n as f32)
}

/// Parses the numeric prefix of `s` (`"10px"` → 10, `"1e2%"` → 100).
fn parse_leading_float(s: &str) -> f32 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0usize;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    if end == digits_start || s[digits_start..end] == *"." {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse::<f32>().unwrap_or(0.0)
}
