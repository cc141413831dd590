use serde::{Deserialize, Serialize};

/// Width measurement hook; the only source of truth for text metrics.
///
/// The candidate may contain inline markup. Implementations render it however
/// the host renders lines and report the resulting width in the same unit as
/// the width constraint.
pub trait WidthOracle {
    /// Rendered width of `markup`.
    fn measure_width(&self, markup: &str) -> f32;
}

impl<F> WidthOracle for F
where
    F: Fn(&str) -> f32,
{
    fn measure_width(&self, markup: &str) -> f32 {
        self(markup)
    }
}

/// Fixed-advance oracle: visible characters times `advance_px`.
///
/// Markup is stripped before counting. Used when no host oracle is
/// installed, and handy for deterministic tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceOracle {
    /// Width of every character.
    pub advance_px: f32,
}

impl MonospaceOracle {
    /// Oracle with the given per-character advance.
    pub fn new(advance_px: f32) -> Self {
        Self { advance_px }
    }
}

impl Default for MonospaceOracle {
    fn default() -> Self {
        Self { advance_px: 1.0 }
    }
}

impl WidthOracle for MonospaceOracle {
    fn measure_width(&self, markup: &str) -> f32 {
        let visible = if markup.contains('<') {
            textflow::strip_markup(markup).chars().count()
        } else {
            markup.chars().count()
        };
        visible as f32 * self.advance_px
    }
}

/// One finished line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Zero-based line number.
    pub index: usize,
    /// Line text, possibly prefixed with re-opened tag markup.
    pub content: String,
    /// Vertical offset of the line within the block.
    pub y: f32,
}

/// Receives lines as the breaker produces them.
///
/// While a line is being fitted its candidate content is staged repeatedly
/// under the same `index`; each call replaces the previous one. A line is
/// final once it is committed.
pub trait LineSink {
    /// Speculative content for the line currently being measured.
    fn stage_line(&mut self, _index: usize, _content: &str, _y: f32) {}

    /// Final content for a line, in emission order.
    fn commit_line(&mut self, line: Line);
}

impl LineSink for Vec<Line> {
    fn commit_line(&mut self, line: Line) {
        self.push(line);
    }
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn stage_line(&mut self, index: usize, content: &str, y: f32) {
        (**self).stage_line(index, content, y);
    }

    fn commit_line(&mut self, line: Line) {
        (**self).commit_line(line);
    }
}
