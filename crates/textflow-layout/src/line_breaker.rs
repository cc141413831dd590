use smallvec::SmallVec;
use std::sync::Arc;
use textflow::{is_hyphen, is_word_bound, parse, Constraints, ParsedText};

use crate::line_ir::{Line, LineSink, MonospaceOracle, WidthOracle};

/// Reusable line breaker bound to a set of constraints.
#[derive(Clone)]
pub struct LineBreaker {
    constraints: Constraints,
    oracle: Option<Arc<dyn WidthOracle + Send + Sync>>,
}

impl core::fmt::Debug for LineBreaker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineBreaker")
            .field("constraints", &self.constraints)
            .field("has_width_oracle", &self.oracle.is_some())
            .finish()
    }
}

impl LineBreaker {
    /// Create a breaker. Without an oracle, widths come from
    /// [`MonospaceOracle::default`].
    pub fn new(constraints: Constraints) -> Self {
        Self {
            constraints,
            oracle: None,
        }
    }

    /// Install a shared width oracle.
    pub fn with_width_oracle(mut self, oracle: Arc<dyn WidthOracle + Send + Sync>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Constraints this breaker applies.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Break `text` and collect the finished lines.
    pub fn break_text(&self, text: &str) -> Vec<Line> {
        let mut lines = Vec::with_capacity(4);
        self.break_into(text, &mut lines);
        lines
    }

    /// Break `text` and stream each finished line. Returns the line count.
    pub fn break_with<F>(&self, text: &str, on_line: F) -> usize
    where
        F: FnMut(Line),
    {
        self.break_into(text, &mut FnSink(on_line))
    }

    /// Break `text` into an arbitrary sink. Returns the line count.
    pub fn break_into<S>(&self, text: &str, sink: &mut S) -> usize
    where
        S: LineSink + ?Sized,
    {
        match &self.oracle {
            Some(oracle) => break_lines(text, &self.constraints, oracle.as_ref(), sink),
            None => break_lines(text, &self.constraints, &MonospaceOracle::default(), sink),
        }
    }
}

struct FnSink<F>(F);

impl<F: FnMut(Line)> LineSink for FnSink<F> {
    fn commit_line(&mut self, line: Line) {
        (self.0)(line);
    }
}

/// Lay out marked-up `text` into lines that fit `constraints`.
///
/// Every candidate line is measured with `oracle`; candidates are staged to
/// `sink` while measured and committed once final. Returns the number of
/// committed lines, 0 when nothing can be laid out.
pub fn break_lines<O, S>(text: &str, constraints: &Constraints, oracle: &O, sink: &mut S) -> usize
where
    O: WidthOracle + ?Sized,
    S: LineSink + ?Sized,
{
    if constraints.max_lines == Some(0) {
        log::debug!("max_lines is 0; nothing to lay out");
        return 0;
    }
    let max_height = constraints.max_height.unwrap_or(f32::INFINITY);
    if max_height < constraints.line_height {
        log::debug!(
            "max_height {} is below one line ({}); nothing to lay out",
            max_height,
            constraints.line_height
        );
        return 0;
    }
    if constraints.max_lines == Some(1) || constraints.is_unbounded() {
        sink.commit_line(Line {
            index: 0,
            content: text.to_string(),
            y: 0.0,
        });
        return 1;
    }

    let parsed = parse(text);
    BreakRun::new(&parsed, constraints, oracle, sink).run()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BreakState {
    /// Extend the current line by one character and measure it.
    Accumulate,
    /// The candidate overflowed; pick where the line ends.
    BacktrackToBoundary,
    /// Commit the accepted content and start the next line.
    EmitLine,
    Done,
}

struct BreakRun<'a, O: ?Sized, S: ?Sized> {
    parsed: &'a ParsedText,
    oracle: &'a O,
    sink: &'a mut S,
    max_width: f32,
    max_height: f32,
    max_lines: usize,
    line_height: f32,
    marker: &'a str,
    last_visible: Option<usize>,

    pos: usize,
    tag_cursor: usize,
    open_tags: SmallVec<[usize; 8]>,

    line_index: usize,
    height: f32,
    line_start: usize,
    next_line_start: Option<usize>,
    last_bound: Option<usize>,
    is_final: bool,
    finished: bool,

    prefix: String,
    body: String,
    body_visible: bool,
    candidate: String,
    measured: String,
    accepted: String,
    accepted_visible: bool,
    working: String,
    working_visible: bool,
    emitted: usize,
}

impl<'a, O, S> BreakRun<'a, O, S>
where
    O: WidthOracle + ?Sized,
    S: LineSink + ?Sized,
{
    fn new(
        parsed: &'a ParsedText,
        constraints: &'a Constraints,
        oracle: &'a O,
        sink: &'a mut S,
    ) -> Self {
        Self {
            parsed,
            oracle,
            sink,
            max_width: constraints.max_width.unwrap_or(f32::INFINITY),
            max_height: constraints.max_height.unwrap_or(f32::INFINITY),
            max_lines: constraints.max_lines.unwrap_or(usize::MAX),
            line_height: constraints.line_height,
            marker: constraints.overflow.marker(),
            last_visible: parsed.last_visible_index(),
            pos: 0,
            tag_cursor: 0,
            open_tags: SmallVec::new(),
            line_index: 0,
            height: 0.0,
            line_start: 0,
            next_line_start: None,
            last_bound: None,
            is_final: false,
            finished: false,
            prefix: String::new(),
            body: String::with_capacity(64),
            body_visible: false,
            candidate: String::with_capacity(64),
            measured: String::with_capacity(64),
            accepted: String::with_capacity(64),
            accepted_visible: false,
            working: String::new(),
            working_visible: false,
            emitted: 0,
        }
    }

    fn run(mut self) -> usize {
        let mut state = BreakState::Accumulate;
        loop {
            state = match state {
                BreakState::Accumulate => self.accumulate(),
                BreakState::BacktrackToBoundary => self.backtrack_to_boundary(),
                BreakState::EmitLine => self.emit_line(),
                BreakState::Done => break,
            };
        }
        self.emitted
    }

    fn accumulate(&mut self) -> BreakState {
        let Some(&c) = self.parsed.chars.get(self.pos) else {
            if self.parsed.is_empty() {
                return BreakState::Done;
            }
            self.finished = true;
            return BreakState::EmitLine;
        };

        self.is_final = self.line_index + 1 >= self.max_lines
            || self.height + 2.0 * self.line_height > self.max_height;
        let chars_remain = self.last_visible.is_some_and(|last| self.pos <= last);
        let more_beyond = self.last_visible.is_some_and(|last| self.pos < last);
        let bound = is_word_bound(c);
        let was_visible = self.body_visible;

        let before_char = self.push_char(self.pos, c);
        self.candidate.clear();
        if self.body_visible {
            self.candidate.push_str(&self.prefix);
            self.candidate.push_str(&self.body);
        }
        self.measured.clear();
        self.measured.push_str(self.candidate.trim());
        if self.is_final && bound && more_beyond {
            self.measured.push_str(self.marker);
        }
        self.sink.stage_line(self.line_index, &self.measured, self.height);

        let width = self.oracle.measure_width(&self.measured);
        if !width.is_finite() {
            log::warn!(
                "width oracle returned {} for {:?}; treating as overflow",
                width,
                self.measured
            );
        }
        if width <= self.max_width {
            self.accepted.clone_from(&self.candidate);
            self.accepted_visible = self.body_visible;
            if !chars_remain {
                self.take_trailing_tags();
                self.finished = true;
                return BreakState::EmitLine;
            }
            if bound {
                self.snapshot_working(c, was_visible, before_char, more_beyond);
                self.last_bound = Some(self.pos);
            }
            self.pos += 1;
            BreakState::Accumulate
        } else if chars_remain {
            BreakState::BacktrackToBoundary
        } else {
            self.take_trailing_tags();
            self.finished = true;
            BreakState::EmitLine
        }
    }

    /// Close out the last line: tags sitting in trailing whitespace are
    /// appended after the visible content instead of being dropped.
    fn take_trailing_tags(&mut self) {
        let parsed = self.parsed;
        let Some(rest) = parsed.tags.get(self.tag_cursor..) else {
            return;
        };
        if !self.accepted_visible || rest.is_empty() {
            return;
        }
        let kept = self.accepted.trim_end().len();
        self.accepted.truncate(kept);
        for tag in rest {
            self.accepted.push_str(&tag.markup);
        }
        self.tag_cursor = parsed.tags.len();
    }

    /// Remember where the line could end at boundary `c`. Hyphens stay on
    /// the line; other boundaries move to the next one.
    fn snapshot_working(
        &mut self,
        c: char,
        was_visible: bool,
        before_char: usize,
        more_beyond: bool,
    ) {
        self.working.clear();
        if is_hyphen(c) {
            self.working.push_str(&self.measured);
            self.working_visible = self.body_visible;
            return;
        }
        if was_visible {
            let mut content = String::with_capacity(self.prefix.len() + before_char);
            content.push_str(&self.prefix);
            content.push_str(&self.body[..before_char]);
            self.working.push_str(content.trim());
        }
        if self.is_final && more_beyond {
            self.working.push_str(self.marker);
        }
        self.working_visible = was_visible;
    }

    fn backtrack_to_boundary(&mut self) -> BreakState {
        let usable_bound = self
            .last_bound
            .filter(|&b| b > self.line_start && self.working_visible);
        let next_start = match usable_bound {
            Some(b) => {
                self.accepted.clone_from(&self.working);
                self.accepted_visible = self.working_visible;
                if is_hyphen(self.parsed.chars[b]) {
                    b + 1
                } else {
                    b
                }
            }
            // No usable boundary on this line: split the word here.
            None => self.pos,
        };
        log::trace!(
            "line {} overflowed at char {}; next line starts at {}",
            self.line_index,
            self.pos,
            next_start
        );

        if self.is_final {
            if !self.accepted_visible {
                self.accepted.clear();
            }
            self.finished = true;
        } else {
            self.next_line_start = Some(next_start);
        }
        BreakState::EmitLine
    }

    fn emit_line(&mut self) -> BreakState {
        let content = self.accepted.trim().to_string();
        log::debug!(
            "line {} at y={}: {:?}",
            self.line_index,
            self.height,
            content
        );
        self.sink.commit_line(Line {
            index: self.line_index,
            content,
            y: self.height,
        });
        self.emitted += 1;
        self.height += self.line_height;
        self.line_index += 1;

        if self.finished || self.is_final || !self.accepted_visible {
            return BreakState::Done;
        }
        let start = self.next_line_start.take().unwrap_or(self.pos);
        self.start_line(start);
        BreakState::Accumulate
    }

    /// Reset per-line state so the next line begins at `start`: replay the
    /// tags before it to find what is still open, then carry `[start, pos)`
    /// over.
    fn start_line(&mut self, start: usize) {
        self.line_start = start;
        self.last_bound = None;
        self.working.clear();
        self.working_visible = false;

        self.open_tags.clear();
        self.tag_cursor = 0;
        if let Some(before) = start.checked_sub(1) {
            self.consume_tags_through(before, false);
        }
        self.prefix.clear();
        self.body.clear();
        self.body_visible = false;
        for at in start..self.pos {
            self.push_char(at, self.parsed.chars[at]);
        }

        self.accepted.clear();
        if self.body_visible {
            self.accepted.push_str(&self.prefix);
            self.accepted.push_str(&self.body);
        }
        self.accepted_visible = self.body_visible;
    }

    /// Append the tags at `at` and then `c` to the line body. Until the line
    /// has a visible character, tags only update the open stack and
    /// whitespace is dropped. Returns the body length just before `c`.
    fn push_char(&mut self, at: usize, c: char) -> usize {
        self.consume_tags_through(at, self.body_visible);
        let before_char = self.body.len();
        if self.body_visible {
            self.body.push(c);
        } else if !c.is_whitespace() {
            self.rebuild_prefix();
            self.body.push(c);
            self.body_visible = true;
        }
        if at + 1 == self.parsed.chars.len() {
            // Tags after the last character, e.g. a trailing `</b>`.
            self.consume_tags_through(at + 1, self.body_visible);
        }
        before_char
    }

    fn rebuild_prefix(&mut self) {
        self.prefix.clear();
        for &open in &self.open_tags {
            self.prefix.push_str(&self.parsed.tags[open].markup);
        }
    }

    fn consume_tags_through(&mut self, at: usize, emit: bool) {
        let parsed = self.parsed;
        let tags = &parsed.tags;
        while let Some(tag) = tags.get(self.tag_cursor) {
            if tag.index > at {
                break;
            }
            if emit {
                self.body.push_str(&tag.markup);
            }
            if tag.is_open() {
                self.open_tags.push(self.tag_cursor);
            } else {
                let closed = self.tag_cursor;
                self.open_tags.retain(|open| tags[*open].close != Some(closed));
            }
            self.tag_cursor += 1;
        }
    }
}
