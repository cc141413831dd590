//! Inline markup extraction.
//!
//! Tags are pulled out of the raw string with a small two-state scanner and
//! recorded at their character offset in the *stripped* text, so the line
//! breaker can walk plain characters and splice markup back in at the right
//! positions.
//!
//! ```rust
//! use textflow::markup::{parse, TagKind};
//!
//! let parsed = parse("a <i title=\"x>y\">b</i>");
//! assert_eq!(parsed.text, "a b");
//! assert_eq!(parsed.tags[0].markup, "<i title=\"x>y\">");
//! assert_eq!(parsed.tags[1].kind, TagKind::Close);
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use serde::Serialize;

const LINE_BREAK_TAG: &str = "<br>";

/// Whether a tag opens or closes an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
}

/// One inline tag found in the input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Character offset in the stripped text where the tag sat.
    pub index: usize,
    /// Element name, e.g. `tspan`. Empty when the markup has none.
    pub name: String,
    /// Raw markup, e.g. `<a href="#">`.
    pub markup: String,
    /// Open or close.
    pub kind: TagKind,
    /// Position in [`ParsedText::tags`] of the matching close tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<usize>,
}

impl Tag {
    /// True for opening tags.
    pub fn is_open(&self) -> bool {
        self.kind == TagKind::Open
    }
}

/// Markup-free text plus the tags removed from it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParsedText {
    /// Tags in input order (also non-decreasing `index` order).
    pub tags: Vec<Tag>,
    /// Text with markup removed and line breaks normalized.
    pub text: String,
    /// `text` split into characters.
    pub chars: Vec<char>,
}

impl ParsedText {
    /// Number of characters in the stripped text.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when no characters remain after stripping.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Index of the last non-whitespace character, if any.
    pub fn last_visible_index(&self) -> Option<usize> {
        self.chars.iter().rposition(|c| !c.is_whitespace())
    }
}

/// Parses `raw` into stripped text and linked tags.
///
/// Literal `<br>` and `\n` become `"\n "` so a break opportunity always
/// follows a forced break. Malformed markup never fails: unmatched tags are
/// kept without a `close` link.
pub fn parse(raw: &str) -> ParsedText {
    let normalized = normalize_line_breaks(raw);
    let (text, mut tags) = split_markup(&normalized);
    link_open_to_close(&mut tags);
    let chars = text.chars().collect();
    ParsedText { tags, text, chars }
}

/// Removes complete tags from `markup` without touching line breaks.
pub fn strip_markup(markup: &str) -> String {
    split_markup(markup).0
}

fn normalize_line_breaks(raw: &str) -> String {
    raw.replace(LINE_BREAK_TAG, "\n").replace('\n', "\n ")
}

fn split_markup(source: &str) -> (String, Vec<Tag>) {
    let chars: Vec<char> = source.chars().collect();
    let found = TagScanner::default().scan(&chars);

    let mut text = String::with_capacity(source.len());
    let mut tags = Vec::with_capacity(found.len());
    let mut cursor = 0usize;
    let mut removed = 0usize;
    for raw in found {
        let len = raw.markup.chars().count();
        text.extend(&chars[cursor..raw.start]);
        cursor = raw.start + len;
        tags.push(Tag {
            index: raw.start - removed,
            name: tag_name(&raw.markup),
            kind: tag_kind(&raw.markup),
            markup: raw.markup,
            close: None,
        });
        removed += len;
    }
    text.extend(&chars[cursor..]);
    (text, tags)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ScanState {
    #[default]
    Text,
    InsideTag,
}

struct RawTag {
    start: usize,
    markup: String,
}

#[derive(Default)]
struct TagScanner {
    state: ScanState,
    quote: Option<char>,
    start: usize,
    markup: String,
    found: Vec<RawTag>,
}

impl TagScanner {
    fn scan(mut self, chars: &[char]) -> Vec<RawTag> {
        for (i, &c) in chars.iter().enumerate() {
            match self.state {
                ScanState::Text => {
                    if c == '<' {
                        self.start_tag(i);
                    }
                }
                ScanState::InsideTag => self.push_inside(i, c),
            }
        }
        self.found
    }

    fn push_inside(&mut self, i: usize, c: char) {
        self.markup.push(c);
        match (c, self.quote) {
            ('"' | '\'', None) => self.quote = Some(c),
            ('"' | '\'', Some(open)) if open == c => self.quote = None,
            // Unquoted `<` abandons the current tag; its text stays put.
            ('<', None) => self.start_tag(i),
            ('>', None) => {
                self.found.push(RawTag {
                    start: self.start,
                    markup: core::mem::take(&mut self.markup),
                });
                self.state = ScanState::Text;
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, i: usize) {
        self.state = ScanState::InsideTag;
        self.quote = None;
        self.start = i;
        self.markup.clear();
        self.markup.push('<');
    }
}

fn tag_kind(markup: &str) -> TagKind {
    let rest = markup.trim().strip_prefix('<').unwrap_or(markup);
    if rest.trim_start().starts_with('/') {
        TagKind::Close
    } else {
        TagKind::Open
    }
}

fn tag_name(markup: &str) -> String {
    let rest = markup.strip_prefix('<').unwrap_or(markup);
    let rest = rest.trim_start().trim_start_matches('/').trim_start();
    rest.chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn link_open_to_close(tags: &mut [Tag]) {
    let mut claimed = alloc::vec![false; tags.len()];
    for open_idx in 0..tags.len() {
        if !tags[open_idx].is_open() {
            continue;
        }
        let close_idx = (open_idx + 1..tags.len()).find(|&i| {
            !claimed[i] && tags[i].kind == TagKind::Close && tags[i].name == tags[open_idx].name
        });
        if let Some(close_idx) = close_idx {
            claimed[close_idx] = true;
            tags[open_idx].close = Some(close_idx);
        }
    }
}
