//! Inline markup parsing, boundary classification, and box options for
//! oracle-measured line breaking.
//!
//! The line breaker itself lives in `textflow-layout`; this crate holds the
//! pieces it builds on:
//!
//! - [`markup`]: strips inline tags and links open tags to their close tags.
//! - [`bounds`]: word-boundary and hyphen predicates, overflow markers.
//! - [`box_options`]: resolves width/height/padding options into
//!   [`Constraints`].
//!
//! ```rust
//! use textflow::markup::parse;
//!
//! let parsed = parse("foo <b>bar</b>");
//! assert_eq!(parsed.text, "foo bar");
//! assert_eq!(parsed.tags[0].close, Some(1));
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

extern crate alloc;

pub mod bounds;
pub mod box_options;
pub mod error;
pub mod markup;

pub use bounds::{is_hyphen, is_word_bound, overflow_marker, Overflow, ELLIPSIS};
pub use box_options::{Constraints, Insets, TextBoxOptions};
pub use error::TextFlowError;
pub use markup::{parse, strip_markup, ParsedText, Tag, TagKind};
