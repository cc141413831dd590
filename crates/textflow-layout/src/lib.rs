//! Greedy line breaking driven by an injected width oracle.

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

mod line_breaker;
mod line_ir;

pub use line_breaker::{break_lines, LineBreaker};
pub use line_ir::{Line, LineSink, MonospaceOracle, WidthOracle};
pub use textflow::{Constraints, Overflow};
