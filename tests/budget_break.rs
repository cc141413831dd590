mod common;

use common::budget_alloc::BudgetAlloc;
use common::fixtures::{repeated, MARKED_UP, PROSE};
use textflow::{Constraints, Overflow};
use textflow_layout::{break_lines, Line, MonospaceOracle};

// Sixteen paragraphs peak well under 64KiB today; the guardrail leaves room.
const BREAK_BUDGET_BYTES: usize = 256 * 1024;

#[global_allocator]
static ALLOC: BudgetAlloc = BudgetAlloc::new();

// One test per binary: the allocator is process-wide.
#[test]
fn breaking_stays_under_budget() {
    let oracle = MonospaceOracle::default();
    let wrap = Constraints::for_width(40.0, 19.2);
    let truncate = Constraints {
        max_lines: Some(4),
        overflow: Overflow::Ellipsis,
        ..Constraints::for_width(40.0, 19.2)
    };

    for (name, paragraph) in [("prose", PROSE), ("markup", MARKED_UP)] {
        let text = repeated(paragraph, 16);
        for (case, constraints) in [("wrap", &wrap), ("truncate", &truncate)] {
            let mut lines: Vec<Line> = Vec::with_capacity(128);
            let (count, stats) =
                ALLOC.measure(|| break_lines(&text, constraints, &oracle, &mut lines));
            assert!(count > 0, "{} {} produced no lines", name, case);
            assert!(
                stats.peak_bytes <= BREAK_BUDGET_BYTES,
                "{} {} peak over budget: {} bytes ({:.1}KB), budget: {}KB",
                name,
                case,
                stats.peak_bytes,
                stats.peak_bytes as f64 / 1024.0,
                BREAK_BUDGET_BYTES / 1024
            );
        }
    }

    // Plain text never allocates per character: buffers are reused across
    // candidates and only boundaries and committed lines allocate.
    let text = repeated(PROSE, 16);
    let chars = text.chars().count();
    let mut lines: Vec<Line> = Vec::with_capacity(128);
    let (_, stats) = ALLOC.measure(|| break_lines(&text, &wrap, &oracle, &mut lines));
    assert!(
        stats.calls < chars,
        "plain wrap made {} allocation calls for {} chars",
        stats.calls,
        chars
    );
}
