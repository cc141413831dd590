#[allow(dead_code)]
#[path = "../../../tests/common/fixtures.rs"]
mod fixtures;

use std::sync::Arc;

use fixtures::{MARKED_UP, PROSE};
use textflow::{strip_markup, TextBoxOptions};
use textflow_layout::{
    break_lines, Constraints, Line, LineBreaker, LineSink, MonospaceOracle, Overflow, WidthOracle,
};

fn non_space(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn wrap(text: &str, width: f32) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    break_lines(
        text,
        &Constraints::for_width(width, 10.0),
        &MonospaceOracle::default(),
        &mut lines,
    );
    lines
}

#[test]
fn every_line_fits_the_width() {
    let oracle = MonospaceOracle::default();
    for text in [PROSE, MARKED_UP] {
        for width in [10.0, 17.0, 24.0, 40.0, 63.0] {
            for line in wrap(text, width) {
                let measured = oracle.measure_width(&line.content);
                assert!(
                    measured <= width,
                    "width {}: {:?} measures {}",
                    width,
                    line.content,
                    measured
                );
            }
        }
    }
}

#[test]
fn wrapping_neither_drops_nor_repeats_characters() {
    for text in [PROSE, MARKED_UP] {
        let expected = non_space(&strip_markup(text).replace("<br>", ""));
        for width in [10.0, 17.0, 24.0, 40.0, 63.0] {
            let joined: String = wrap(text, width)
                .iter()
                .map(|line| non_space(&strip_markup(&line.content)))
                .collect();
            assert_eq!(joined, expected, "width {}", width);
        }
    }
}

#[test]
fn continuation_lines_reopen_enclosing_tags() {
    let lines = wrap(MARKED_UP, 12.0);
    let contents: Vec<&str> = lines.iter().map(|l| l.content.as_str()).collect();
    let inside_fox = contents
        .iter()
        .position(|c| strip_markup(c).starts_with("jumps"))
        .expect("a line starts inside the link");
    assert!(
        contents[inside_fox].starts_with("<tspan font-weight=\"bold\"><a href=\"#fox\">jumps</a>"),
        "got {:?}",
        contents[inside_fox]
    );
}

#[test]
fn forced_break_is_a_boundary_not_a_line() {
    let lines = wrap("ab<br>cd", 10.0);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].content, "ab\n cd");
}

#[test]
fn truncated_block_ends_with_marker() {
    let c = Constraints {
        max_lines: Some(3),
        overflow: Overflow::Ellipsis,
        ..Constraints::for_width(40.0, 10.0)
    };
    let lines = LineBreaker::new(c).break_text(PROSE);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].content.ends_with('\u{2026}'), "{:?}", lines[2].content);
    assert!(!lines[1].content.ends_with('\u{2026}'));
    assert!(MonospaceOracle::default().measure_width(&lines[2].content) <= 40.0);
}

#[test]
fn height_limit_counts_lines() {
    let c = Constraints {
        max_height: Some(35.0),
        ..Constraints::for_width(20.0, 10.0)
    };
    let lines = LineBreaker::new(c).break_text(PROSE);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2].y, 20.0);
}

#[test]
fn options_resolve_into_breaker_constraints() {
    let options = TextBoxOptions::from_json(
        r#"{"text":"ab cd ef gh","width":100,"padding":10,"lineHeight":20}"#,
    )
    .expect("valid options");
    let constraints = options.resolve().expect("resolvable");
    let breaker = LineBreaker::new(constraints)
        .with_width_oracle(Arc::new(MonospaceOracle::new(10.0)));
    let lines = breaker.break_text(&options.text);
    let contents: Vec<&str> = lines.iter().map(|l| l.content.as_str()).collect();
    assert_eq!(contents, vec!["ab cd ef", "gh"]);
    assert_eq!(lines[1].y, 20.0);
}

#[test]
fn breaker_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let breaker = LineBreaker::new(Constraints::for_width(24.0, 10.0));
    assert_send_sync(&breaker);
    let expected = breaker.break_text(PROSE);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| breaker.break_text(PROSE)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("worker panicked"), expected);
        }
    });
}

#[derive(Default)]
struct OrderCheck {
    committed: usize,
    staged_ahead: bool,
    staged_behind: bool,
}

impl LineSink for OrderCheck {
    fn stage_line(&mut self, index: usize, _content: &str, _y: f32) {
        self.staged_ahead |= index > self.committed;
        self.staged_behind |= index < self.committed;
    }

    fn commit_line(&mut self, line: Line) {
        assert_eq!(line.index, self.committed);
        self.committed += 1;
    }
}

#[test]
fn staging_only_targets_the_open_line() {
    let mut sink = OrderCheck::default();
    let count = break_lines(
        MARKED_UP,
        &Constraints::for_width(17.0, 10.0),
        &MonospaceOracle::default(),
        &mut sink,
    );
    assert_eq!(count, sink.committed);
    assert!(!sink.staged_ahead && !sink.staged_behind);
}

#[test]
fn lines_serialize_for_hosts() {
    let lines = wrap("aaaa bbbb", 4.0);
    let json = serde_json::to_value(&lines).expect("serializable");
    assert_eq!(
        json,
        serde_json::json!([
            {"index": 0, "content": "aaaa", "y": 0.0},
            {"index": 1, "content": "bbbb", "y": 10.0}
        ])
    );
}
