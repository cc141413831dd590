//! Lay out marked-up text into a box and print the resulting lines.
//!
//! Widths come from a fixed-advance oracle, so the output shows where a
//! renderer with that advance would break. Options load from a JSON file
//! in the same camelCase shape hosts pass; flags replace the resolved limits.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use textflow::{Constraints, Overflow, TextBoxOptions, TextFlowError};
use textflow_layout::{Line, LineBreaker, MonospaceOracle};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Text box options as JSON (`text`, `width`, `maxLines`, `padding`, ...)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Text to lay out, replacing `text` from the options file; `-` reads stdin
    #[arg(long)]
    text: Option<String>,

    /// Content width limit
    #[arg(long)]
    max_width: Option<f32>,

    /// Content height limit
    #[arg(long)]
    max_height: Option<f32>,

    /// Maximum number of lines
    #[arg(long)]
    max_lines: Option<usize>,

    /// Distance between baselines
    #[arg(long)]
    line_height: Option<f32>,

    /// `ellipsis`, `clip`, or a literal marker for truncated text
    #[arg(long)]
    overflow: Option<String>,

    /// Advance of every character
    #[arg(long, default_value_t = 1.0)]
    advance: f32,

    /// Print JSON instead of one row per line
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    line_count: usize,
    lines: &'a [Line],
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TextFlowError> {
    let mut options = match &cli.options {
        Some(path) => TextBoxOptions::from_json(&fs::read_to_string(path)?)?,
        None => TextBoxOptions::default(),
    };
    match cli.text.as_deref() {
        Some("-") => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            options.text = text;
        }
        Some(text) => options.text = text.to_string(),
        None => {}
    }
    if !cli.advance.is_finite() || cli.advance < 0.0 {
        return Err(TextFlowError::InvalidOption {
            name: "advance",
            value: cli.advance.to_string(),
        });
    }

    let constraints = apply_overrides(options.resolve()?, &cli)?;
    let breaker = LineBreaker::new(constraints)
        .with_width_oracle(Arc::new(MonospaceOracle::new(cli.advance)));
    log::debug!(
        "laying out {} chars with {:?}",
        options.text.len(),
        breaker.constraints()
    );
    let lines = breaker.break_text(&options.text);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &lines, cli.json)?;
    out.flush()?;
    Ok(())
}

fn apply_overrides(mut constraints: Constraints, cli: &Cli) -> Result<Constraints, TextFlowError> {
    if let Some(width) = cli.max_width {
        constraints.max_width = Some(width);
    }
    if let Some(height) = cli.max_height {
        constraints.max_height = Some(height);
    }
    if let Some(lines) = cli.max_lines {
        constraints.max_lines = Some(lines);
    }
    if let Some(line_height) = cli.line_height {
        if !line_height.is_finite() || line_height <= 0.0 {
            return Err(TextFlowError::InvalidOption {
                name: "lineHeight",
                value: line_height.to_string(),
            });
        }
        constraints.line_height = line_height;
    }
    if let Some(code) = cli.overflow.as_deref() {
        constraints.overflow = Overflow::from_code(Some(code));
    }
    Ok(constraints)
}

fn write_report<W: Write>(out: &mut W, lines: &[Line], json: bool) -> Result<(), TextFlowError> {
    if json {
        let report = Report {
            line_count: lines.len(),
            lines,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }
    for line in lines {
        writeln!(out, "{}", line.content)?;
    }
    Ok(())
}
