//! # Progress Reporting Module / 进度报告模块
//!
//! The aggregator that owns the run's counters and renders them, either as a
//! fixed three-line display redrawn in place, or as one log entry per test
//! when the output is not an interactive terminal.
//!
//! 持有运行计数器并负责渲染的聚合器：要么是原地重绘的固定三行显示，
//! 要么在输出不是交互式终端时为每个测试输出一条日志。

use colored::*;
use std::io::{self, Write};

use crate::core::models::{Outcome, RunState};
use crate::infra::t;
use crate::infra::terminal::TerminalWidth;

/// Label drawn around the bar. Its length is subtracted from the line width.
pub const BAR_LABEL: &str = "Running Tests";

/// The display never grows wider than this, whatever the terminal size.
/// 无论终端多宽，显示宽度都不会超过此值。
pub const MAX_LINE_WIDTH: usize = 80;

/// Moves the cursor up over the three display lines and back to column 0.
const CURSOR_UP_THREE_LINES: &str = "\x1b[3A\r";

/// Number of bar cells available for a terminal `columns` wide.
///
/// 对于 `columns` 宽的终端，进度条可用的单元格数。
pub fn bar_width(columns: usize) -> usize {
    // "Running Tests [" + "]"
    let label_len = BAR_LABEL.len() + " []".len();
    columns.min(MAX_LINE_WIDTH).saturating_sub(label_len)
}

/// Splits `width` bar cells into `(passed, failed)` segments.
///
/// Segments are proportional to the counts, rounded to the nearest cell.
/// A non-zero count always gets at least one cell, and the two segments
/// together never exceed `width`. A run with no tests yields an empty bar.
///
/// 将 `width` 个单元格划分为 `(通过, 失败)` 两段。各段与计数成比例并四舍五入；
/// 非零计数至少占一个单元格，两段之和不超过 `width`。没有测试时进度条为空。
pub fn bar_segments(state: &RunState, width: usize) -> (usize, usize) {
    if state.total == 0 {
        return (0, 0);
    }

    let scale = |count: usize| -> usize {
        if count == 0 {
            0
        } else {
            ((count * width * 2 + state.total) / (state.total * 2)).max(1)
        }
    };

    let mut passed = scale(state.passed);
    let mut failed = scale(state.failed);

    // Rounding and the one-cell minimum can overshoot by a cell or two.
    while passed + failed > width {
        if passed > failed || (passed == failed && passed > 0) {
            passed -= 1;
        } else {
            failed -= 1;
        }
    }
    (passed, failed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisplayMode {
    /// Three lines redrawn in place after every outcome.
    Interactive { width: usize },
    /// One log entry per outcome.
    Verbose,
}

/// The single consumer of outcomes for display purposes.
///
/// Owns the `RunState`; nothing else increments the counters.
/// 用于显示的唯一结果消费者。持有 `RunState`，其他任何地方都不会修改计数器。
pub struct ProgressReporter<W: Write> {
    state: RunState,
    mode: DisplayMode,
    out: W,
}

impl<W: Write> ProgressReporter<W> {
    /// Creates the in-place display and draws it immediately, so a run with
    /// no tests still shows an empty bar and zero counts.
    ///
    /// 创建原地刷新的显示并立即绘制，因此没有测试的运行也会显示空进度条和零计数。
    pub fn interactive(total: usize, terminal: &dyn TerminalWidth, out: W) -> io::Result<Self> {
        let width = bar_width(terminal.columns_or_fallback());
        let mut reporter = Self {
            state: RunState::new(total),
            mode: DisplayMode::Interactive { width },
            out,
        };
        reporter.draw()?;
        Ok(reporter)
    }

    /// Creates a line-oriented reporter that logs every outcome.
    pub fn verbose(total: usize, out: W) -> Self {
        Self {
            state: RunState::new(total),
            mode: DisplayMode::Verbose,
            out,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.mode, DisplayMode::Interactive { .. })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Records one outcome and updates the display.
    pub fn record(&mut self, outcome: &Outcome) -> io::Result<()> {
        self.state.record(outcome);

        match self.mode {
            DisplayMode::Interactive { .. } => {
                write!(self.out, "{CURSOR_UP_THREE_LINES}")?;
                self.draw()?;
            }
            DisplayMode::Verbose => {
                writeln!(self.out, "{}", outcome.name)?;
                match &outcome.diagnostic {
                    None if outcome.passed => {
                        writeln!(self.out, "\t> {}", t!("progress.pass").green())?
                    }
                    diagnostic => writeln!(
                        self.out,
                        "{}",
                        diagnostic.as_deref().unwrap_or_default().trim_end()
                    )?,
                }
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }

    /// Returns the final counters and the underlying writer.
    pub fn into_parts(self) -> (RunState, W) {
        (self.state, self.out)
    }

    fn draw(&mut self) -> io::Result<()> {
        let DisplayMode::Interactive { width } = self.mode else {
            return Ok(());
        };

        let (passed_cells, failed_cells) = bar_segments(&self.state, width);
        let empty_cells = width - passed_cells - failed_cells;

        writeln!(
            self.out,
            "{} [{}{}{}]",
            BAR_LABEL,
            "#".repeat(passed_cells).green(),
            "#".repeat(failed_cells).red(),
            " ".repeat(empty_cells)
        )?;
        // The trailing space wipes a leftover digit when a count shrinks in width.
        writeln!(
            self.out,
            "{} ",
            t!(
                "progress.counts",
                passed = format!("{:2}", self.state.passed),
                failed = format!("{:2}", self.state.failed),
                remaining = format!("{:2}", self.state.remaining())
            )
        )?;
        writeln!(self.out, "{}", t!("progress.hint"))?;
        self.out.flush()
    }
}
