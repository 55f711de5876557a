//! # Terminal Module / 终端模块
//!
//! Queries about the terminal the run is attached to. The width query is
//! behind a trait so the progress display can be rendered without a real tty.
//!
//! 关于当前运行所连接终端的查询。宽度查询通过 trait 抽象，
//! 使得进度显示可以在没有真实终端的情况下渲染。

use std::io::IsTerminal;

/// Width used when the terminal size cannot be determined.
/// 无法确定终端尺寸时使用的宽度。
pub const FALLBACK_COLUMNS: usize = 80;

/// Something that can report how many columns are available for output.
pub trait TerminalWidth {
    /// The number of columns, or `None` if it cannot be determined.
    fn columns(&self) -> Option<usize>;

    /// The number of columns, falling back to [`FALLBACK_COLUMNS`].
    fn columns_or_fallback(&self) -> usize {
        self.columns().unwrap_or(FALLBACK_COLUMNS)
    }
}

/// The terminal attached to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutTerminal;

impl TerminalWidth for StdoutTerminal {
    fn columns(&self) -> Option<usize> {
        console::Term::stdout()
            .size_checked()
            .map(|(_rows, columns)| usize::from(columns))
            .filter(|&columns| columns > 0)
    }
}

/// A fixed width, or no width at all. Used where no real terminal exists.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidth(pub Option<usize>);

impl TerminalWidth for FixedWidth {
    fn columns(&self) -> Option<usize> {
        self.0
    }
}

/// Returns `true` if standard output is an interactive terminal.
pub fn stdout_is_interactive() -> bool {
    std::io::stdout().is_terminal()
}
