//! # Console Reporting Module / 控制台报告模块
//!
//! The one-line summary printed once a run completes.
//!
//! 运行完成后打印的单行摘要。

use colored::*;

use crate::core::models::RunState;
use crate::infra::t;

/// Formats the final summary, e.g. `2 Passed, 1 Failed, 3 Total`.
pub fn format_summary(state: &RunState) -> String {
    t!(
        "summary.counts",
        passed = state.passed,
        failed = state.failed,
        total = state.total
    )
    .to_string()
}

/// Prints the final summary line after the progress display.
///
/// 在进度显示之后打印最终摘要行。
pub fn print_summary(state: &RunState) {
    let banner = t!("summary.banner");
    let counts = format_summary(state);
    let counts = if state.failed == 0 {
        counts.green()
    } else {
        counts.red()
    };
    println!("\n{} {}", banner.bold(), counts);
}
