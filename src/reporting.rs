//! # Reporting Module / 报告模块
//!
//! This module turns the stream of outcomes into everything a user or a CI
//! system sees: the live progress display, the JUnit report and the final
//! console summary.
//!
//! 此模块将结果流转换为用户或 CI 系统看到的一切：实时进度显示、
//! JUnit 报告以及最终的控制台摘要。

pub mod collector;
pub mod console;
pub mod junit;
pub mod progress;

// Re-export common reporting items
pub use collector::OutcomeCollector;
pub use console::{format_summary, print_summary};
pub use junit::JUnitReport;
pub use progress::ProgressReporter;
