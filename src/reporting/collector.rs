//! # Outcome Collector Module / 结果收集器模块
//!
//! The one place outcomes are consumed. It owns both shared resources of a
//! run, the progress counters and the JUnit report, so every update to them
//! goes through a single `&mut` path.
//!
//! 结果被消费的唯一位置。它同时持有一次运行中的两个共享资源：进度计数器和 JUnit 报告，
//! 因此对它们的每次更新都经过同一条 `&mut` 路径。

use anyhow::{Context, Result};
use std::io::Write;

use crate::core::models::{Outcome, RunState};
use crate::core::scheduler::OutcomeSink;
use crate::infra::t;
use crate::reporting::junit::JUnitReport;
use crate::reporting::progress::ProgressReporter;

pub struct OutcomeCollector<W: Write> {
    progress: ProgressReporter<W>,
    report: JUnitReport,
}

impl<W: Write> OutcomeCollector<W> {
    pub fn new(progress: ProgressReporter<W>, report: JUnitReport) -> Self {
        Self { progress, report }
    }

    pub fn state(&self) -> &RunState {
        self.progress.state()
    }

    /// Closes the report and returns the final counters.
    pub fn finish(self) -> Result<RunState> {
        let (state, _out) = self.progress.into_parts();
        self.report.finish()?;
        Ok(state)
    }
}

impl<W: Write> OutcomeSink for OutcomeCollector<W> {
    fn accept(&mut self, outcome: Outcome) -> Result<()> {
        self.report.append(&outcome)?;
        self.progress
            .record(&outcome)
            .with_context(|| t!("progress.write_failed").to_string())
    }
}
