//! # Scheduler Module / 调度器模块
//!
//! Drives `run_test_case` over the discovered cases, either strictly in order
//! or through a bounded pool of concurrent workers. In both modes every
//! outcome is handed to a single `OutcomeSink`, one at a time, so counters
//! and the report are only ever written by one consumer.
//!
//! 在发现的用例上驱动 `run_test_case`，可以严格顺序执行，也可以通过有界的并发工作池执行。
//! 两种模式下，每个结果都会逐个交给唯一的 `OutcomeSink`，因此计数器和报告只会被一个
//! 消费者写入。

use anyhow::Result;
use futures::{StreamExt, stream};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::{
    execution::{TestRunner, run_test_case},
    models::{Outcome, TestCase},
};

/// How test cases are dispatched. Selected once per run.
/// 测试用例的分发方式，每次运行只选择一次。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// One test at a time, in discovery order.
    Sequential,
    /// Up to `jobs` tests at once; outcomes arrive in completion order.
    Concurrent { jobs: usize },
}

impl Schedule {
    /// Picks the schedule for a run. Concurrent mode uses `jobs` workers when
    /// given, otherwise the available hardware parallelism.
    pub fn new(multithreading: bool, jobs: Option<usize>) -> Self {
        if multithreading {
            Schedule::Concurrent {
                jobs: jobs.unwrap_or_else(num_cpus::get).max(1),
            }
        } else {
            Schedule::Sequential
        }
    }
}

/// The single consumer of outcomes.
///
/// Implementations are called from one task only and never concurrently.
/// 结果的唯一消费者。实现只会在一个任务中被调用，且从不并发调用。
pub trait OutcomeSink {
    fn accept(&mut self, outcome: Outcome) -> Result<()>;
}

impl OutcomeSink for Vec<Outcome> {
    fn accept(&mut self, outcome: Outcome) -> Result<()> {
        self.push(outcome);
        Ok(())
    }
}

/// Runs every case exactly once and forwards each outcome to `sink`.
///
/// In sequential mode outcomes reach the sink in discovery order and the
/// first sink error stops the run. In concurrent mode a sink error stops
/// dispatching new cases, the workers already in flight are allowed to
/// finish, and the error is returned afterwards.
///
/// 运行每个用例恰好一次，并将每个结果转发给 `sink`。
/// 顺序模式下结果按发现顺序到达，第一个 sink 错误会停止运行。
/// 并发模式下 sink 错误会停止分发新用例，已在执行的工作任务会继续完成，随后返回该错误。
pub async fn run_scheduled(
    cases: Vec<TestCase>,
    runner: Arc<dyn TestRunner>,
    project_root: &Path,
    schedule: Schedule,
    sink: &mut dyn OutcomeSink,
) -> Result<()> {
    match schedule {
        Schedule::Sequential => {
            for case in cases {
                let outcome = run_test_case(case, runner.as_ref(), project_root).await;
                sink.accept(outcome)?;
            }
            Ok(())
        }
        Schedule::Concurrent { jobs } => {
            run_concurrent(cases, runner, project_root, jobs.max(1), sink).await
        }
    }
}

async fn run_concurrent(
    cases: Vec<TestCase>,
    runner: Arc<dyn TestRunner>,
    project_root: &Path,
    jobs: usize,
    sink: &mut dyn OutcomeSink,
) -> Result<()> {
    tracing::debug!(jobs, cases = cases.len(), "starting worker pool");

    // Each case is spawned only when `buffer_unordered` pulls it, so at most
    // `jobs` workers exist at a time.
    let stopped = Arc::new(AtomicBool::new(false));
    let mut completions = stream::iter(cases.into_iter().map(|case| {
        let runner = Arc::clone(&runner);
        let stopped = Arc::clone(&stopped);
        let project_root = project_root.to_path_buf();
        let name_for_error = case.name(&project_root);

        async move {
            if stopped.load(Ordering::Acquire) {
                return None;
            }
            let handle = tokio::spawn(async move {
                run_test_case(case, runner.as_ref(), &project_root).await
            });
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(test = %name_for_error, error = %e, "worker task failed");
                    Outcome::fail(name_for_error, format!("worker task failed: {e}"))
                }
            };
            Some(outcome)
        }
    }))
    .buffer_unordered(jobs);

    let mut sink_error = None;
    while let Some(completed) = completions.next().await {
        let Some(outcome) = completed else {
            continue;
        };
        if sink_error.is_some() {
            continue;
        }
        if let Err(e) = sink.accept(outcome) {
            tracing::warn!(error = %e, "outcome sink failed, draining in-flight workers");
            stopped.store(true, Ordering::Release);
            sink_error = Some(e);
        }
    }

    match sink_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
