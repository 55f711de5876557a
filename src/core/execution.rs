//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module runs a single test case through the external single-test
//! command and turns its exit status and output into an `Outcome`. It also
//! runs the prerequisite build step.
//!
//! Nothing here touches shared state; `run_test_case` may be called from any
//! number of workers at once.
//!
//! 此模块通过外部单测试命令运行单个测试用例，并将其退出状态和输出转换为 `Outcome`，
//! 同时负责运行前置构建步骤。这里不涉及任何共享状态，`run_test_case` 可被任意多个
//! 工作任务同时调用。

use anyhow::{Context, Result};
use colored::*;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::{
    core::models::{Outcome, TestCase},
    infra::{command, fs::relative_to, t},
};

/// What the single-test command reported for one driver.
/// 单测试命令针对某个驱动文件报告的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    /// The exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr.
    pub output: String,
}

impl ProcessReport {
    /// A test passes if and only if the exit code is exactly zero.
    pub fn passed(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs one driver and reports its exit status and output.
///
/// This is the only seam between the engine and the external single-test
/// command; tests substitute a fake that never spawns a process.
///
/// 运行一个驱动文件并报告其退出状态和输出。
/// 这是引擎与外部单测试命令之间唯一的接缝；测试中可替换为不派生进程的假实现。
pub trait TestRunner: Send + Sync {
    fn run<'a>(&'a self, driver: &'a Path) -> BoxFuture<'a, Result<ProcessReport>>;
}

/// Runs the configured single-test command as a child process, with the
/// driver path (relative to the project root) appended as the last argument.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    program: String,
    args: Vec<String>,
    project_root: PathBuf,
}

impl ScriptRunner {
    pub fn new(command_line: &str, project_root: PathBuf) -> Result<Self> {
        let mut parts = command::parse_command_line(command_line)?;
        let program = parts.remove(0);
        Ok(Self {
            program,
            args: parts,
            project_root,
        })
    }
}

impl TestRunner for ScriptRunner {
    fn run<'a>(&'a self, driver: &'a Path) -> BoxFuture<'a, Result<ProcessReport>> {
        async move {
            let mut cmd = tokio::process::Command::new(&self.program);
            cmd.args(&self.args)
                .arg(relative_to(driver, &self.project_root))
                .current_dir(&self.project_root)
                .kill_on_drop(true);

            let (status_res, output) = command::spawn_and_capture(cmd).await;
            let status = status_res.with_context(|| {
                t!("run.spawn_failed", command = &self.program).to_string()
            })?;

            Ok(ProcessReport {
                exit_code: status.code(),
                output,
            })
        }
        .boxed()
    }
}

/// Runs a single test case and produces exactly one `Outcome`.
///
/// A failure to run the command at all is reported as a failing outcome
/// carrying the error text; it never aborts the run.
///
/// 运行单个测试用例并产生恰好一个 `Outcome`。无法运行命令本身也会被报告为
/// 携带错误文本的失败结果，永远不会中止整个运行。
pub async fn run_test_case(case: TestCase, runner: &dyn TestRunner, project_root: &Path) -> Outcome {
    let name = case.name(project_root);
    let start_time = Instant::now();
    tracing::debug!(test = %name, driver = %case.driver.display(), "dispatching test");

    let outcome = match runner.run(&case.driver).await {
        Ok(report) if report.passed() => Outcome::pass(name),
        Ok(report) => Outcome::fail(name, report.output),
        Err(e) => Outcome::fail(name, format!("{e:#}")),
    };

    tracing::debug!(
        test = %outcome.name,
        passed = outcome.passed,
        elapsed = ?start_time.elapsed(),
        "test finished"
    );
    outcome
}

/// Runs the prerequisite build command in `project_root`.
///
/// Any failure (the command cannot be parsed or spawned, or exits with a
/// non-zero status) is returned as an error and must abort the run before
/// any test executes.
///
/// 在 `project_root` 中运行前置构建命令。任何失败（命令无法解析或派生，或以非零
/// 状态退出）都会作为错误返回，调用方必须在任何测试执行前中止运行。
pub async fn run_build_step(command_line: &str, project_root: &Path) -> Result<()> {
    let parts = command::parse_command_line(command_line)?;
    let (program, args) = parts
        .split_first()
        .ok_or_else(|| anyhow::anyhow!(t!("command.empty", command = command_line).to_string()))?;

    println!("{}", t!("run.building", command = command_line).blue());
    let build_start_time = Instant::now();

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args).current_dir(project_root).kill_on_drop(true);

    let (status_res, output) = command::spawn_and_capture(cmd).await;
    let status = status_res
        .with_context(|| t!("run.spawn_failed", command = program).to_string())?;
    let build_duration = build_start_time.elapsed();

    if !status.success() {
        if !output.trim().is_empty() {
            eprintln!("{}", output.trim_end());
        }
        anyhow::bail!(
            t!(
                "run.build_failed",
                command = command_line,
                status = status
            )
            .to_string()
        );
    }

    println!(
        "{}",
        t!(
            "run.build_success",
            duration = format!("{:.2}", build_duration.as_secs_f64())
        )
        .green()
    );
    Ok(())
}
