//! # Run Command Module / 运行命令模块
//!
//! This module implements the test run: it prepares the output directory,
//! runs the build step, opens the JUnit report, discovers drivers and
//! schedules them, then prints the summary.
//!
//! 此模块实现测试运行：准备输出目录、运行构建步骤、打开 JUnit 报告、
//! 发现驱动文件并调度执行，最后打印摘要。

use anyhow::{Context, Result};
use colored::*;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::{
    cli::RunArgs,
    core::{
        config::{self, RunnerConfig},
        discovery,
        execution::{self, ScriptRunner},
        models::{RunState, TestCase},
        scheduler::{self, Schedule},
    },
    infra::{
        fs, t,
        terminal::{self, StdoutTerminal},
    },
    reporting::{OutcomeCollector, ProgressReporter, console::print_summary, junit::JUnitReport},
};

/// Executes a full run with the provided arguments.
///
/// Returns an error only for fatal setup problems (output directory, build
/// step, report file, discovery). Failing tests are reported, not returned.
///
/// 使用提供的参数执行一次完整运行。只有致命的准备问题（输出目录、构建步骤、
/// 报告文件、测试发现）才会返回错误；失败的测试只会被报告，不会作为错误返回。
pub async fn execute(args: RunArgs) -> Result<()> {
    let project_root = fs::absolute_path(&args.project_dir)?;
    let config = config::load_config(&project_root, args.config.as_deref())?;
    if let (None, Some(language)) = (&args.lang, &config.language) {
        crate::init_locale(Some(language));
    }

    println!(
        "{}",
        t!("run.project_root", path = project_root.display()).cyan()
    );

    let runner = Arc::new(ScriptRunner::new(&config.test_command, project_root.clone())?);
    prepare_environment(&config, &project_root).await?;

    // From here on the report exists; every exit path closes it.
    let report = JUnitReport::create(&config.report_path(&project_root), &config.suite_name)?;

    let test_root = match &args.dir {
        Some(dir) => fs::absolute_path(dir)?,
        None => fs::absolute_path(&config.test_dir(&project_root))?,
    };
    let cases = discovery::discover_tests(&test_root, &config.driver_pattern())
        .with_context(|| t!("run.discovery_failed", path = test_root.display()).to_string())?;

    println!(
        "{}",
        t!("run.discovered", count = cases.len(), path = test_root.display()).cyan()
    );

    let schedule = Schedule::new(args.multithreading, args.jobs.or(config.jobs));
    let interactive = !args.verbose && terminal::stdout_is_interactive();

    let state = run_tests(cases, runner, &project_root, schedule, interactive, report).await?;

    print_summary(&state);
    Ok(())
}

/// Clears the output directory and runs the build step.
///
/// Both are fatal on failure: a stale output directory could mix artifacts
/// from two runs, and nothing can be tested without a successful build.
async fn prepare_environment(config: &RunnerConfig, project_root: &Path) -> Result<()> {
    let output_dir = config.output_dir(project_root);
    fs::reset_dir(&output_dir)
        .with_context(|| t!("run.output_dir_failed", path = output_dir.display()).to_string())?;

    match config.build_command() {
        Some(command) => execution::run_build_step(command, project_root).await,
        None => {
            println!("{}", t!("run.build_skipped").yellow());
            Ok(())
        }
    }
}

/// Schedules the cases and feeds every outcome to the progress display and
/// the report, then closes the report.
async fn run_tests(
    cases: Vec<TestCase>,
    runner: Arc<ScriptRunner>,
    project_root: &Path,
    schedule: Schedule,
    interactive: bool,
    report: JUnitReport,
) -> Result<RunState> {
    let total = cases.len();
    let progress = if interactive {
        ProgressReporter::interactive(total, &StdoutTerminal, io::stdout())
            .with_context(|| t!("progress.write_failed").to_string())?
    } else {
        ProgressReporter::verbose(total, io::stdout())
    };

    let mut collector = OutcomeCollector::new(progress, report);
    scheduler::run_scheduled(cases, runner, project_root, schedule, &mut collector).await?;
    collector.finish()
}
