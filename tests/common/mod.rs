// Shared test helpers for integration tests
#![allow(dead_code)]

use better_testing::core::execution::{ProcessReport, TestRunner};
use better_testing::core::models::{DriverPattern, TestCase};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::{TempDir, tempdir};

/// What the fake single-test command does for a given driver.
#[derive(Debug, Clone)]
pub enum FakeBehavior {
    Pass,
    Fail(String),
    /// Terminated by a signal: no exit code at all.
    Killed(String),
    /// The command could not be started.
    SpawnError(String),
}

/// A `TestRunner` that never spawns a process.
///
/// Behaviors are keyed by driver file name; unknown drivers pass. It also
/// records how many calls were in flight at once.
#[derive(Default)]
pub struct FakeRunner {
    behaviors: HashMap<String, FakeBehavior>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, driver_file: &str, behavior: FakeBehavior) -> Self {
        self.behaviors.insert(driver_file.to_string(), behavior);
        self
    }

    /// Every call sleeps, for a length that varies with the driver name so
    /// completion order differs from dispatch order.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl TestRunner for FakeRunner {
    fn run<'a>(&'a self, driver: &'a Path) -> BoxFuture<'a, anyhow::Result<ProcessReport>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let file_name = driver
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            if let Some(delay) = self.delay {
                let jitter = (file_name.bytes().map(u32::from).sum::<u32>() % 7) + 1;
                tokio::time::sleep(delay * jitter).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.behaviors.get(&file_name).cloned().unwrap_or(FakeBehavior::Pass) {
                FakeBehavior::Pass => Ok(ProcessReport {
                    exit_code: Some(0),
                    output: "all good\n".to_string(),
                }),
                FakeBehavior::Fail(output) => Ok(ProcessReport {
                    exit_code: Some(1),
                    output,
                }),
                FakeBehavior::Killed(output) => Ok(ProcessReport {
                    exit_code: None,
                    output,
                }),
                FakeBehavior::SpawnError(message) => Err(anyhow::anyhow!(message)),
            }
        }
        .boxed()
    }
}

/// Builds `TestCase`s below a fake project root without touching the disk.
pub fn cases_under(project_root: &Path, drivers: &[&str]) -> Vec<TestCase> {
    let pattern = DriverPattern::default();
    drivers
        .iter()
        .map(|driver| TestCase::from_driver(project_root.join(driver), &pattern))
        .collect()
}

/// Creates empty files (and their directories) below `root`.
pub fn touch_files(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
    }
}

/// A project the real binary can run against.
///
/// Each driver is a file whose content decides the result: a driver
/// containing `FAIL` makes the single-test script print a diagnostic and
/// exit 1. The script also leaves a marker in the output directory so tests
/// can tell whether anything was executed.
pub struct SampleProject {
    pub dir: TempDir,
}

impl SampleProject {
    pub fn new(build_command: &str) -> Self {
        let dir = tempdir().expect("Failed to create temporary directory");
        let root = dir.path();

        let script = r#"#!/bin/sh
name=$(basename "$1")
touch "bin/output/ran_$name"
if grep -q FAIL "$1"; then
    echo "assertion failed in $1: expected <0> & got \"1\""
    echo "stderr line" >&2
    exit 1
fi
exit 0
"#;
        fs::write(root.join("run_one.sh"), script).expect("Failed to write run_one.sh");

        let config = format!(
            r#"language = "en"
test_dir = "compiler_tests"
build_command = "{build_command}"
test_command = "sh run_one.sh"
"#
        );
        fs::write(root.join("BetterTesting.toml"), config).expect("Failed to write config");
        fs::create_dir_all(root.join("compiler_tests")).unwrap();

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_driver(&self, relative: &str, fails: bool) -> PathBuf {
        let path = self.root().join("compiler_tests").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, if fails { "FAIL\n" } else { "ok\n" }).unwrap();
        path
    }

    pub fn report_path(&self) -> PathBuf {
        self.root().join("bin/junit_results.xml")
    }

    pub fn report(&self) -> String {
        fs::read_to_string(self.report_path()).expect("report should exist")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("bin/output")
    }
}

/// The `name` attributes of all `<testcase>` records, in document order.
pub fn testcase_names(report: &str) -> Vec<String> {
    report
        .lines()
        .filter_map(|line| line.strip_prefix("<testcase name=\""))
        .filter_map(|rest| rest.split('"').next())
        .map(unescape_xml)
        .collect()
}

/// Checks the structural shape of a report: one declaration, the root
/// opened once at the top and closed once at the very end, and balanced
/// `<testcase>` elements in between. Returns the number of records.
pub fn assert_well_formed(report: &str) -> usize {
    assert!(
        report.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name="),
        "bad header: {report}"
    );
    assert!(report.ends_with("</testsuite>\n"), "missing close: {report}");
    assert_eq!(report.matches("<testsuite").count(), 1);
    assert_eq!(report.matches("</testsuite>").count(), 1);

    let opened = report.matches("<testcase ").count();
    let self_closed = report.matches("\"/>").count();
    let closed = report.matches("</testcase>").count();
    assert_eq!(opened, self_closed + closed, "unbalanced testcases: {report}");
    assert_eq!(
        report.matches("<error ").count(),
        report.matches("</error>").count()
    );
    opened
}

/// Inverse of the report's escaping for the five reserved characters.
pub fn unescape_xml(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
