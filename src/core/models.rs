//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures that flow through a run:
//! the discovered `TestCase`, the `Outcome` of executing it, and the
//! `RunState` counters owned by the single result consumer.
//!
//! 此模块定义了一次运行中流转的核心数据结构：
//! 发现的 `TestCase`、执行后的 `Outcome`，以及由唯一结果消费者持有的 `RunState` 计数器。

use std::fmt;
use std::path::{Path, PathBuf};

/// The file-name pattern a driver must match to be discovered.
/// A driver is `<stem><suffix>.<extension>`, e.g. `example_driver.c`.
///
/// 驱动文件需要匹配的文件名模式。
/// 驱动文件形如 `<stem><suffix>.<extension>`，例如 `example_driver.c`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverPattern {
    /// Marker placed before the extension, e.g. `_driver`.
    pub suffix: String,
    /// Extension shared by driver and subject files, without the dot.
    pub extension: String,
}

impl DriverPattern {
    pub fn new(suffix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            extension: extension.into(),
        }
    }

    /// Returns `true` if `path` names a driver file. A file named exactly
    /// `<suffix>.<extension>` counts, with an empty subject stem.
    pub fn matches(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension);
        let stem_matches = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.ends_with(&self.suffix));
        extension_matches && stem_matches
    }

    /// Maps a driver file name to its subject file name:
    /// `example_driver.c` becomes `example.c`.
    ///
    /// 将驱动文件名映射为对应的被测文件名：`example_driver.c` 变为 `example.c`。
    pub fn subject_file_name(&self, driver: &Path) -> String {
        let stem = driver
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = stem.strip_suffix(self.suffix.as_str()).unwrap_or(&stem);
        format!("{}.{}", stem, self.extension)
    }
}

impl Default for DriverPattern {
    fn default() -> Self {
        Self::new("_driver", "c")
    }
}

/// One unit of work: a discovered driver file and the subject file it stands for.
/// Immutable once discovered; handed to the executor by value.
///
/// 一个工作单元：发现的驱动文件及其对应的被测文件。
/// 发现后不可变；按值交给执行器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Absolute path of the driver file.
    /// 驱动文件的绝对路径。
    pub driver: PathBuf,
    /// Path of the subject file, in the driver's directory.
    /// 被测文件的路径，位于驱动文件所在目录。
    pub subject: PathBuf,
}

impl TestCase {
    pub fn from_driver(driver: PathBuf, pattern: &DriverPattern) -> Self {
        let subject_name = pattern.subject_file_name(&driver);
        let subject = driver.with_file_name(subject_name);
        Self { driver, subject }
    }

    /// The name reported for this case: the subject path relative to `project_root`.
    /// Falls back to the full subject path when it lives outside the project.
    ///
    /// 报告中使用的名称：被测文件相对于 `project_root` 的路径。
    pub fn name(&self, project_root: &Path) -> String {
        self.subject
            .strip_prefix(project_root)
            .unwrap_or(&self.subject)
            .display()
            .to_string()
    }
}

/// The result of running one test case.
/// `diagnostic` is present if and only if the test failed.
///
/// 运行单个测试用例的结果。当且仅当测试失败时 `diagnostic` 才存在。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub name: String,
    pub passed: bool,
    pub diagnostic: Option<String>,
}

impl Outcome {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            diagnostic: None,
        }
    }

    pub fn fail(name: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// Running counters for a whole run.
///
/// Only the single outcome consumer mutates this value; workers never touch it.
/// Invariant: `passed + failed <= total`, with equality once the run completes.
///
/// 整个运行的计数器。只有唯一的结果消费者会修改它，工作线程从不触碰。
/// 不变量：`passed + failed <= total`，运行结束时两者相等。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &Outcome) {
        debug_assert!(
            self.passed + self.failed < self.total,
            "more outcomes recorded than tests discovered"
        );
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.passed + self.failed)
    }

    pub fn is_complete(&self) -> bool {
        self.passed + self.failed == self.total
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.passed, self.failed, self.remaining())
    }
}
