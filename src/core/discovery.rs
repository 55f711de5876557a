//! # Test Discovery Module / 测试发现模块
//!
//! Walks a root directory recursively and collects every driver file into a
//! deterministic, fully ordered list of test cases.
//!
//! 递归遍历根目录，将所有驱动文件收集为确定且全序的测试用例列表。

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::{DriverPattern, TestCase};
use crate::infra::t;

/// Discovers all test cases below `root`.
///
/// The result is ordered by `(parent directory name, file name)`, independent
/// of the order the file system yields entries in. Full paths break the
/// remaining ties so the order is total.
///
/// An unreadable or missing root, or any unreadable directory below it,
/// fails the whole discovery; partial results are never returned.
///
/// 发现 `root` 下的所有测试用例。结果按 `(父目录名, 文件名)` 排序，与文件系统
/// 返回条目的顺序无关；剩余并列情况由完整路径决定，从而保证全序。
/// 根目录不存在或不可读、或其下任一目录不可读，都会使整个发现过程失败，
/// 不会返回部分结果。
pub fn discover_tests(root: &Path, pattern: &DriverPattern) -> Result<Vec<TestCase>> {
    if !root.is_dir() {
        anyhow::bail!(t!("discovery.root_missing", path = root.display()).to_string());
    }

    let mut drivers = Vec::new();
    collect_drivers(root, pattern, &mut drivers)?;
    drivers.sort_by(|a, b| discovery_order(a, b));

    tracing::debug!(root = %root.display(), count = drivers.len(), "discovered test drivers");

    Ok(drivers
        .into_iter()
        .map(|driver| TestCase::from_driver(driver, pattern))
        .collect())
}

fn collect_drivers(dir: &Path, pattern: &DriverPattern, drivers: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| t!("discovery.read_dir_failed", path = dir.display()).to_string())?;

    for entry in entries {
        let entry = entry
            .with_context(|| t!("discovery.read_dir_failed", path = dir.display()).to_string())?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| t!("discovery.read_dir_failed", path = path.display()).to_string())?;

        if file_type.is_dir() {
            collect_drivers(&path, pattern, drivers)?;
        } else if pattern.matches(&path) {
            drivers.push(path);
        }
    }
    Ok(())
}

/// The canonical ordering of driver paths.
pub fn discovery_order(a: &Path, b: &Path) -> Ordering {
    fn key(path: &Path) -> (&OsStr, &OsStr) {
        let parent = path
            .parent()
            .and_then(Path::file_name)
            .unwrap_or_default();
        let file = path.file_name().unwrap_or_default();
        (parent, file)
    }

    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}
