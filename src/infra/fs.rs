//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as resetting the per-run output directory and resolving paths.
//!
//! 此模块提供文件系统操作的实用功能，如重置每次运行的输出目录和解析路径。

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::infra::t;

/// Removes `dir` with everything in it and creates it again, empty.
///
/// A missing directory is not an error. Any other failure to remove or
/// create it is returned, so the caller can abort before tests run.
///
/// 删除 `dir` 及其全部内容并重新创建一个空目录。目录不存在不算错误；
/// 其他删除或创建失败会返回错误，调用方可以在测试运行前中止。
pub fn reset_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| {
                t!("fs.remove_dir_failed", path = dir.display()).to_string()
            });
        }
    }

    fs::create_dir_all(dir)
        .with_context(|| t!("fs.create_dir_failed", path = dir.display()).to_string())
}

/// Gets the absolute path from a potentially relative path.
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path)
        .with_context(|| t!("fs.resolve_failed", path = path.display()).to_string())
}

/// Expresses `path` relative to `base`, or returns it unchanged when it is
/// not below `base`.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}
