//! # JUnit Report Module / JUnit 报告模块
//!
//! Writes the JUnit XML document incrementally, one `<testcase>` per outcome.
//! The writer is a scoped guard: the root element is opened on creation and
//! closed exactly once, either by `finish` or, on any early exit, by `Drop`.
//!
//! 以增量方式写入 JUnit XML 文档，每个结果一个 `<testcase>`。
//! 写入器是一个作用域守卫：创建时打开根元素，并且恰好关闭一次，
//! 要么通过 `finish`，要么在任何提前退出时通过 `Drop`。

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::models::Outcome;
use crate::infra::t;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const SUITE_CLOSE: &str = "</testsuite>\n";

/// An open JUnit report.
///
/// Records go straight to the file without user-space buffering and are
/// flushed on every append, so a crash loses at most the record in progress.
///
/// 一个已打开的 JUnit 报告。记录不经用户态缓冲直接写入文件，并在每次追加后刷新，
/// 因此崩溃时最多丢失正在写入的那条记录。
#[derive(Debug)]
pub struct JUnitReport {
    file: Option<File>,
    path: PathBuf,
    records: usize,
}

impl JUnitReport {
    /// Creates (or truncates) the report at `path` and opens the root element.
    /// Missing parent directories are created.
    ///
    /// 在 `path` 处创建（或截断）报告并打开根元素，会自动创建缺失的父目录。
    pub fn create(path: &Path, suite_name: &str) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                t!("report.create_failed", path = path.display()).to_string()
            })?;
        }

        let mut file = File::create(path)
            .with_context(|| t!("report.create_failed", path = path.display()).to_string())?;
        let header = format!(
            "{XML_DECLARATION}<testsuite name=\"{}\">\n",
            escape_xml(suite_name)
        );
        file.write_all(header.as_bytes())
            .and_then(|()| file.flush())
            .with_context(|| t!("report.write_failed", path = path.display()).to_string())?;

        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
            records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of `<testcase>` records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Appends the record for one outcome and flushes it.
    pub fn append(&mut self, outcome: &Outcome) -> Result<()> {
        let record = format_record(outcome);
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!(t!("report.closed", path = self.path.display()).to_string()))?;

        file.write_all(record.as_bytes())
            .and_then(|()| file.flush())
            .with_context(|| t!("report.write_failed", path = self.path.display()).to_string())?;
        self.records += 1;
        Ok(())
    }

    /// Closes the root element and the file, reporting any error.
    pub fn finish(mut self) -> Result<()> {
        self.close()
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        file.write_all(SUITE_CLOSE.as_bytes())
            .and_then(|()| file.sync_all())
            .with_context(|| t!("report.write_failed", path = self.path.display()).to_string())
    }
}

impl Drop for JUnitReport {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!(error = %format!("{e:#}"), "failed to close JUnit report");
        }
    }
}

/// Serializes one outcome as a `<testcase>` element.
///
/// A pass is a bare element carrying only the name. A failure embeds the
/// diagnostic text in an `<error>` child, with its first line as the message.
///
/// 将一个结果序列化为 `<testcase>` 元素。通过时只包含名称；失败时在 `<error>`
/// 子元素中嵌入诊断文本，并以其第一行作为 message。
pub fn format_record(outcome: &Outcome) -> String {
    let name = escape_xml(&outcome.name);
    if outcome.passed {
        return format!("<testcase name=\"{name}\"/>\n");
    }

    let diagnostic = outcome.diagnostic.as_deref().unwrap_or_default();
    let message = diagnostic
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("test failed");

    format!(
        "<testcase name=\"{name}\">\n<error type=\"error\" message=\"{}\">{}</error>\n</testcase>\n",
        escape_xml(message),
        escape_xml(diagnostic)
    )
}

/// Escapes text for use in XML content and attribute values.
///
/// Control characters that XML 1.0 cannot represent at all (everything
/// below U+0020 except tab, line feed and carriage return) become U+FFFD.
///
/// 转义文本以用于 XML 内容和属性值。XML 1.0 完全无法表示的控制字符
/// （U+0020 以下除制表符、换行和回车之外的字符）会被替换为 U+FFFD。
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if (c as u32) < 0x20 => escaped.push('\u{FFFD}'),
            c => escaped.push(c),
        }
    }
    escaped
}
