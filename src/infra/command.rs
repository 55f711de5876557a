//! # Command Execution Module / 命令执行模块
//!
//! Process plumbing shared by the build step and the single-test runner:
//! parsing configured command lines and spawning a child while capturing
//! its combined output.
//!
//! 构建步骤和单测试运行器共享的进程工具：解析配置的命令行，
//! 并在派生子进程的同时捕获其合并输出。

use anyhow::{Context, Result};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::Mutex;

use crate::infra::t;

/// Splits a configured command line into program and arguments.
///
/// Environment variables and `~` are expanded first, then the string is split
/// with shell quoting rules.
///
/// 将配置的命令行拆分为程序与参数。先展开环境变量和 `~`，再按 shell 引号规则拆分。
pub fn parse_command_line(command: &str) -> Result<Vec<String>> {
    let expanded = shellexpand::full(command)
        .with_context(|| t!("command.expand_failed", command = command).to_string())?
        .to_string();

    let parts = shlex::split(&expanded)
        .ok_or_else(|| anyhow::anyhow!(t!("command.parse_failed", command = expanded).to_string()))?;

    if parts.is_empty() {
        anyhow::bail!(t!("command.empty", command = command).to_string());
    }
    Ok(parts)
}

/// Spawns a command and captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<ExitStatus>, String) {
    let mut child = match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        // If spawning fails, return the error and an empty output.
        Err(e) => return (Err(e), String::new()),
    };

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            return (
                Err(std::io::Error::other(t!("command.capture_stdout_failed").to_string())),
                String::new(),
            );
        }
    };
    let stderr = match child.stderr.take() {
        Some(stderr) => stderr,
        None => {
            return (
                Err(std::io::Error::other(t!("command.capture_stderr_failed").to_string())),
                String::new(),
            );
        }
    };

    // Both reader tasks append to the same buffer, one line at a time.
    // 两个读取任务逐行追加到同一个缓冲区。
    let output = Arc::new(Mutex::new(Vec::new()));
    let stdout_handle = tokio::spawn(drain_lines(stdout, Arc::clone(&output)));
    let stderr_handle = tokio::spawn(drain_lines(stderr, Arc::clone(&output)));

    let status = child.wait().await;

    // Wait for both readers so no trailing output is lost.
    // 等待两个读取任务结束，以确保不丢失任何输出。
    if let Err(e) = stdout_handle.await {
        tracing::warn!(error = %e, "failed to join stdout reader");
    }
    if let Err(e) = stderr_handle.await {
        tracing::warn!(error = %e, "failed to join stderr reader");
    }

    let output = String::from_utf8_lossy(&output.lock().await).into_owned();
    (status, output)
}

/// Reads `reader` to end of file, appending each line to `output` as raw
/// bytes. Output that is not valid UTF-8 is kept; the pipe is never closed
/// early, so the child cannot be killed by a broken pipe.
///
/// 读取 `reader` 直到文件末尾，将每一行以原始字节追加到 `output`。
/// 非 UTF-8 输出也会保留；管道不会被提前关闭，因此子进程不会因管道断开而被终止。
async fn drain_lines<R>(reader: R, output: Arc<Mutex<Vec<u8>>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if !line.ends_with(b"\n") {
                    line.push(b'\n');
                }
                output.lock().await.extend_from_slice(&line);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read child output");
                break;
            }
        }
    }
}
