//! # Configuration Module / 配置模块
//!
//! This module handles loading the runner configuration from a TOML file.
//! Every key is optional; a project without a config file runs with the
//! defaults of a classic `compiler_tests/` + `bin/` layout.
//!
//! 此模块负责从 TOML 文件加载运行器配置。
//! 每个键都是可选的；没有配置文件的项目将使用经典的 `compiler_tests/` + `bin/` 布局默认值。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::DriverPattern;
use crate::infra::t;

/// File name looked up in the project root when no `--config` is given.
/// 未提供 `--config` 时在项目根目录中查找的文件名。
pub const DEFAULT_CONFIG_FILE: &str = "BetterTesting.toml";

/// The runner configuration, loaded from a TOML file.
/// 从 TOML 文件加载的运行器配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Falls back to the system locale when unset.
    /// 运行器输出消息的语言（例如 "en", "zh-CN"），未设置时使用系统语言。
    pub language: Option<String>,

    /// Root searched for driver files when no `dir` argument is given.
    /// Relative paths are resolved against the project root.
    /// 未提供 `dir` 参数时搜索驱动文件的根目录，相对路径基于项目根目录解析。
    pub test_dir: PathBuf,

    /// Working directory cleared and recreated at the start of every run.
    /// 每次运行开始时清空并重建的工作目录。
    pub output_dir: PathBuf,

    /// Where the JUnit report document is written.
    /// JUnit 报告文档的写入位置。
    pub report_path: PathBuf,

    /// The `name` attribute of the report's `<testsuite>` element.
    pub suite_name: String,

    /// Command that builds the artifact under test. Must exit with status zero
    /// before any test runs. `None` or an empty string skips the step.
    /// 构建被测产物的命令。必须在任何测试运行前以零状态退出。`None` 或空字符串表示跳过。
    pub build_command: Option<String>,

    /// Command that runs one test; the driver path is appended as its last argument.
    /// 运行单个测试的命令；驱动文件路径作为最后一个参数追加。
    pub test_command: String,

    /// Marker before the extension that identifies a driver file.
    pub driver_suffix: String,

    /// Extension of driver and subject files, without the dot.
    pub source_extension: String,

    /// Worker pool size for concurrent mode. Defaults to the available parallelism.
    /// 并发模式下的工作池大小，默认为可用的硬件并行度。
    pub jobs: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            language: None,
            test_dir: PathBuf::from("compiler_tests"),
            output_dir: PathBuf::from("bin/output"),
            report_path: PathBuf::from("bin/junit_results.xml"),
            suite_name: "Integration test".to_string(),
            build_command: Some("make -C . bin/c_compiler".to_string()),
            test_command: "scripts/test_single.sh".to_string(),
            driver_suffix: "_driver".to_string(),
            source_extension: "c".to_string(),
            jobs: None,
        }
    }
}

impl RunnerConfig {
    pub fn driver_pattern(&self) -> DriverPattern {
        DriverPattern::new(&self.driver_suffix, &self.source_extension)
    }

    /// The build command, or `None` when the step is disabled.
    pub fn build_command(&self) -> Option<&str> {
        self.build_command
            .as_deref()
            .map(str::trim)
            .filter(|command| !command.is_empty())
    }

    pub fn output_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.output_dir)
    }

    pub fn report_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.report_path)
    }

    pub fn test_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.test_dir)
    }
}

/// Parses a runner configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RunnerConfig> {
    let config: RunnerConfig =
        toml::from_str(content).with_context(|| t!("config.parse_failed").to_string())?;
    Ok(config)
}

/// Loads the configuration for a run.
///
/// An explicit path must exist and parse. Without one, `BetterTesting.toml`
/// in the project root is used if present, otherwise the defaults apply.
///
/// 加载一次运行的配置。显式指定的路径必须存在且可解析；否则若项目根目录下存在
/// `BetterTesting.toml` 则使用它，不存在时使用默认配置。
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<RunnerConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = project_root.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "no config file, using defaults");
                return Ok(RunnerConfig::default());
            }
            candidate
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
    parse_config(&content).with_context(|| path.display().to_string())
}
