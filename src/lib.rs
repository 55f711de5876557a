//! # Better Testing Library / Better Testing 库
//!
//! This library provides the core functionality for the `better-testing` tool,
//! a test-harness orchestrator that discovers driver files, runs each one as an
//! isolated process and aggregates the outcomes into a live display and a
//! JUnit report.
//!
//! 此库为 `better-testing` 工具提供核心功能，
//! 这是一个测试编排器：发现驱动文件，将每个文件作为独立进程运行，
//! 并将结果汇总到实时进度显示和 JUnit 报告中。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, configuration, discovery, execution and scheduling
//! - `infra` - Infrastructure services like process spawning, file system and terminal queries
//! - `reporting` - Progress display, JUnit report writer and console summary
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 数据模型、配置、发现、执行与调度
//! - `infra` - 基础设施服务，如进程派生、文件系统和终端查询
//! - `reporting` - 进度显示、JUnit 报告写入器和控制台摘要
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::models;

/// Initializes the application's internationalization (i18n).
///
/// An explicitly requested language wins. Otherwise the system locale is
/// detected and matched first as a full locale (e.g. "zh-CN"), then by its
/// language part (e.g. "en" from "en-US"), and finally falls back to "en".
pub fn init_locale(requested: Option<&str>) {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        locale.as_str()
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
