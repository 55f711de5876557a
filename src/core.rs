//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Better Testing:
//! data models, configuration, test discovery, single-test execution
//! and the sequential/concurrent scheduler.
//!
//! 此模块包含 Better Testing 的核心功能：
//! 数据模型、配置、测试发现、单个测试执行以及顺序/并发调度器。

pub mod config;
pub mod discovery;
pub mod execution;
pub mod models;
pub mod scheduler;

// Re-exports
pub use config::RunnerConfig;
pub use execution::run_test_case;
pub use models::{Outcome, RunState, TestCase};
pub use scheduler::{OutcomeSink, Schedule};
