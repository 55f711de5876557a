//! # Commands Module / 命令模块
//!
//! Implementations behind the command-line interface.
//!
//! 命令行接口背后的实现。

pub mod run;
