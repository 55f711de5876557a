//! # CLI Module / 命令行模块
//!
//! Builds the command-line interface and dispatches to the run command.
//!
//! 构建命令行接口并分派到运行命令。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::env;
use std::path::PathBuf;

use crate::infra::t;

/// Everything the run command needs from the command line.
/// 运行命令从命令行获取的全部参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Root searched for drivers; the configured test directory when absent.
    pub dir: Option<PathBuf>,
    /// Run tests on a worker pool instead of one after another.
    pub multithreading: bool,
    /// Log one entry per test instead of the in-place display.
    pub verbose: bool,
    /// Worker pool size, overriding the configuration.
    pub jobs: Option<usize>,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
    /// Root of the project under test.
    pub project_dir: PathBuf,
    /// Explicit UI language.
    pub lang: Option<String>,
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built, so the
/// help text is already localized. It looks for `--lang <VALUE>`.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
}

pub fn build_cli() -> Command {
    Command::new("better-testing")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .arg(
            Arg::new("dir")
                .help(t!("cli.arg_dir").to_string())
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("multithreading")
                .short('m')
                .long("multithreading")
                .help(t!("cli.arg_multithreading").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli.arg_verbose").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help(t!("cli.arg_jobs").to_string())
                .value_name("JOBS")
                .value_parser(clap::value_parser!(usize))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("cli.arg_config").to_string())
                .value_name("CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("project-dir")
                .long("project-dir")
                .help(t!("cli.arg_project_dir").to_string())
                .value_name("PROJECT_DIR")
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.arg_lang").to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
}

/// Extracts the run arguments from parsed matches.
pub fn run_args(matches: &ArgMatches) -> RunArgs {
    RunArgs {
        dir: matches.get_one::<PathBuf>("dir").cloned(),
        multithreading: matches.get_flag("multithreading"),
        verbose: matches.get_flag("verbose"),
        jobs: matches.get_one::<usize>("jobs").copied(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        project_dir: matches
            .get_one::<PathBuf>("project-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        lang: matches.get_one::<String>("lang").cloned(),
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    crate::init_locale(pre_parse_language().as_deref());

    let matches = build_cli().get_matches();
    commands::run::execute(run_args(&matches)).await
}
