//! COVER vaccination coverage loader CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use cover_cli::logging::{LogConfig, LogFormat, init_logging};
use cover_cli::summary::{print_summary, summary_json};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_classify, run_ingest_command, run_resolve, run_status, run_vaccines};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Ingest(args) => match run_ingest_command(&args) {
            Ok(summary) => {
                if args.json {
                    match summary_json(&summary) {
                        Ok(json) => println!("{json}"),
                        Err(error) => eprintln!("error: {error}"),
                    }
                } else {
                    print_summary(&summary);
                }
                if summary.is_success() { 0 } else { 1 }
            }
            Err(error) => report(&error),
        },
        Command::Classify(args) => match run_classify(&args) {
            Ok(all_ok) => i32::from(!all_ok),
            Err(error) => report(&error),
        },
        Command::Resolve(args) => match run_resolve(&args) {
            Ok(all_resolved) => i32::from(!all_resolved),
            Err(error) => report(&error),
        },
        Command::Vaccines => {
            run_vaccines();
            0
        }
        Command::Status(args) => match run_status(&args) {
            Ok(()) => 0,
            Err(error) => report(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
