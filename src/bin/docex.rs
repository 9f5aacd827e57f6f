//! Command-line interface for docex
//!
//! Finds the examples in a tree of documentation files, evaluates them and reports the
//! outcome of each one.
//!
//! Usage:
//!   docex [PATH] [--pattern GLOB] [--file NAME]... [--exclude GLOB]...
//!         [--config FILE] [--format text|json]
//!   docex --list-evaluators
//!
//! Exit status is 0 when every example passed, 1 when any example failed or errored,
//! and 2 when the run could not start (bad configuration, unreadable files, regions
//! that overlap).

use clap::{Arg, ArgAction, ArgMatches, Command};
use docex::config::{ConfigError, DocexConfig, Loader, OutputFormat};
use docex::evaluator::registry::BUILTINS;
use docex::{EvaluatorRegistry, Runner};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    if matches.get_flag("list-evaluators") {
        handle_list_evaluators_command();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    handle_run_command(&config)
}

fn cli() -> Command {
    Command::new("docex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Check the examples embedded in documentation")
        .arg(
            Arg::new("path")
                .help("Root directory to search (defaults to the configured path)")
                .index(1),
        )
        .arg(
            Arg::new("pattern")
                .long("pattern")
                .short('p')
                .help("Glob matched against file names, e.g. '*.md'"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .help("Check only this file, relative to the root (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .help("Leave out files matching this glob (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration layered over the defaults and docex.toml"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Report format")
                .value_parser(["text", "json"]),
        )
        .arg(
            Arg::new("list-evaluators")
                .long("list-evaluators")
                .help("List the built-in evaluators and the languages they handle")
                .action(ArgAction::SetTrue),
        )
}

/// Defaults, then the root's `docex.toml`, then `--config`, then command-line flags
fn load_config(matches: &ArgMatches) -> Result<DocexConfig, ConfigError> {
    let root = matches.get_one::<String>("path").map_or(".", String::as_str);
    let mut loader = Loader::new().with_project_file(root);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(path) = matches.get_one::<String>("path") {
        loader = loader.set_override("discovery.path", path.as_str())?;
    }
    if let Some(pattern) = matches.get_one::<String>("pattern") {
        loader = loader.set_override("discovery.pattern", pattern.as_str())?;
    }
    if let Some(files) = matches.get_many::<String>("file") {
        loader = loader.set_override("discovery.filenames", files.cloned().collect::<Vec<_>>())?;
    }
    if let Some(excludes) = matches.get_many::<String>("exclude") {
        loader = loader.set_override("discovery.excludes", excludes.cloned().collect::<Vec<_>>())?;
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    loader.build()
}

fn handle_run_command(config: &DocexConfig) -> ExitCode {
    let orchestrator = match config.orchestrator() {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    let report = match Runner::new(&orchestrator).run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match config.output.format {
        OutputFormat::Text => println!("{}", report.render_text()),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        },
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn handle_list_evaluators_command() {
    println!("Built-in evaluators:\n");
    for name in BUILTINS {
        let languages = EvaluatorRegistry::with_builtins([name])
            .map(|registry| registry.languages().join(", "))
            .unwrap_or_default();
        println!("  {:<6} {}", name, languages);
    }
}
