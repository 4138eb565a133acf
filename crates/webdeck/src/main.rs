// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webdeck - a pluggable administration console.
//!
//! This is the binary entry point. It loads the configuration, starts the
//! console registry and runs one inspection command against it.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use webdeck::commands;
use webdeck::console::Console;
use webdeck_config::WebdeckConfig;
use webdeck_core::WebdeckError;

/// Webdeck - a pluggable administration console.
#[derive(Parser, Debug)]
#[command(name = "webdeck", version, about, long_about = None)]
struct Cli {
    /// Configuration file; replaces the XDG lookup.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the localized navigation label map as JSON.
    Labels {
        /// Locale to render titles in.
        #[arg(long)]
        locale: Option<String>,
        /// Category for plugins that declare none.
        #[arg(long)]
        default_category: Option<String>,
    },
    /// List registered plugins.
    Plugins {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Resolve a plugin by label, or the default plugin.
    Lookup {
        /// Label to resolve; empty resolves the default plugin.
        label: Option<String>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => webdeck_config::load_and_validate_path(path),
        None => webdeck_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            webdeck_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.console.log_level.clone());
    init_tracing(&log_level);

    match run(cli.command, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("webdeck: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Option<Commands>, config: WebdeckConfig) -> Result<ExitCode, WebdeckError> {
    let Some(command) = command else {
        println!("webdeck: use --help for available commands");
        return Ok(ExitCode::SUCCESS);
    };

    let console = Console::start(config)?;
    let mut stdout = std::io::stdout().lock();
    let code = match command {
        Commands::Labels {
            locale,
            default_category,
        } => {
            commands::run_labels(
                &console,
                locale.as_deref(),
                default_category.as_deref(),
                &mut stdout,
            )?;
            ExitCode::SUCCESS
        }
        Commands::Plugins { json, plain } => {
            let use_color = !plain && std::io::stdout().is_terminal();
            commands::run_plugins(&console, json, use_color, &mut stdout)?;
            ExitCode::SUCCESS
        }
        Commands::Lookup { label } => {
            let label = label.filter(|l| !l.is_empty());
            if commands::run_lookup(&console, label.as_deref(), &mut stdout)? {
                ExitCode::SUCCESS
            } else {
                eprintln!("webdeck: no plugin resolves for `{}`", label.unwrap_or_default());
                ExitCode::from(2)
            }
        }
        Commands::Config => {
            commands::run_config(&console, &mut stdout)?;
            ExitCode::SUCCESS
        }
    };
    drop(stdout);
    console.shutdown();
    Ok(code)
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("webdeck={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
