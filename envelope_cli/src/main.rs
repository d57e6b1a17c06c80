//! # Envelope CLI
//!
//! Drives `envelope_core` against `.evp` project files.
//!
//! ## Startup sequence
//!
//! 1. Parse arguments (clap exits on `--help` / `--version`).
//! 2. Install the tracing subscriber.
//! 3. Load configuration (defaults, file, environment).
//! 4. Dispatch to the command handler.
//! 5. Turn a failure into a message and an exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                           |
//! |------|-----------------------------------|
//! |  0   | Success                           |
//! |  1   | Internal / unexpected error       |
//! |  2   | Invalid input or selection        |
//! |  3   | Project file problem (I/O, lock)  |
//! |  4   | Configuration error               |
//! |  5   | Update refused by the store       |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use envelope_core::errors::{EnvelopeError, ErrorKind};

use crate::cli::{Cli, Commands, ElementCommand, LayerCommand, OutputFormat};
use crate::commands::Output;
use crate::config::AppConfig;
use crate::logging::init_logging;

mod cli;
mod commands;
mod config;
mod logging;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("{e}");
        return ExitCode::from(1);
    }
    debug!(verbose = cli.global.verbose, quiet = cli.global.quiet, "envelope started");

    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e:#}");
            eprintln!("Configuration error: {e:#}");
            return ExitCode::from(4);
        }
    };

    let format = cli.global.format;
    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => handle_error(e, format),
    }
}

fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let out = Output::new(cli.global.format);
    match cli.command {
        Commands::Init(args) => commands::init(args, config, &out),
        Commands::Catalog(args) => commands::catalog(args, config, &out),
        Commands::Element(ElementCommand::Add(args)) => commands::element_add(args, config, &out),
        Commands::Layer(command) => match command {
            LayerCommand::Add(args) => commands::layer_add(args, config, &out),
            LayerCommand::Edit(args) => commands::layer_edit(args, config, &out),
            LayerCommand::Move(args) => commands::layer_move(args, config, &out),
            LayerCommand::Delete(args) => commands::layer_delete(args, config, &out),
            LayerCommand::List(args) => commands::layer_list(args, config, &out),
        },
        Commands::Check(args) => commands::check(args, &out),
        Commands::Demo => commands::demo(&out),
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.chain().find_map(|cause| cause.downcast_ref::<EnvelopeError>()) {
        Some(core) => match core.kind() {
            ErrorKind::Validation => 2,
            ErrorKind::Storage => 3,
            ErrorKind::Persistence => 5,
            ErrorKind::Internal => 1,
        },
        None => 1,
    }
}

fn handle_error(err: anyhow::Error, format: OutputFormat) -> ExitCode {
    error!("{err:#}");
    let core = err.chain().find_map(|cause| cause.downcast_ref::<EnvelopeError>());
    match (format, core) {
        (OutputFormat::Json, Some(core)) => match serde_json::to_string_pretty(core) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("Error: {err:#}"),
        },
        _ => {
            eprintln!("Error: {err:#}");
            if let Some(core) = core.filter(|c| c.is_recoverable()) {
                eprintln!("  ({} - try again)", core.error_code());
            }
        }
    }
    ExitCode::from(exit_code(&err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let validation = anyhow::Error::from(EnvelopeError::missing_field("maker"));
        assert_eq!(exit_code(&validation), 2);

        let refused = anyhow::Error::from(EnvelopeError::persistence_failed("no")).context("saving layer");
        assert_eq!(exit_code(&refused), 5);

        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
    }

    #[test]
    fn test_parse_layer_move() {
        let cli = Cli::try_parse_from([
            "envelope",
            "layer",
            "move",
            "house.evp",
            "--element",
            "5f0c6a4e-8a8b-4f6e-9b0e-0c7a3b2d1e4f",
            "--from",
            "2",
            "--to",
            "9",
        ])
        .unwrap();
        match cli.command {
            Commands::Layer(LayerCommand::Move(args)) => {
                assert_eq!(args.page, 1);
                assert_eq!((args.from, args.to), (2, 9));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
