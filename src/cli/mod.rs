//! The Vellum Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, ConfigArgs, VellumArgs};
use crate::config::MacroConfig;
use crate::engine::{Document, Engine};
use crate::errors::{print_error, VellumError};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = VellumArgs::parse();
    init_tracing(args.verbose);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Render { document, config } => handle_render(&document, &config),
        Command::Macros { document } => handle_macros(&document),
    };

    if let Err(e) = result {
        print_error(e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Resolves the effective configuration: file first, then flags.
pub fn resolve_config(args: &ConfigArgs) -> Result<MacroConfig, VellumError> {
    let mut config = match &args.config {
        Some(path) => MacroConfig::load(path)?,
        None => MacroConfig::default(),
    };
    if args.strict {
        config.strict_arguments = true;
    }
    if args.local_scope {
        config.local_context_scope = true;
    }
    if let Some(depth) = args.max_depth {
        config.max_call_depth = depth;
    }
    if let Some(name) = &args.body_reference {
        config.body_reference = name.clone();
    }
    Ok(config)
}

/// Handles the `render` subcommand.
fn handle_render(path: &Path, config: &ConfigArgs) -> Result<(), VellumError> {
    let config = resolve_config(config)?;
    let document = Document::load(path)?;
    let mut engine = Engine::new(config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    engine.render_document(&document, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Handles the `macros` subcommand.
fn handle_macros(path: &Path) -> Result<(), VellumError> {
    let document = Document::load(path)?;
    let mut out = io::stdout().lock();
    output::write_macro_list(&mut out, &document.macros)?;
    Ok(())
}
