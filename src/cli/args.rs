//! Defines the command-line arguments and subcommands for the Vellum CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "vellum",
    version,
    about = "Render template documents through the Vellum macro engine."
)]
pub struct VellumArgs {
    /// Log argument mismatches and other debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a YAML or JSON template document to stdout.
    Render {
        /// The path to the template document.
        #[arg(required = true)]
        document: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List the macros a document defines, with their signatures.
    Macros {
        /// The path to the template document.
        #[arg(required = true)]
        document: PathBuf,
    },
}

/// Macro configuration, read from `--config` and overridden by flags.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// YAML or JSON file with macro configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Treat argument-count mismatches as errors.
    #[arg(long)]
    pub strict: bool,
    /// Hide the caller's references from macro bodies.
    #[arg(long)]
    pub local_scope: bool,
    /// Maximum macro nesting depth (0 or negative for unlimited).
    #[arg(long, allow_negative_numbers = true)]
    pub max_depth: Option<i32>,
    /// Name under which block-call bodies are exposed inside macros.
    #[arg(long)]
    pub body_reference: Option<String>,
}
