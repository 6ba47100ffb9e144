//! # MPLP CLI Module
//!
//! This module implements the CLI interface for the schema catalog.
//!
//! ## Available Commands
//!
//! - `modules` - List modules and their tiers
//! - `status` - Print the tier status of any name
//! - `show` - Print a module's schema or its summary
//! - `check` - Lint the embedded catalog
//! - `compat` - Compare an older schema file against the embedded one
//! - `export` - Write every schema to a directory
//! - `digest` - Print the catalog checksum and BLAKE3 hash
//! - `server` - Start the HTTP server

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use mplp_catalog::{CatalogError, Tier};
use std::path::PathBuf;
use thiserror::Error;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// MPLP - Schema Catalog
///
/// The JSON Schemas of the MPLP protocol modules and their maturity tiers.
#[derive(Parser, Debug)]
#[command(name = "mplp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Tier filter accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierArg {
    ProductionReady,
    EnterpriseStandard,
    Pending,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::ProductionReady => Tier::ProductionReady,
            TierArg::EnterpriseStandard => Tier::EnterpriseStandard,
            TierArg::Pending => Tier::Pending,
        }
    }
}

/// Report format of `check`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckFormat {
    #[default]
    Text,
    Json,
    /// JUnit XML, one testsuite per schema
    Junit,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List modules with their tier
    Modules {
        /// Only list modules in this tier
        #[arg(short, long, value_enum)]
        tier: Option<TierArg>,
    },

    /// Print the tier status of any name
    Status {
        /// Name to classify
        name: String,
    },

    /// Print a module's schema document
    Show {
        /// Module name (context, plan, ...)
        module: String,

        /// Print a summary instead of the full document
        #[arg(short, long)]
        summary: bool,
    },

    /// Lint the embedded catalog against the schema conventions
    Check {
        /// Only lint this module
        #[arg(short, long)]
        module: Option<String>,

        /// Fail on warnings as well as errors
        #[arg(long)]
        strict: bool,

        /// Report format (`--json-mode` implies json)
        #[arg(short, long, value_enum, default_value_t = CheckFormat::Text)]
        format: CheckFormat,
    },

    /// Compare an older schema file against the embedded schema
    Compat {
        /// Module name
        module: String,

        /// Path to the older schema document
        #[arg(short, long)]
        against: PathBuf,
    },

    /// Write every schema to <output>/mplp-<module>.json
    Export {
        /// Output directory (created if missing)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the catalog checksum and BLAKE3 hash
    Digest,

    /// Start HTTP server
    Server {
        /// Host to bind to (default from config, else 127.0.0.1)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (default from config, else 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

// =============================================================================
// CLI ERRORS
// =============================================================================

/// Failures that end a CLI run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// `check` found errors, or warnings under `--strict`.
    #[error("Lint failed: {errors} error(s), {warnings} warning(s)")]
    CheckFailed { errors: usize, warnings: usize },

    /// `compat` found breaking changes.
    #[error("Schema is not compatible: {breaking} breaking change(s)")]
    Incompatible { breaking: usize },
}

impl CliError {
    /// Process exit code: 2 for findings, 1 for operational errors.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Catalog(_) => 1,
            CliError::CheckFailed { .. } | CliError::Incompatible { .. } => 2,
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Modules { tier }) => cmd_modules(json_mode, tier.map(Tier::from)),
        Some(Commands::Status { name }) => {
            cmd_status(json_mode, &name);
            Ok(())
        }
        Some(Commands::Show { module, summary }) => cmd_show(json_mode, &module, summary),
        Some(Commands::Check {
            module,
            strict,
            format,
        }) => {
            let format = if json_mode { CheckFormat::Json } else { format };
            cmd_check(format, module.as_deref(), strict)
        }
        Some(Commands::Compat { module, against }) => cmd_compat(json_mode, &module, &against),
        Some(Commands::Export { output }) => cmd_export(json_mode, &output),
        Some(Commands::Digest) => cmd_digest(json_mode),
        Some(Commands::Server { host, port }) => {
            cmd_server(cli.config.as_deref(), host, port).await
        }
        None => {
            // No subcommand - list modules by default
            cmd_modules(json_mode, None)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
