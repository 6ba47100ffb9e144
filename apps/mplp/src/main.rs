//! # MPLP - Schema Catalog Server
//!
//! The main binary for the MPLP schema catalog.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for listing, linting and comparing schemas
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               apps/mplp (THE BINARY)            │
//! │                                                 │
//! │   ┌─────────────┐          ┌─────────────┐      │
//! │   │    CLI      │          │  HTTP API   │      │
//! │   │   (clap)    │          │   (axum)    │      │
//! │   └──────┬──────┘          └──────┬──────┘      │
//! │          └──────────┬─────────────┘             │
//! │                     ▼                           │
//! │             ┌───────────────┐                   │
//! │             │ mplp-catalog  │                   │
//! │             │ (THE CATALOG) │                   │
//! │             └───────────────┘                   │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! mplp server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! mplp modules --tier production-ready
//! mplp show context --summary
//! mplp check --strict
//! mplp compat plan --against old/mplp-plan.json
//! ```

use clap::Parser;
use mplp::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // MPLP_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MPLP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose {
        "mplp=debug,mplp_catalog=debug,tower_http=debug"
    } else {
        "mplp=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// Print the MPLP startup banner.
fn print_banner() {
    println!(
        r#"
  ███╗   ███╗██████╗ ██╗     ██████╗
  ████╗ ████║██╔══██╗██║     ██╔══██╗
  ██╔████╔██║██████╔╝██║     ██████╔╝
  ██║╚██╔╝██║██╔═══╝ ██║     ██╔═══╝
  ██║ ╚═╝ ██║██║     ███████╗██║
  ╚═╝     ╚═╝╚═╝     ╚══════╝╚═╝

  Multi-Agent Project Lifecycle Protocol - Schema Catalog v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
