//! # MPLP MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) bridge to the MPLP
//! schema catalog.
//!
//! Reads configuration from environment variables:
//! - `MPLP_URL`: catalog server URL (default: `http://localhost:8080`)
//! - `MPLP_API_KEY`: optional Bearer token for authentication
//!
//! Speaks MCP over stdio and forwards tool calls to the MPLP HTTP API.

mod client;
mod server;

use client::MplpClient;
use rmcp::{ServiceExt, transport::stdio};
use server::MplpMcp;

/// Server used when `MPLP_URL` is unset.
const DEFAULT_URL: &str = "http://localhost:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let url = std::env::var("MPLP_URL").unwrap_or_else(|_| DEFAULT_URL.into());
    let api_key = std::env::var("MPLP_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());

    tracing::info!("MPLP MCP server starting, target: {}", url);

    let client = MplpClient::new(url, api_key);
    let mcp = MplpMcp::new(client);

    let service = mcp.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("MCP serve error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
