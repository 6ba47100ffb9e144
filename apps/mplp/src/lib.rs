//! # mplp
//!
//! Server and CLI for the MPLP schema catalog.
//!
//! The binary in `main.rs` only initialises logging and dispatches to
//! [`cli::execute`]; everything else lives here so integration tests can
//! drive the HTTP router and configuration directly.

pub mod api;
pub mod cli;
pub mod config;
