//! Hangar MCP Server - Main Entry Point
//!
//! The actual implementation is in the `hangar_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use hangar_mcp::{HangarConfig, HangarServerHandler};
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hangar MCP Server - aircraft maintenance notifications via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the hangar data file (JSON)
    file: String,

    /// Enable git synchronization on save
    #[arg(long)]
    sync_git: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at info level instead of warn (overridden by HANGAR_LOG)
    #[arg(short, long)]
    verbose: bool,
}

/// Log to stderr; stdout carries the MCP protocol.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("HANGAR_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = HangarConfig::load(args.config.as_deref())?;
    if args.sync_git {
        config.sync_git = true;
    }

    let handler = HangarServerHandler::new(&args.file, config)?;
    serve_stdio(handler).await?;
    Ok(())
}
