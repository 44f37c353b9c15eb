//! CLI module for the empathy gateway
//!
//! - `serve`: run the HTTP API
//! - `clear-cache`: remove entries from the configured vector store

pub mod clear_cache;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Empathy Gateway - empathetic message rewriting with a feedback-driven cache
#[derive(Parser)]
#[command(name = "empathy-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Delete cached entries from the vector store
    ClearCache(clear_cache::ClearCacheArgs),
}

/// Load configuration and install logging, shared by every subcommand
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);
    Ok(config)
}
