//! APRIL Control - interactive console for the APRIL assistant.
//!
//! Thin frontend over `april_common`: reads one line per turn, feeds the
//! pipeline, prints the reply. All semantics live in the library.

mod repl;

use anyhow::Result;
use april_common::config::{default_config_path, AssistantConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aprilctl")]
#[command(about = "APRIL Assistant - rule-based desktop command interpreter", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config.toml (default: per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the runtime data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the --verbose default
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let mut config = match cli.config.or_else(default_config_path) {
        Some(path) => AssistantConfig::load(&path),
        None => AssistantConfig::default(),
    };
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }

    repl::run(config)
}
