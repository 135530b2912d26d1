//! Inline response server.
//!
//! Answers HTTP requests straight from a declarative rule set and forwards
//! everything else to an upstream backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                 INLINE RESPONSE                   │
//!                      │                                                   │
//!   Client Request     │  ┌─────────┐   ┌──────────────┐   ┌───────────┐  │
//!   ───────────────────┼─▶│  http   │──▶│    rules     │──▶│  forward  │──┼──▶ Upstream
//!                      │  │ server  │   │  dispatch    │   │ (or 404)  │  │
//!                      │  └─────────┘   └──────┬───────┘   └───────────┘  │
//!                      │                       │ match / fallback          │
//!   Client Response    │                       ▼                           │
//!   ◀──────────────────┼──────────── rendered status + body               │
//!                      │                                                   │
//!                      │  ┌─────────┐ ┌─────────────┐ ┌───────────────┐   │
//!                      │  │ config  │ │observability│ │   lifecycle   │   │
//!                      │  └─────────┘ └─────────────┘ └───────────────┘   │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use inline_response::config::load_config;
use inline_response::lifecycle::{self, signals, Shutdown};
use inline_response::observability::logging;

#[derive(Parser)]
#[command(name = "inline-response")]
#[command(about = "Answer HTTP requests from declarative path rules", long_about = None)]
struct Args {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long, default_value = "inline-response.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init(&config.observability);
    tracing::info!(config = %args.config.display(), "inline-response v0.1.0 starting");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
