//! Recipe Planner
//!
//! Entry point: API server by default, or a one-shot CLI command.

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use recipe_planner::cli;
use recipe_planner::config::{AppConfig, Cli};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    // Load .env (if present) before clap reads env-backed flags
    let _ = dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = match AppConfig::from_cli(&cli) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::dispatch(cli.command, config).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing (M-LOG-STRUCTURED). `LOG_FORMAT=json` selects JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
