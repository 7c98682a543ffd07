//! `Tasklist` mock REST server.
//!
//! Serves static fixture records at `/api/todo`.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:3000
//! cargo run --bin tasklist-api
//!
//! # Run on custom address
//! cargo run --bin tasklist-api -- --bind 127.0.0.1:8080
//!
//! # Or via environment variable
//! TASKLIST_API_ADDR=127.0.0.1:8080 cargo run --bin tasklist-api
//! ```

use clap::Parser;
use tasklist_api::config::{ApiCliArgs, ApiConfig};
use tasklist_api::routes;

#[tokio::main]
async fn main() {
    let cli = ApiCliArgs::parse();

    let config = match ApiConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting tasklist api server");

    match routes::start_server(&config.bind_addr).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "api server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "api server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start api server");
            std::process::exit(1);
        }
    }
}
