//! # Renalis - CKD Staging Server
//!
//! The main binary for the Renalis CKD staging engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for staging and patient history
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              apps/renalis (THE BINARY)           │
//! │                                                  │
//! │      ┌─────────────┐        ┌─────────────┐      │
//! │      │    CLI      │        │  HTTP API   │      │
//! │      │   (clap)    │        │   (axum)    │      │
//! │      └──────┬──────┘        └──────┬──────┘      │
//! │             └───────────┬──────────┘             │
//! │                         ▼                        │
//! │                 ┌───────────────┐                │
//! │                 │ renalis-core  │                │
//! │                 │  (THE LOGIC)  │                │
//! │                 └───────────────┘                │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! renalis server --host 0.0.0.0 --port 8080
//!
//! # Stage a measurement
//! renalis stage --egfr 45
//! renalis stage --creatinine 1.2 --age 65 --sex male
//!
//! # Patient history
//! renalis record --patient 7 --egfr 52
//! renalis history --patient 7
//! renalis trend --patient 7
//! ```

use clap::Parser;
use renalis::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // RENALIS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("RENALIS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "renalis=info,tower_http=debug".into());

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
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Renalis v{}
  CKD staging engine - eGFR, stage, guidance
"#,
        env!("CARGO_PKG_VERSION")
    );
}
