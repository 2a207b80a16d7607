//! # Renalis application library
//!
//! Shared by the `renalis` binary and the integration tests:
//! - `api`: axum HTTP API
//! - `cli`: clap commands
//! - `config`: server configuration (TOML file + environment)

pub mod api;
pub mod cli;
pub mod config;

/// Current Unix time in seconds, or 0 if the clock is before the epoch.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
