//! # Server Configuration
//!
//! Settings for the HTTP server, resolved in order of precedence:
//!
//! 1. CLI flags (`--host`, `--port`)
//! 2. Environment variables
//! 3. TOML config file (`--config renalis.toml`)
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `RENALIS_API_KEY`: if set and non-empty, requires Bearer token authentication
//! - `RENALIS_RATE_LIMIT`: requests per second (0 disables rate limiting)
//! - `RENALIS_CORS_ORIGINS`: comma-separated list of allowed origins, or "*"
//!
//! ## File Format
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! rate_limit = 50
//! cors_origins = ["https://portal.example.org"]
//! api_key = "change-me"
//! ```

use renalis_core::CkdError;
use serde::Deserialize;
use std::path::Path;

/// Default rate limit in requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Top-level layout of the TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub server: ServerSection,
}

/// `[server]` table. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rate_limit: Option<u32>,
    pub cors_origins: Option<Vec<String>>,
    pub api_key: Option<String>,
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only; `["*"]` allows all.
    pub cors_origins: Vec<String>,
    /// Bearer token required on every endpoint except `/health`.
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: Vec::new(),
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// Parse a config file's contents and apply it over the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, CkdError> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| CkdError::DeserializationError(format!("Invalid config: {}", e)))?;
        Ok(Self::default().merge_file(file.server))
    }

    /// Load the config file if given, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, CkdError> {
        let config = match path {
            Some(path) => {
                let metadata = std::fs::metadata(path).map_err(|e| {
                    CkdError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
                })?;
                if metadata.len() > MAX_CONFIG_FILE_SIZE {
                    return Err(CkdError::IoError(format!(
                        "Config file size {} bytes exceeds maximum allowed {} bytes",
                        metadata.len(),
                        MAX_CONFIG_FILE_SIZE
                    )));
                }
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    CkdError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
                })?;
                tracing::info!("Loaded config from {}", path.display());
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };
        Ok(config.merge_env(|key| std::env::var(key).ok()))
    }

    fn merge_file(mut self, section: ServerSection) -> Self {
        if let Some(host) = section.host {
            self.host = host;
        }
        if let Some(port) = section.port {
            self.port = port;
        }
        if let Some(rate_limit) = section.rate_limit {
            self.rate_limit = rate_limit;
        }
        if let Some(origins) = section.cors_origins {
            self.cors_origins = origins;
        }
        self.api_key = section.api_key.filter(|k| !k.is_empty()).or(self.api_key);
        self
    }

    /// Apply environment overrides read through `lookup`.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup("RENALIS_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(raw) = lookup("RENALIS_RATE_LIMIT") {
            match raw.trim().parse() {
                Ok(rate) => self.rate_limit = rate,
                Err(_) => tracing::warn!("Ignoring invalid RENALIS_RATE_LIMIT={:?}", raw),
            }
        }
        if let Some(raw) = lookup("RENALIS_CORS_ORIGINS") {
            self.cors_origins = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        self
    }

    /// Apply CLI flag overrides.
    #[must_use]
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================
