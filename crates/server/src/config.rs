//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - none: the server boots in sandbox mode with the dispatch integration
//!   unconfigured, so local development needs no credentials
//!
//! ## Optional
//! - `PLATEFUL_HOST` - Bind address (default: 127.0.0.1)
//! - `PLATEFUL_PORT` - Listen port (default: 3000)
//! - `PLATEFUL_CURRENCY` - ISO 4217 fee currency (default: CAD)
//! - `PLATEFUL_DEFAULT_COUNTRY` - Country code assumed when an address has none (default: CA)
//! - `PLATEFUL_MOCK_DATA` - "true"/"1" enables the fallback simulation even in production
//! - `DISPATCH_ENVIRONMENT` - "production" or "sandbox" (default: sandbox)
//! - `DISPATCH_CUSTOMER_ID` - Provider account ID used in API paths
//! - `DISPATCH_CLIENT_ID` - OAuth client ID
//! - `DISPATCH_CLIENT_SECRET` - OAuth client secret
//! - `DISPATCH_WEBHOOK_SECRET` - Webhook signing key; unset disables signature checks
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use plateful_delivery::{DispatchConfig, DispatchEnvironment};
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Country code assumed when an address carries none
    pub default_country: String,
    /// Provider account ID used in dispatch API paths
    pub dispatch_customer_id: Option<String>,
    /// Dispatch provider configuration
    pub dispatch: DispatchConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PLATEFUL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PLATEFUL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PLATEFUL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PLATEFUL_PORT".to_string(), e.to_string()))?;

        let environment = match get_optional_env("DISPATCH_ENVIRONMENT") {
            None => DispatchEnvironment::Sandbox,
            Some(raw) => DispatchEnvironment::parse(&raw).ok_or_else(|| {
                ConfigError::InvalidEnvVar("DISPATCH_ENVIRONMENT".to_string(), raw)
            })?,
        };

        let mock_mode = get_optional_env("PLATEFUL_MOCK_DATA")
            .is_some_and(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "True"));

        // Simulation is decided once here; the orchestrator never reads
        // ambient configuration mid-call.
        let simulate_on_undeliverable =
            environment != DispatchEnvironment::Production || mock_mode;

        let dispatch = DispatchConfig {
            environment,
            client_id: get_optional_env("DISPATCH_CLIENT_ID"),
            client_secret: get_optional_env("DISPATCH_CLIENT_SECRET").map(SecretString::from),
            webhook_signing_key: get_optional_env("DISPATCH_WEBHOOK_SECRET")
                .map(SecretString::from),
            currency: get_env_or_default("PLATEFUL_CURRENCY", "CAD"),
            simulate_on_undeliverable,
        };

        Ok(Self {
            host,
            port,
            default_country: get_env_or_default("PLATEFUL_DEFAULT_COUNTRY", "CA"),
            dispatch_customer_id: get_optional_env("DISPATCH_CUSTOMER_ID"),
            dispatch,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
