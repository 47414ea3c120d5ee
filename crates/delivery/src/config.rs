//! Dispatch provider configuration.

use secrecy::SecretString;

/// Which dispatch provider environment to talk to.
///
/// Sandbox changes the base URLs and, together with the platform's mock-data
/// mode, enables the undeliverable-address fallback simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchEnvironment {
    /// Live deliveries, real couriers.
    Production,
    /// Provider sandbox, no couriers dispatched.
    #[default]
    Sandbox,
}

impl DispatchEnvironment {
    /// Base URL for the quote/create/get API.
    #[must_use]
    pub const fn api_base_url(self) -> &'static str {
        match self {
            Self::Production => "https://api.dispatchcourier.com/v1",
            Self::Sandbox => "https://sandbox.dispatchcourier.com/v1",
        }
    }

    /// OAuth token endpoint for this environment.
    #[must_use]
    pub const fn token_url(self) -> &'static str {
        match self {
            Self::Production => "https://auth.dispatchcourier.com/oauth/token",
            Self::Sandbox => "https://auth.sandbox.dispatchcourier.com/oauth/token",
        }
    }

    /// Parse an environment name ("production"/"sandbox").
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "live" => Some(Self::Production),
            "sandbox" | "test" => Some(Self::Sandbox),
            _ => None,
        }
    }
}

/// Configuration for the dispatch provider integration.
///
/// Implements `Debug` manually to redact the credentials.
#[derive(Clone)]
pub struct DispatchConfig {
    /// Provider environment (selects base URLs).
    pub environment: DispatchEnvironment,
    /// OAuth client ID. `None` means the integration is unconfigured.
    pub client_id: Option<String>,
    /// OAuth client secret.
    pub client_secret: Option<SecretString>,
    /// Webhook signing key. `None` explicitly disables signature checks.
    pub webhook_signing_key: Option<SecretString>,
    /// ISO 4217 currency code used for fees and simulated quotes.
    pub currency: String,
    /// Substitute simulated successes when the provider rejects an address.
    ///
    /// Set from "environment is not production OR mock-data mode is on" at
    /// construction so tests and call sites never read ambient state mid-call.
    pub simulate_on_undeliverable: bool,
}

impl DispatchConfig {
    /// Sandbox configuration with simulation enabled, for tests and local dev.
    #[must_use]
    pub fn sandbox(currency: impl Into<String>) -> Self {
        Self {
            environment: DispatchEnvironment::Sandbox,
            client_id: None,
            client_secret: None,
            webhook_signing_key: None,
            currency: currency.into(),
            simulate_on_undeliverable: true,
        }
    }
}

impl std::fmt::Debug for DispatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("environment", &self.environment)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field(
                "webhook_signing_key",
                &self.webhook_signing_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("currency", &self.currency)
            .field("simulate_on_undeliverable", &self.simulate_on_undeliverable)
            .finish()
    }
}
