//! Error taxonomy for the delivery integration.

use thiserror::Error;

/// Maximum number of characters of a provider response body kept in errors.
///
/// Provider error bodies are free-form text and occasionally huge; capping
/// them keeps logs and Sentry events bounded.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Errors that can occur when interacting with the delivery providers.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Dispatch client ID/secret are not configured.
    #[error("Dispatch credentials are not configured")]
    CredentialsMissing,

    /// The dispatch token endpoint returned a non-success status.
    #[error("Dispatch auth failed with HTTP {status}: {body}")]
    ProviderAuth {
        /// HTTP status code from the token endpoint.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// A quote/create/get call returned a non-success status.
    #[error("Dispatch request failed with HTTP {status}: {body}")]
    RequestFailed {
        /// HTTP status code from the provider.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// HTTP transport failure (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook signature did not verify.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Webhook body was not a valid JSON object.
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

/// Truncate a provider response body for inclusion in errors and logs.
///
/// Cuts on a character boundary so multi-byte content never splits.
#[must_use]
pub fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push('…');
    truncated
}
