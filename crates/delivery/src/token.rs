//! OAuth token cache for the dispatch provider.
//!
//! Client-credentials grant with a fixed scope. One token is cached per
//! manager; every successful refresh overwrites it. Concurrent callers that
//! all land past the reuse window each issue their own token request — the
//! fetch deliberately happens outside the lock, and the provider tolerates
//! multiple live tokens, so deduplicating the race buys nothing.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::DispatchConfig;
use crate::error::{DeliveryError, truncate_body};

/// Scope requested on every token, regardless of caller.
const TOKEN_SCOPE: &str = "eats.deliveries";

/// Refresh when the cached token is within this many milliseconds of expiry.
const REUSE_WINDOW_MS: i64 = 30_000;

/// A cached bearer token with its absolute expiry.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    /// Expiry instant in epoch milliseconds.
    expires_at_ms: i64,
}

impl CachedToken {
    /// Whether the token is still comfortably inside its lifetime.
    fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms - REUSE_WINDOW_MS
    }
}

/// Token response from the provider's OAuth endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
}

/// Obtains and caches bearer tokens for the dispatch provider.
pub struct TokenManager {
    client: reqwest::Client,
    token_url: String,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    /// Create a manager for the configured environment and credentials.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &DispatchConfig) -> Self {
        Self {
            client,
            token_url: config.environment.token_url().to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, fetching a new one when needed.
    ///
    /// The cached token is reused while more than 30 seconds remain before
    /// its expiry.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::CredentialsMissing`] when no client ID/secret
    /// are configured and [`DeliveryError::ProviderAuth`] when the token
    /// endpoint rejects the request.
    #[instrument(skip(self))]
    pub async fn get_token(&self) -> Result<String, DeliveryError> {
        let now_ms = Utc::now().timestamp_millis();

        {
            let cached = self.lock_cache();
            if let Some(token) = cached.as_ref()
                && token.is_fresh(now_ms)
            {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token(now_ms).await?;
        let access_token = token.access_token.clone();
        *self.lock_cache() = Some(token);

        Ok(access_token)
    }

    /// Fetch a fresh token via the client-credentials grant.
    async fn fetch_token(&self, now_ms: i64) -> Result<CachedToken, DeliveryError> {
        let (Some(client_id), Some(client_secret)) = (&self.client_id, &self.client_secret) else {
            return Err(DeliveryError::CredentialsMissing);
        };

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.expose_secret()),
            ("scope", TOKEN_SCOPE),
        ];

        let response = self.client.post(&self.token_url).form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::ProviderAuth {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "Fetched dispatch token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at_ms: now_ms + token.expires_in * 1000,
        })
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<CachedToken>> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed the cache directly, bypassing the network.
    #[cfg(test)]
    fn seed(&self, access_token: &str, expires_at_ms: i64) {
        *self.lock_cache() = Some(CachedToken {
            access_token: access_token.to_string(),
            expires_at_ms,
        });
    }
}
