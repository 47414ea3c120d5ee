//! Dispatch provider client: quotes, deliveries, and the sandbox fallback.
//!
//! Quote and create calls POST JSON with a bearer token from the
//! [`TokenManager`]; get is a plain GET. Provider addresses are single
//! formatted strings (street lines, city, region code, postal code, country).
//!
//! # Fallback simulation
//!
//! Sandbox environments routinely reject realistic-looking test addresses.
//! When `simulate_on_undeliverable` is set and the provider's error body
//! matches an undeliverable-address pattern, a synthetic success is returned
//! instead so downstream flows (UI, order persistence) can still be exercised
//! end to end. Any other failure propagates with its status code and a
//! truncated body.

use chrono::{DateTime, Duration, Utc};
use plateful_core::{Address, DeliveryRecord, DeliveryStatus, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::DispatchConfig;
use crate::error::{DeliveryError, truncate_body};
use crate::regions::{normalize_postal_code, normalize_region};
use crate::token::TokenManager;

/// Fee on simulated quotes, in minor currency units.
const SIMULATED_FEE_CENTS: i64 = 799;

/// Dropoff estimate on simulated quotes.
const SIMULATED_ETA_MINUTES: i64 = 45;

/// Error-body fragments that mark an address the provider cannot serve.
const UNDELIVERABLE_PATTERNS: &[&str] = &[
    "address_undeliverable",
    "address undeliverable",
    "no_eligible_product",
    "no eligible product",
];

/// Per-call timeout for provider requests.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// One end of a delivery: an address plus optional contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    /// Structured address, formatted for the provider at request time.
    pub address: Address,
    /// Contact name at this stop.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact phone number at this stop.
    #[serde(default)]
    pub phone: Option<String>,
}

/// One physical item handed to the courier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestItem {
    /// Human-readable item name.
    pub name: String,
    /// How many of this item.
    pub quantity: u32,
    /// Provider size class ("small", "medium", ...), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// A priced, time-estimated delivery offer. Not yet committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Delivery fee.
    pub fee: Money,
    /// Estimated dropoff time.
    pub dropoff_eta: DateTime<Utc>,
    /// Whether this quote came from the fallback simulation.
    #[serde(default)]
    pub simulated: bool,
}

#[derive(Serialize)]
struct QuoteRequest<'a> {
    pickup_address: String,
    dropoff_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pickup_phone_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dropoff_phone_number: Option<&'a str>,
}

#[derive(Deserialize)]
struct QuoteResponse {
    /// Fee in minor currency units.
    fee: i64,
    #[serde(default)]
    currency_type: Option<String>,
    dropoff_eta: DateTime<Utc>,
}

#[derive(Serialize)]
struct CreateDeliveryRequest<'a> {
    pickup_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pickup_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pickup_phone_number: Option<&'a str>,
    dropoff_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    dropoff_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dropoff_phone_number: Option<&'a str>,
    manifest_items: &'a [ManifestItem],
    /// Courier tip in minor currency units.
    tip: i64,
    external_id: &'a str,
}

#[derive(Deserialize)]
struct DeliveryResponse {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    tracking_url: Option<String>,
    #[serde(default)]
    fee: Option<i64>,
    #[serde(default)]
    currency_type: Option<String>,
    #[serde(default)]
    tip: Option<i64>,
    #[serde(default)]
    external_id: Option<String>,
}

/// Client for the dispatch provider's quote/create/get API.
pub struct DispatchClient {
    client: reqwest::Client,
    tokens: TokenManager,
    config: DispatchConfig,
}

impl DispatchClient {
    /// Create a client for the configured environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: DispatchConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let tokens = TokenManager::new(client.clone(), &config);
        Ok(Self {
            client,
            tokens,
            config,
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Request a quote for a delivery between two waypoints.
    ///
    /// # Errors
    ///
    /// Propagates auth and provider failures; an undeliverable-address
    /// rejection becomes a simulated quote when simulation is enabled.
    #[instrument(skip(self, pickup, dropoff), fields(customer_id = %customer_id))]
    pub async fn request_quote(
        &self,
        customer_id: &str,
        pickup: &Waypoint,
        dropoff: &Waypoint,
    ) -> Result<QuoteResult, DeliveryError> {
        let token = self.tokens.get_token().await?;
        let url = format!(
            "{}/customers/{customer_id}/delivery_quotes",
            self.config.environment.api_base_url()
        );

        let request = QuoteRequest {
            pickup_address: format_provider_address(&pickup.address),
            dropoff_address: format_provider_address(&dropoff.address),
            pickup_phone_number: pickup.phone.as_deref(),
            dropoff_phone_number: dropoff.phone.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if self.should_simulate(&body) {
                info!(status = status.as_u16(), "Simulating quote for undeliverable address");
                return Ok(self.simulated_quote());
            }
            return Err(DeliveryError::RequestFailed {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let quote: QuoteResponse = response.json().await?;
        debug!(fee = quote.fee, "Received dispatch quote");

        Ok(QuoteResult {
            fee: Money::from_cents(
                quote.fee,
                quote.currency_type.unwrap_or_else(|| self.config.currency.clone()),
            ),
            dropoff_eta: quote.dropoff_eta,
            simulated: false,
        })
    }

    /// Commit a delivery with the provider.
    ///
    /// # Errors
    ///
    /// Propagates auth and provider failures; an undeliverable-address
    /// rejection becomes a simulated delivery when simulation is enabled.
    #[instrument(
        skip(self, pickup, dropoff, manifest_items),
        fields(customer_id = %customer_id, external_id = %external_id)
    )]
    pub async fn create_delivery(
        &self,
        customer_id: &str,
        pickup: &Waypoint,
        dropoff: &Waypoint,
        manifest_items: &[ManifestItem],
        tip_cents: i64,
        external_id: &str,
    ) -> Result<DeliveryRecord, DeliveryError> {
        let token = self.tokens.get_token().await?;
        let url = format!(
            "{}/customers/{customer_id}/deliveries",
            self.config.environment.api_base_url()
        );

        let request = CreateDeliveryRequest {
            pickup_address: format_provider_address(&pickup.address),
            pickup_name: pickup.name.as_deref(),
            pickup_phone_number: pickup.phone.as_deref(),
            dropoff_address: format_provider_address(&dropoff.address),
            dropoff_name: dropoff.name.as_deref(),
            dropoff_phone_number: dropoff.phone.as_deref(),
            manifest_items,
            tip: tip_cents,
            external_id,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if self.should_simulate(&body) {
                info!(
                    status = status.as_u16(),
                    "Simulating delivery for undeliverable address"
                );
                return Ok(self.simulated_delivery(pickup, dropoff, tip_cents, external_id));
            }
            return Err(DeliveryError::RequestFailed {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let delivery: DeliveryResponse = response.json().await?;
        info!(delivery_id = %delivery.id, "Created dispatch delivery");

        Ok(self.record_from_response(delivery, &pickup.address, &dropoff.address, external_id))
    }

    /// Fetch the provider's current view of a delivery.
    ///
    /// The returned record carries empty pickup/dropoff addresses; callers
    /// merge status and tracking URL into their stored record.
    ///
    /// # Errors
    ///
    /// Propagates auth and provider failures.
    #[instrument(skip(self), fields(customer_id = %customer_id, delivery_id = %delivery_id))]
    pub async fn get_delivery(
        &self,
        customer_id: &str,
        delivery_id: &str,
    ) -> Result<DeliveryRecord, DeliveryError> {
        let token = self.tokens.get_token().await?;
        let url = format!(
            "{}/customers/{customer_id}/deliveries/{delivery_id}",
            self.config.environment.api_base_url()
        );

        let response = self.client.get(&url).bearer_auth(&token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::RequestFailed {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let delivery: DeliveryResponse = response.json().await?;
        let external_id = delivery.external_id.clone().unwrap_or_default();

        Ok(self.record_from_response(
            delivery,
            &Address::default(),
            &Address::default(),
            &external_id,
        ))
    }

    /// Whether a provider error body should be papered over with a simulation.
    #[must_use]
    pub fn should_simulate(&self, error_body: &str) -> bool {
        if !self.config.simulate_on_undeliverable {
            return false;
        }
        let body = error_body.to_ascii_lowercase();
        UNDELIVERABLE_PATTERNS
            .iter()
            .any(|pattern| body.contains(pattern))
    }

    /// Synthetic quote used when the sandbox rejects an address.
    #[must_use]
    pub fn simulated_quote(&self) -> QuoteResult {
        QuoteResult {
            fee: Money::from_cents(SIMULATED_FEE_CENTS, self.config.currency.clone()),
            dropoff_eta: Utc::now() + Duration::minutes(SIMULATED_ETA_MINUTES),
            simulated: true,
        }
    }

    /// Synthetic delivery used when the sandbox rejects an address.
    #[must_use]
    pub fn simulated_delivery(
        &self,
        pickup: &Waypoint,
        dropoff: &Waypoint,
        tip_cents: i64,
        external_id: &str,
    ) -> DeliveryRecord {
        let now = Utc::now();
        let delivery_id = format!("sim_{}", Uuid::new_v4().simple());
        DeliveryRecord {
            tracking_url: Some(format!("https://track.dispatchcourier.com/{delivery_id}")),
            delivery_id,
            external_id: external_id.to_string(),
            status: DeliveryStatus::CourierAccepted.as_str().to_string(),
            fee: Some(Money::from_cents(
                SIMULATED_FEE_CENTS,
                self.config.currency.clone(),
            )),
            tip: Some(Money::from_cents(tip_cents, self.config.currency.clone())),
            pickup: pickup.address.clone(),
            dropoff: dropoff.address.clone(),
            simulated: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn record_from_response(
        &self,
        response: DeliveryResponse,
        pickup: &Address,
        dropoff: &Address,
        external_id: &str,
    ) -> DeliveryRecord {
        let now = Utc::now();
        let currency = response
            .currency_type
            .unwrap_or_else(|| self.config.currency.clone());
        DeliveryRecord {
            delivery_id: response.id,
            external_id: external_id.to_string(),
            status: DeliveryStatus::normalize(response.status.as_deref().unwrap_or("pending")),
            tracking_url: response.tracking_url,
            fee: response
                .fee
                .map(|cents| Money::from_cents(cents, currency.clone())),
            tip: response.tip.map(|cents| Money::from_cents(cents, currency)),
            pickup: pickup.clone(),
            dropoff: dropoff.clone(),
            simulated: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Format an address the way the provider wants it: one comma-separated
/// string of street lines, city, region code, postal code, country code.
#[must_use]
pub fn format_provider_address(address: &Address) -> String {
    let region = normalize_region(&address.region);
    let postal = normalize_postal_code(&address.postal_code);
    let country = address.country.trim().to_ascii_uppercase();

    address
        .street_lines_trimmed()
        .map(str::to_string)
        .chain([address.city.trim().to_string(), region, postal, country])
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
