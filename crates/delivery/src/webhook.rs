//! Inbound dispatch webhook verification and normalization.
//!
//! The provider's event envelope is not stable: the same concept shows up
//! under different key names depending on event type and provider version.
//! Each logical field therefore has an ordered candidate-key table, tried in
//! priority order, instead of scattered `a || b || c` lookups.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sha2::Sha256;

use crate::error::DeliveryError;
use crate::store::DeliveryStore;

/// Envelope keys that may carry the event type, in priority order.
const EVENT_TYPE_KEYS: &[&str] = &["event_type", "type", "event"];

/// Envelope keys that may carry the data payload. The envelope itself is the
/// final fallback.
const DATA_KEYS: &[&str] = &["data", "resource"];

/// Payload keys that may carry the provider delivery ID.
const DELIVERY_ID_KEYS: &[&str] = &["delivery_id", "id", "deliveryId", "resource_id"];

/// Payload keys that may carry our correlation ID.
const EXTERNAL_ID_KEYS: &[&str] = &["external_id", "externalId"];

/// Payload keys that may carry the delivery status.
const STATUS_KEYS: &[&str] = &["status", "state", "current_status", "new_status"];

/// Payload keys that may carry the tracking URL.
const TRACKING_URL_KEYS: &[&str] = &["tracking_url", "trackingUrl", "share_url"];

/// A normalized webhook event.
///
/// Transient: built per inbound request, never persisted as its own entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookEvent {
    /// Event type, when the envelope names one.
    pub event_type: Option<String>,
    /// Provider delivery ID.
    pub delivery_id: Option<String>,
    /// Caller-chosen correlation ID.
    pub external_id: Option<String>,
    /// Raw delivery status.
    pub status: Option<String>,
    /// Courier tracking URL.
    pub tracking_url: Option<String>,
}

/// What happened when an event was applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A record was found and updated.
    Updated {
        /// Provider delivery ID of the updated record.
        delivery_id: String,
    },
    /// The event named a delivery we don't know. Acknowledged anyway — the
    /// provider should not retry forever for an unknown or deleted order.
    NotFound,
    /// The event carried no identifier at all; informational only.
    NoTarget,
}

/// Verify an inbound webhook signature.
///
/// With no signing key configured, every request is accepted — an explicit
/// permissive mode for non-production setups, not a guessable default key.
/// Otherwise the signature must be the hex HMAC-SHA256 of the raw body.
///
/// # Errors
///
/// Returns [`DeliveryError::InvalidSignature`] on a missing or mismatched
/// signature.
pub fn verify_signature(
    signing_key: Option<&SecretString>,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), DeliveryError> {
    let Some(key) = signing_key else {
        return Ok(());
    };
    let Some(signature) = signature else {
        return Err(DeliveryError::InvalidSignature);
    };

    let mut mac = Hmac::<Sha256>::new_from_slice(key.expose_secret().as_bytes())
        .map_err(|_| DeliveryError::InvalidSignature)?;
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    if constant_time_compare(&expected, signature.trim()) {
        Ok(())
    } else {
        Err(DeliveryError::InvalidSignature)
    }
}

/// Parse and normalize a raw webhook body.
///
/// # Errors
///
/// Returns [`DeliveryError::InvalidPayload`] when the body is not a JSON
/// object.
pub fn parse_event(body: &[u8]) -> Result<WebhookEvent, DeliveryError> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|err| DeliveryError::InvalidPayload(err.to_string()))?;
    if !envelope.is_object() {
        return Err(DeliveryError::InvalidPayload(
            "expected a JSON object".to_string(),
        ));
    }

    let data = DATA_KEYS
        .iter()
        .find_map(|key| envelope.get(key).filter(|value| value.is_object()))
        .unwrap_or(&envelope);

    Ok(WebhookEvent {
        event_type: first_string(&envelope, EVENT_TYPE_KEYS),
        delivery_id: first_string(data, DELIVERY_ID_KEYS),
        external_id: first_string(data, EXTERNAL_ID_KEYS),
        status: first_string(data, STATUS_KEYS),
        tracking_url: first_string(data, TRACKING_URL_KEYS),
    })
}

/// Apply a normalized event to the delivery store.
///
/// Looks up the target by provider delivery ID first, then by external ID,
/// and applies only the fields the event carries. Events with no identifier
/// and events for unknown records are acknowledged without an update.
pub fn apply_update(store: &dyn DeliveryStore, event: &WebhookEvent) -> IngestOutcome {
    if event.delivery_id.is_none() && event.external_id.is_none() {
        return IngestOutcome::NoTarget;
    }

    let record = event
        .delivery_id
        .as_deref()
        .and_then(|id| store.find_by_delivery_id(id))
        .or_else(|| {
            event
                .external_id
                .as_deref()
                .and_then(|id| store.find_by_external_id(id))
        });

    let Some(mut record) = record else {
        return IngestOutcome::NotFound;
    };

    record.apply_update(event.status.as_deref(), event.tracking_url.as_deref());
    let delivery_id = record.delivery_id.clone();
    store.upsert(record);

    IngestOutcome::Updated { delivery_id }
}

/// First string-like value found under the candidate keys.
///
/// Numeric IDs are stringified; other shapes are skipped.
fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
