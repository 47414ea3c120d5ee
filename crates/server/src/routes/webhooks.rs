//! Inbound dispatch webhook endpoint.
//!
//! The raw body bytes feed signature verification before any parsing, so the
//! handler takes `Bytes` rather than a JSON extractor. Once the signature and
//! JSON checks pass the request is always acknowledged, even when the event
//! targets a delivery we don't know — the provider must not retry forever for
//! an order that no longer exists.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use plateful_delivery::{IngestOutcome, webhook};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::state::AppState;

/// Header names the provider has been seen using for the signature.
const SIGNATURE_HEADERS: &[&str] = &["x-dispatch-signature", "x-signature", "signature"];

/// POST /webhooks/dispatch
#[instrument(skip(state, headers, body))]
pub async fn handle_dispatch_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let signature = SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|value| value.to_str().ok());

    let signing_key = state.config().dispatch.webhook_signing_key.as_ref();
    if let Err(err) = webhook::verify_signature(signing_key, &body, signature) {
        warn!(error = %err, "Rejected dispatch webhook signature");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "error": "invalid signature" })),
        );
    }

    let event = match webhook::parse_event(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "Rejected dispatch webhook payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": "invalid payload" })),
            );
        }
    };

    match webhook::apply_update(state.store(), &event) {
        IngestOutcome::Updated { delivery_id } => {
            info!(delivery_id = %delivery_id, status = ?event.status, "Applied dispatch webhook");
        }
        IngestOutcome::NotFound => {
            debug!(
                delivery_id = ?event.delivery_id,
                external_id = ?event.external_id,
                "Dispatch webhook for unknown delivery"
            );
        }
        IngestOutcome::NoTarget => {
            debug!(event_type = ?event.event_type, "Informational dispatch webhook");
        }
    }

    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "received": true,
            "eventType": event.event_type,
        })),
    )
}
