//! Delivery creation and on-demand polling.

use axum::{
    Json,
    extract::{Path, State},
};
use plateful_core::DeliveryRecord;
use plateful_delivery::{DeliveryStore as _, ManifestItem, Waypoint};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::quotes::dispatch_customer_id;
use crate::state::AppState;

/// Create-delivery request body.
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryRequest {
    pub pickup: Waypoint,
    pub dropoff: Waypoint,
    #[serde(default)]
    pub manifest_items: Vec<ManifestItem>,
    /// Courier tip in minor currency units.
    #[serde(default)]
    pub tip_cents: i64,
    /// Caller-chosen correlation ID; generated when absent.
    #[serde(default)]
    pub external_id: Option<String>,
}

/// POST /api/deliveries
#[instrument(skip(state, request))]
pub async fn create_delivery(
    State(state): State<AppState>,
    Json(request): Json<CreateDeliveryRequest>,
) -> Result<Json<DeliveryRecord>, AppError> {
    let customer_id = dispatch_customer_id(&state)?;
    let external_id = request
        .external_id
        .unwrap_or_else(|| format!("ord_{}", Uuid::new_v4().simple()));

    let record = state
        .dispatch()
        .create_delivery(
            &customer_id,
            &request.pickup,
            &request.dropoff,
            &request.manifest_items,
            request.tip_cents,
            &external_id,
        )
        .await?;

    state.store().upsert(record.clone());

    Ok(Json(record))
}

/// GET /api/deliveries/{delivery_id}
///
/// Polls the provider and merges status and tracking URL into the stored
/// record, mirroring what a webhook for the same event would do.
#[instrument(skip(state))]
pub async fn get_delivery(
    State(state): State<AppState>,
    Path(delivery_id): Path<String>,
) -> Result<Json<DeliveryRecord>, AppError> {
    let customer_id = dispatch_customer_id(&state)?;

    let polled = state
        .dispatch()
        .get_delivery(&customer_id, &delivery_id)
        .await?;

    let record = match state.store().find_by_delivery_id(&delivery_id) {
        Some(mut stored) => {
            stored.apply_update(Some(&polled.status), polled.tracking_url.as_deref());
            state.store().upsert(stored.clone());
            stored
        }
        // Unknown locally (e.g., created before a restart): return the
        // provider's view without persisting addresses we don't have.
        None => polled,
    };

    Ok(Json(record))
}
