//! Distance-based delivery fee estimate.
//!
//! Used by checkout before any provider quote exists. Both addresses are
//! geocoded concurrently; when either fails to resolve, the flat base fee
//! applies and `distance_km` comes back null.

use axum::{Json, extract::State};
use plateful_core::Address;
use plateful_delivery::fees;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Fee estimate request: a pickup and a dropoff address.
#[derive(Debug, Deserialize)]
pub struct FeeRequest {
    pub pickup: Address,
    pub dropoff: Address,
}

/// Fee estimate response.
#[derive(Debug, Serialize)]
pub struct FeeResponse {
    /// Fee in minor currency units.
    pub fee_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Great-circle distance, null when geocoding failed.
    pub distance_km: Option<f64>,
}

/// POST /api/delivery/fee
#[instrument(skip(state, request))]
pub async fn estimate_fee(
    State(state): State<AppState>,
    Json(request): Json<FeeRequest>,
) -> Result<Json<FeeResponse>, AppError> {
    // Independent lookups, resolved concurrently
    let (pickup, dropoff) = tokio::join!(
        state.geocoder().resolve(&request.pickup),
        state.geocoder().resolve(&request.dropoff),
    );

    let distance_km = fees::distance_km(pickup, dropoff);

    Ok(Json(FeeResponse {
        fee_cents: fees::fee_cents(distance_km),
        currency: state.config().dispatch.currency.clone(),
        distance_km,
    }))
}
