//! Provider delivery quotes.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use plateful_delivery::Waypoint;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Quote request: pickup and dropoff waypoints.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub pickup: Waypoint,
    pub dropoff: Waypoint,
}

/// Quote response.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    /// Fee in minor currency units.
    pub fee_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Estimated dropoff time.
    pub dropoff_eta: DateTime<Utc>,
    /// Whether this quote came from the sandbox fallback simulation.
    pub simulated: bool,
}

/// POST /api/delivery/quotes
#[instrument(skip(state, request))]
pub async fn request_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let customer_id = dispatch_customer_id(&state)?;

    let quote = state
        .dispatch()
        .request_quote(&customer_id, &request.pickup, &request.dropoff)
        .await?;

    Ok(Json(QuoteResponse {
        fee_cents: quote.fee.cents,
        currency: quote.fee.currency,
        dropoff_eta: quote.dropoff_eta,
        simulated: quote.simulated,
    }))
}

/// The provider account ID, or a client-visible error when unconfigured.
pub fn dispatch_customer_id(state: &AppState) -> Result<String, AppError> {
    state
        .config()
        .dispatch_customer_id
        .clone()
        .ok_or_else(|| AppError::BadRequest("dispatch integration is not configured".to_string()))
}
