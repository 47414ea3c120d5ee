//! HTTP route handlers for the delivery API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Delivery
//! POST /api/delivery/fee        - Distance-based fee estimate for checkout
//! POST /api/delivery/quotes     - Provider quote for a delivery
//! POST /api/deliveries          - Commit a delivery with the provider
//! GET  /api/deliveries/{id}     - Poll a delivery and refresh the stored record
//!
//! # Webhooks
//! POST /webhooks/dispatch       - Provider status pushes (HMAC-signed)
//! ```

pub mod deliveries;
pub mod fees;
pub mod quotes;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/delivery/fee", post(fees::estimate_fee))
        .route("/api/delivery/quotes", post(quotes::request_quote))
        .route("/api/deliveries", post(deliveries::create_delivery))
        .route("/api/deliveries/{delivery_id}", get(deliveries::get_delivery))
        .route("/webhooks/dispatch", post(webhooks::handle_dispatch_webhook))
}
