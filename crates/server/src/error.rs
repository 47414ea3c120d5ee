//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use plateful_delivery::DeliveryError;

/// Application-level error type for the delivery API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Delivery integration failed.
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-class errors to Sentry
        if matches!(
            self,
            Self::Internal(_)
                | Self::Delivery(
                    DeliveryError::Http(_)
                        | DeliveryError::ProviderAuth { .. }
                        | DeliveryError::RequestFailed { .. }
                )
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Delivery(err) => match err {
                DeliveryError::CredentialsMissing
                | DeliveryError::ProviderAuth { .. }
                | DeliveryError::Http(_)
                | DeliveryError::RequestFailed { .. } => StatusCode::BAD_GATEWAY,
                DeliveryError::InvalidSignature | DeliveryError::InvalidPayload(_) => {
                    StatusCode::BAD_REQUEST
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Delivery(_) => "Delivery service error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "ok": false, "error": message }))).into_response()
    }
}
