//! Delivery records and status normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, Money};

/// Known delivery status vocabulary.
///
/// The dispatch provider reports status as an opaque string; we normalize the
/// spellings we recognize and pass everything else through untouched. This
/// component does not interpret transitions or enforce terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    CourierAccepted,
    PickupInProgress,
    PickupComplete,
    DropoffInProgress,
    Delivered,
    Canceled,
    Returned,
}

impl DeliveryStatus {
    /// Canonical snake_case spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::CourierAccepted => "courier_accepted",
            Self::PickupInProgress => "pickup_in_progress",
            Self::PickupComplete => "pickup_complete",
            Self::DropoffInProgress => "dropoff_in_progress",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
            Self::Returned => "returned",
        }
    }

    /// Normalize a raw provider status string.
    ///
    /// Recognized spellings (case-insensitive, hyphens treated as underscores)
    /// map to the canonical vocabulary; anything else comes back trimmed and
    /// lower-cased so callers always store a single consistent form.
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        let canonical = raw.trim().to_ascii_lowercase().replace('-', "_");
        let known = match canonical.as_str() {
            "pending" => Some(Self::Pending),
            "courier_accepted" | "accepted" => Some(Self::CourierAccepted),
            "pickup_in_progress" | "pickup" => Some(Self::PickupInProgress),
            "pickup_complete" | "picked_up" => Some(Self::PickupComplete),
            "dropoff_in_progress" | "dropoff" | "en_route" => Some(Self::DropoffInProgress),
            "delivered" | "dropoff_complete" => Some(Self::Delivered),
            "canceled" | "cancelled" => Some(Self::Canceled),
            "returned" => Some(Self::Returned),
            _ => None,
        };
        known.map_or(canonical, |status| status.as_str().to_string())
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed, trackable delivery job as the dispatch provider sees it.
///
/// Created when a delivery is requested; mutated by webhook events or by an
/// on-demand poll of the provider. The owning order's lifecycle (and its
/// persistence) live outside this subsystem, so records are never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Provider-assigned delivery ID.
    pub delivery_id: String,
    /// Caller-chosen correlation ID, used before the provider ID is known.
    pub external_id: String,
    /// Current status, normalized via [`DeliveryStatus::normalize`].
    pub status: String,
    /// Courier tracking page, when the provider shares one.
    pub tracking_url: Option<String>,
    /// Quoted or charged delivery fee.
    pub fee: Option<Money>,
    /// Courier tip, echoed back from the create request.
    pub tip: Option<Money>,
    /// Pickup address, copied by value at request time.
    pub pickup: Address,
    /// Dropoff address, copied by value at request time.
    pub dropoff: Address,
    /// Whether this record came from the sandbox fallback simulation.
    #[serde(default)]
    pub simulated: bool,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record last changed.
    pub updated_at: DateTime<Utc>,
}

impl DeliveryRecord {
    /// Apply a partial status update, touching only the fields present.
    ///
    /// Used by webhook ingestion and by on-demand polls; absent fields leave
    /// the stored values alone.
    pub fn apply_update(&mut self, status: Option<&str>, tracking_url: Option<&str>) {
        if let Some(status) = status {
            self.status = DeliveryStatus::normalize(status);
        }
        if let Some(url) = tracking_url {
            self.tracking_url = Some(url.to_string());
        }
        if status.is_some() || tracking_url.is_some() {
            self.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_spellings() {
        assert_eq!(DeliveryStatus::normalize("Courier_Accepted"), "courier_accepted");
        assert_eq!(DeliveryStatus::normalize("picked-up"), "pickup_complete");
        assert_eq!(DeliveryStatus::normalize("cancelled"), "canceled");
        assert_eq!(DeliveryStatus::normalize("dropoff_complete"), "delivered");
    }

    #[test]
    fn test_normalize_passes_unknown_through() {
        assert_eq!(DeliveryStatus::normalize("  Batch_Assigned "), "batch_assigned");
    }

    #[test]
    fn test_apply_update_is_partial() {
        let mut record = DeliveryRecord {
            delivery_id: "del_1".to_string(),
            external_id: "ord_1".to_string(),
            status: "pending".to_string(),
            tracking_url: Some("https://track.example/del_1".to_string()),
            fee: None,
            tip: None,
            pickup: Address::default(),
            dropoff: Address::default(),
            simulated: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        record.apply_update(Some("delivered"), None);
        assert_eq!(record.status, "delivered");
        assert_eq!(
            record.tracking_url.as_deref(),
            Some("https://track.example/del_1")
        );

        record.apply_update(None, Some("https://track.example/new"));
        assert_eq!(record.status, "delivered");
        assert_eq!(record.tracking_url.as_deref(), Some("https://track.example/new"));
    }
}
