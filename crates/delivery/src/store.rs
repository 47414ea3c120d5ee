//! The persistence seam for delivery records.
//!
//! Order persistence belongs to the platform's document store, outside this
//! crate. Webhook ingestion and on-demand polls only need three operations,
//! captured here as a trait so the real store and the in-memory test store
//! are interchangeable.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use plateful_core::DeliveryRecord;

/// Lookup and upsert operations over persisted delivery records.
pub trait DeliveryStore: Send + Sync {
    /// Find a record by the provider's delivery ID.
    fn find_by_delivery_id(&self, delivery_id: &str) -> Option<DeliveryRecord>;

    /// Find a record by our correlation ID.
    fn find_by_external_id(&self, external_id: &str) -> Option<DeliveryRecord>;

    /// Insert or replace a record, keyed by its delivery ID.
    fn upsert(&self, record: DeliveryRecord);
}

/// Map-backed store for the server binary and tests.
#[derive(Debug, Default)]
pub struct InMemoryDeliveryStore {
    records: RwLock<HashMap<String, DeliveryRecord>>,
}

impl InMemoryDeliveryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, DeliveryRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeliveryStore for InMemoryDeliveryStore {
    fn find_by_delivery_id(&self, delivery_id: &str) -> Option<DeliveryRecord> {
        self.read().get(delivery_id).cloned()
    }

    fn find_by_external_id(&self, external_id: &str) -> Option<DeliveryRecord> {
        self.read()
            .values()
            .find(|record| record.external_id == external_id)
            .cloned()
    }

    fn upsert(&self, record: DeliveryRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.delivery_id.clone(), record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use plateful_core::Address;

    fn record(delivery_id: &str, external_id: &str) -> DeliveryRecord {
        let now = Utc::now();
        DeliveryRecord {
            delivery_id: delivery_id.to_string(),
            external_id: external_id.to_string(),
            status: "pending".to_string(),
            tracking_url: None,
            fee: None,
            tip: None,
            pickup: Address::default(),
            dropoff: Address::default(),
            simulated: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_lookup_by_both_ids() {
        let store = InMemoryDeliveryStore::new();
        store.upsert(record("del_1", "ord_1"));

        assert!(store.find_by_delivery_id("del_1").is_some());
        assert!(store.find_by_external_id("ord_1").is_some());
        assert!(store.find_by_delivery_id("del_2").is_none());
        assert!(store.find_by_external_id("ord_2").is_none());
    }

    #[test]
    fn test_upsert_replaces() {
        let store = InMemoryDeliveryStore::new();
        store.upsert(record("del_1", "ord_1"));

        let mut updated = record("del_1", "ord_1");
        updated.status = "delivered".to_string();
        store.upsert(updated);

        let found = store.find_by_delivery_id("del_1").unwrap();
        assert_eq!(found.status, "delivered");
    }
}
