//! Integration tests for dispatch webhook verification and normalization.

use chrono::Utc;
use hmac::{Hmac, Mac};
use plateful_core::{Address, DeliveryRecord};
use plateful_delivery::webhook::{apply_update, parse_event, verify_signature};
use plateful_delivery::{DeliveryStore as _, InMemoryDeliveryStore, IngestOutcome, WebhookEvent};
use secrecy::SecretString;
use sha2::Sha256;

fn sign(body: &[u8], key: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes()).expect("hmac accepts any key");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

fn seeded_store() -> InMemoryDeliveryStore {
    let store = InMemoryDeliveryStore::new();
    let now = Utc::now();
    store.upsert(DeliveryRecord {
        delivery_id: "del_100".to_string(),
        external_id: "ord_100".to_string(),
        status: "pending".to_string(),
        tracking_url: None,
        fee: None,
        tip: None,
        pickup: Address::default(),
        dropoff: Address::default(),
        simulated: false,
        created_at: now,
        updated_at: now,
    });
    store
}

// =============================================================================
// Signature Verification Tests
// =============================================================================

#[test]
fn test_valid_signature_accepted() {
    let key = SecretString::from("whsec_test");
    let body = br#"{"event_type":"delivery.status","data":{"delivery_id":"del_100"}}"#;
    let sig = sign(body, "whsec_test");
    assert!(verify_signature(Some(&key), body, Some(&sig)).is_ok());
}

#[test]
fn test_any_flipped_signature_byte_rejected() {
    let key = SecretString::from("whsec_test");
    let body = br#"{"event_type":"delivery.status"}"#;
    let sig = sign(body, "whsec_test");

    for i in 0..sig.len() {
        let mut bytes = sig.clone().into_bytes();
        // Flip within the hex alphabet so the length stays valid
        bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(bytes).expect("still ascii");
        if tampered == sig {
            continue;
        }
        assert!(
            verify_signature(Some(&key), body, Some(&tampered)).is_err(),
            "flipped byte {i} was accepted"
        );
    }
}

#[test]
fn test_body_mutation_after_signing_rejected() {
    let key = SecretString::from("whsec_test");
    let body = br#"{"status":"delivered"}"#;
    let sig = sign(body, "whsec_test");
    let mutated = br#"{"status":"canceled"}"#;
    assert!(verify_signature(Some(&key), mutated, Some(&sig)).is_err());
}

#[test]
fn test_no_signing_key_accepts_everything() {
    assert!(verify_signature(None, b"{}", None).is_ok());
    assert!(verify_signature(None, b"{}", Some("garbage")).is_ok());
}

// =============================================================================
// Payload Normalization Tests
// =============================================================================

#[test]
fn test_snake_case_data_envelope() {
    let event = parse_event(
        br#"{"event_type":"x","data":{"delivery_id":"d1","status":"delivered"}}"#,
    )
    .expect("valid payload");
    assert_eq!(event.event_type.as_deref(), Some("x"));
    assert_eq!(event.delivery_id.as_deref(), Some("d1"));
    assert_eq!(event.status.as_deref(), Some("delivered"));
}

#[test]
fn test_resource_envelope_with_state_key() {
    let event = parse_event(br#"{"type":"y","resource":{"id":"d2","state":"picked_up"}}"#)
        .expect("valid payload");
    assert_eq!(event.event_type.as_deref(), Some("y"));
    assert_eq!(event.delivery_id.as_deref(), Some("d2"));
    assert_eq!(event.status.as_deref(), Some("picked_up"));
}

#[test]
fn test_flat_envelope_with_alternate_keys() {
    let event = parse_event(
        br#"{"event":"delivery.update","resource_id":"d3","current_status":"en_route","trackingUrl":"https://t/3"}"#,
    )
    .expect("valid payload");
    assert_eq!(event.delivery_id.as_deref(), Some("d3"));
    assert_eq!(event.status.as_deref(), Some("en_route"));
    assert_eq!(event.tracking_url.as_deref(), Some("https://t/3"));
}

#[test]
fn test_malformed_bodies_rejected() {
    assert!(parse_event(b"").is_err());
    assert!(parse_event(b"not json").is_err());
    assert!(parse_event(b"42").is_err());
    assert!(parse_event(b"[{}]").is_err());
}

// =============================================================================
// Update Policy Tests
// =============================================================================

#[test]
fn test_update_by_delivery_id() {
    let store = seeded_store();
    let event = parse_event(
        br#"{"event_type":"delivery.status","data":{"delivery_id":"del_100","status":"dropoff_complete","tracking_url":"https://t/100"}}"#,
    )
    .expect("valid payload");

    let outcome = apply_update(&store, &event);
    assert_eq!(
        outcome,
        IngestOutcome::Updated {
            delivery_id: "del_100".to_string()
        }
    );

    let record = store.find_by_delivery_id("del_100").expect("record exists");
    // Raw provider spelling is normalized into the known vocabulary
    assert_eq!(record.status, "delivered");
    assert_eq!(record.tracking_url.as_deref(), Some("https://t/100"));
}

#[test]
fn test_update_falls_back_to_external_id() {
    let store = seeded_store();
    let event = parse_event(
        br#"{"event_type":"delivery.status","data":{"external_id":"ord_100","status":"courier_accepted"}}"#,
    )
    .expect("valid payload");

    assert!(matches!(apply_update(&store, &event), IngestOutcome::Updated { .. }));
    assert_eq!(
        store.find_by_delivery_id("del_100").expect("record exists").status,
        "courier_accepted"
    );
}

#[test]
fn test_unknown_delivery_acknowledged_without_update() {
    let store = seeded_store();
    let event = WebhookEvent {
        delivery_id: Some("del_999".to_string()),
        status: Some("delivered".to_string()),
        ..WebhookEvent::default()
    };
    assert_eq!(apply_update(&store, &event), IngestOutcome::NotFound);
    // Seeded record untouched
    assert_eq!(
        store.find_by_delivery_id("del_100").expect("record exists").status,
        "pending"
    );
}

#[test]
fn test_informational_event_without_identifiers() {
    let store = seeded_store();
    let event = parse_event(br#"{"event_type":"courier.ping"}"#).expect("valid payload");
    assert_eq!(apply_update(&store, &event), IngestOutcome::NoTarget);
}
