//! Integration tests for the distance/fee pipeline.
//!
//! These pin the fee schedule and the haversine properties the checkout
//! flow depends on.

use plateful_core::GeoPoint;
use plateful_delivery::fees::{distance_km, fee_cents, haversine_km};

// =============================================================================
// Fee Schedule Tests
// =============================================================================

#[test]
fn test_absent_distance_gets_flat_base_fee() {
    assert_eq!(fee_cents(None), 800);
}

#[test]
fn test_base_fee_covers_first_eight_kilometres() {
    assert_eq!(fee_cents(Some(0.1)), 800);
    assert_eq!(fee_cents(Some(7.9)), 800);
    assert_eq!(fee_cents(Some(8.0)), 800);
}

#[test]
fn test_fee_increments_per_ceiled_kilometre() {
    // 8.1 ceils to 9
    assert_eq!(fee_cents(Some(8.1)), 900);
    assert_eq!(fee_cents(Some(9.0)), 900);
    assert_eq!(fee_cents(Some(9.01)), 1000);
    assert_eq!(fee_cents(Some(20.0)), 2000);
}

#[test]
fn test_degenerate_distances_get_flat_fee() {
    assert_eq!(fee_cents(Some(0.0)), 800);
    assert_eq!(fee_cents(Some(-1.0)), 800);
    assert_eq!(fee_cents(Some(f64::NAN)), 800);
    assert_eq!(fee_cents(Some(f64::INFINITY)), 800);
}

// =============================================================================
// Haversine Tests
// =============================================================================

#[test]
fn test_haversine_is_zero_on_identical_points() {
    let points = [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(43.6532, -79.3832),
        GeoPoint::new(-33.8688, 151.2093),
    ];
    for p in points {
        let d = haversine_km(p, p).expect("valid point");
        assert!(d.abs() < 1e-9, "distance from {p:?} to itself was {d}");
    }
}

#[test]
fn test_haversine_is_symmetric() {
    let a = GeoPoint::new(43.6532, -79.3832);
    let b = GeoPoint::new(45.5019, -73.5674);
    let ab = haversine_km(a, b).expect("valid points");
    let ba = haversine_km(b, a).expect("valid points");
    assert!((ab - ba).abs() < 1e-9);
}

#[test]
fn test_haversine_toronto_to_montreal() {
    // Roughly 500 km apart
    let toronto = GeoPoint::new(43.6532, -79.3832);
    let montreal = GeoPoint::new(45.5019, -73.5674);
    let d = haversine_km(toronto, montreal).expect("valid points");
    assert!((450.0..550.0).contains(&d), "got {d}");
}

#[test]
fn test_short_downtown_hop_costs_base_fee() {
    // End-to-end: pickup downtown, dropoff midtown, ~5.7 km, base fee
    let pickup = GeoPoint::new(43.6532, -79.3832);
    let dropoff = GeoPoint::new(43.7, -79.4);
    let d = distance_km(Some(pickup), Some(dropoff)).expect("valid points");
    assert!((d - 5.7).abs() < 0.3, "got {d}");
    assert_eq!(fee_cents(Some(d)), 800);
}

#[test]
fn test_missing_point_propagates_to_flat_fee() {
    let pickup = GeoPoint::new(43.6532, -79.3832);
    assert_eq!(distance_km(Some(pickup), None), None);
    assert_eq!(fee_cents(distance_km(Some(pickup), None)), 800);
}
