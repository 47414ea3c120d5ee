//! Great-circle distance and the tiered delivery fee schedule.
//!
//! Pure functions: no I/O, deterministic, and no failure modes beyond input
//! validation (malformed coordinates collapse to the flat base fee).

use plateful_core::GeoPoint;

/// Mean Earth radius in kilometres, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Flat base fee in cents; also the fallback when distance is unknown.
pub const BASE_FEE_CENTS: i64 = 800;

/// Kilometres covered by the base fee.
pub const BASE_DISTANCE_KM: i64 = 8;

/// Surcharge in cents per kilometre beyond the base distance.
pub const PER_KM_CENTS: i64 = 100;

/// Great-circle distance between two points in kilometres.
///
/// Returns `None` when either point carries non-finite or out-of-range
/// coordinates.
#[must_use]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> Option<f64> {
    if !a.is_valid() || !b.is_valid() {
        return None;
    }

    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Some(EARTH_RADIUS_KM * c)
}

/// Distance between two optional points, `None` when either is missing.
#[must_use]
pub fn distance_km(a: Option<GeoPoint>, b: Option<GeoPoint>) -> Option<f64> {
    haversine_km(a?, b?)
}

/// Delivery fee in cents for a given distance.
///
/// Unknown, non-finite, or non-positive distances get the flat base fee.
/// Otherwise the raw distance is rounded up to whole kilometres; the base fee
/// covers the first [`BASE_DISTANCE_KM`] and every further kilometre adds
/// [`PER_KM_CENTS`].
#[must_use]
pub fn fee_cents(distance_km: Option<f64>) -> i64 {
    let Some(raw) = distance_km else {
        return BASE_FEE_CENTS;
    };
    if !raw.is_finite() || raw <= 0.0 {
        return BASE_FEE_CENTS;
    }

    // Ceiling is safe to cast: anything past ~20 000 km is not a deliverable
    // distance on this planet, but clamp regardless.
    #[allow(clippy::cast_possible_truncation)]
    let km = raw.ceil().min(1_000_000.0) as i64;

    if km <= BASE_DISTANCE_KM {
        BASE_FEE_CENTS
    } else {
        BASE_FEE_CENTS + (km - BASE_DISTANCE_KM) * PER_KM_CENTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_absent_distance_is_base() {
        assert_eq!(fee_cents(None), 800);
        assert_eq!(fee_cents(Some(f64::NAN)), 800);
        assert_eq!(fee_cents(Some(-3.0)), 800);
        assert_eq!(fee_cents(Some(0.0)), 800);
    }

    #[test]
    fn test_fee_bands() {
        assert_eq!(fee_cents(Some(0.5)), 800);
        assert_eq!(fee_cents(Some(8.0)), 800);
        // 8.1 ceils to 9: one extra kilometre
        assert_eq!(fee_cents(Some(8.1)), 900);
        // 20 km: 12 extra kilometres
        assert_eq!(fee_cents(Some(20.0)), 2000);
    }

    #[test]
    fn test_haversine_identical_points_is_zero() {
        let p = GeoPoint::new(43.6532, -79.3832);
        let d = haversine_km(p, p).unwrap();
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = GeoPoint::new(43.6532, -79.3832);
        let b = GeoPoint::new(49.2827, -123.1207);
        let ab = haversine_km(a, b).unwrap();
        let ba = haversine_km(b, a).unwrap();
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Downtown Toronto to midtown, roughly 5.7 km
        let a = GeoPoint::new(43.6532, -79.3832);
        let b = GeoPoint::new(43.7, -79.4);
        let d = haversine_km(a, b).unwrap();
        assert!((d - 5.7).abs() < 0.3, "got {d}");
        assert_eq!(fee_cents(Some(d)), 800);
    }

    #[test]
    fn test_haversine_rejects_invalid_points() {
        let good = GeoPoint::new(43.0, -79.0);
        let bad = GeoPoint::new(f64::NAN, -79.0);
        assert!(haversine_km(good, bad).is_none());
        assert!(distance_km(Some(good), None).is_none());
    }
}
