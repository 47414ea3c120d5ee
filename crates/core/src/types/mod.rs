//! Core types for Plateful.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod delivery;
pub mod geo;
pub mod money;

pub use address::Address;
pub use delivery::{DeliveryRecord, DeliveryStatus};
pub use geo::GeoPoint;
pub use money::Money;
