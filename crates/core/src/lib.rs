//! Plateful Core - Shared types library.
//!
//! This crate provides common types used across all Plateful components:
//! - `delivery` - Delivery dispatch integration (geocoding, quotes, webhooks)
//! - `server` - Public HTTP surface for the ordering platform
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Addresses, coordinates, money, and delivery records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
