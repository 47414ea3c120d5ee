//! Integration tests for Plateful.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p plateful-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `delivery_fees` - Distance and fee schedule properties
//! - `delivery_dispatch` - Address formatting, region codes, fallback simulation
//! - `delivery_webhooks` - Signature verification and payload normalization
//! - `delivery_geocode` - Query building and staged fallbacks
//!
//! All tests run against the library crates' public APIs and need no network
//! or credentials; provider HTTP paths are covered by their pure decision
//! helpers (`should_simulate`, `simulated_quote`, query builders).
