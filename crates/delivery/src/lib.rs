//! Plateful delivery dispatch integration.
//!
//! Everything between the ordering platform and the courier world lives here:
//!
//! - [`geocode`] - forward geocoding with staged fallback queries and a
//!   bounded in-process cache
//! - [`fees`] - great-circle distance and the tiered delivery fee schedule
//! - [`token`] - OAuth client-credentials token cache for the dispatch provider
//! - [`dispatch`] - quote/create/get calls against the dispatch provider,
//!   including the sandbox fallback simulation
//! - [`webhook`] - inbound webhook signature verification and payload
//!   normalization
//! - [`store`] - the seam through which webhook and poll updates reach
//!   persisted delivery records
//!
//! # Architecture
//!
//! The crate performs outbound HTTP but owns no persistence: delivery records
//! are handed to a [`store::DeliveryStore`] supplied by the caller. All
//! provider failures surface as typed [`DeliveryError`] values; geocoding
//! fails softly (an unresolvable address is `None`, never an error).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fees;
pub mod geocode;
pub mod regions;
pub mod store;
pub mod token;
pub mod webhook;

pub use config::{DispatchConfig, DispatchEnvironment};
pub use dispatch::{DispatchClient, ManifestItem, QuoteResult, Waypoint};
pub use error::DeliveryError;
pub use geocode::GeoResolver;
pub use store::{DeliveryStore, InMemoryDeliveryStore};
pub use token::TokenManager;
pub use webhook::{IngestOutcome, WebhookEvent};
