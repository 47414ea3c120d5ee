//! Application state shared across handlers.

use std::sync::Arc;

use plateful_delivery::{DispatchClient, GeoResolver, InMemoryDeliveryStore};

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the geocoder, the dispatch client, and the
/// delivery record store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    geocoder: GeoResolver,
    dispatch: DispatchClient,
    store: InMemoryDeliveryStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let geocoder = GeoResolver::new(config.default_country.clone())?;
        let dispatch = DispatchClient::new(config.dispatch.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                geocoder,
                dispatch,
                store: InMemoryDeliveryStore::new(),
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the geocode resolver.
    #[must_use]
    pub fn geocoder(&self) -> &GeoResolver {
        &self.inner.geocoder
    }

    /// Get a reference to the dispatch provider client.
    #[must_use]
    pub fn dispatch(&self) -> &DispatchClient {
        &self.inner.dispatch
    }

    /// Get a reference to the delivery record store.
    #[must_use]
    pub fn store(&self) -> &InMemoryDeliveryStore {
        &self.inner.store
    }
}
