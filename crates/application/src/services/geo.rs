//! Geocoding port: free-text address to grid location.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Location;
use thiserror::Error;

/// A failed geocoding lookup, wrapping the transport's original cause.
#[derive(Debug, Error)]
#[error("geo lookup failed for address {address:?}")]
pub struct GeoError {
    pub address: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl GeoError {
    pub fn new(
        address: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            address: address.into(),
            source: source.into(),
        }
    }
}

/// Translates a free-text address into a grid location.
#[async_trait]
pub trait GeoClient: Send + Sync {
    async fn get_location(&self, address: &str) -> Result<Location, GeoError>;
}

#[derive(Debug, Default)]
struct GeoState {
    addresses: HashMap<String, Location>,
    fail_next: bool,
}

/// In-memory geo client for tests: a fixed address book and a fail toggle.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGeoClient {
    state: Arc<RwLock<GeoState>>,
}

impl InMemoryGeoClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an address with its location.
    pub fn insert(&self, address: impl Into<String>, location: Location) {
        self.state
            .write()
            .unwrap()
            .addresses
            .insert(address.into(), location);
    }

    /// Makes the next lookup fail.
    pub fn set_fail_next(&self, fail: bool) {
        self.state.write().unwrap().fail_next = fail;
    }
}

#[async_trait]
impl GeoClient for InMemoryGeoClient {
    async fn get_location(&self, address: &str) -> Result<Location, GeoError> {
        let mut state = self.state.write().unwrap();
        if state.fail_next {
            state.fail_next = false;
            return Err(GeoError::new(address, "geo service unavailable"));
        }

        state
            .addresses
            .get(address)
            .copied()
            .ok_or_else(|| GeoError::new(address, "address not found"))
    }
}
