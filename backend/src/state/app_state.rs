//! Application state
//!
//! The store handle and the enrichment client, constructed once at startup
//! and cloned into each request.

use crate::enrichment::EnrichmentClient;
use crate::songs::SongStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Song persistence
    pub store: Arc<dyn SongStore>,
    /// External song details lookup
    pub enrichment: Arc<EnrichmentClient>,
}

impl AppState {
    /// Bundle a store and an enrichment client
    pub fn new(store: Arc<dyn SongStore>, enrichment: EnrichmentClient) -> Self {
        Self {
            store,
            enrichment: Arc::new(enrichment),
        }
    }
}
