//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    memory::MemoryCatalogStore,
    ports::{ClockPort, EventRepo, VenueRepo},
};
use crate::use_cases;

/// Main application state.
///
/// Holds the use cases built on the injected store ports.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub catalog: use_cases::CatalogUseCases,
}

impl App {
    /// Create a new App with the given store adapters.
    pub fn new(
        event: Arc<dyn EventRepo>,
        venue: Arc<dyn VenueRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let catalog = use_cases::CatalogUseCases::new(event, venue, clock);

        Self {
            use_cases: UseCases { catalog },
        }
    }

    /// App backed by a fresh in-memory store.
    pub fn in_memory(clock: Arc<dyn ClockPort>) -> Self {
        let store = Arc::new(MemoryCatalogStore::new(clock.clone()));
        Self::new(store.clone(), store, clock)
    }
}
