//! Catalog use cases: events and venues.
//!
//! Every mutating operation runs its rule checks and its single store write
//! while holding the catalog write lock, so cross-entity checks (venue exists
//! on event write, no events left on venue delete) never interleave within one
//! process. Name uniqueness is additionally enforced by the store.

mod event;
mod rules;
mod venue;

use std::sync::Arc;

use eventvenue_domain::DomainError;
use tokio::sync::Mutex;

use crate::infrastructure::ports::{ClockPort, EventRepo, RepoError, VenueRepo};
use crate::use_cases::validation::ValidationError;

pub use event::{EventCrud, EventSearch};
pub use rules::CatalogRules;
pub use venue::{VenueCrud, VenueSearch};

/// Shared error type for catalog use cases.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{entity_type} with ID {id} not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Repository error: {0}")]
    Repo(RepoError),
}

impl CatalogError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn duplicate_name(entity_type: &'static str, name: &str) -> Self {
        Self::Duplicate(format!("{entity_type} with name '{name}' already exists"))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<RepoError> for CatalogError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate { entity_type, name } => Self::duplicate_name(entity_type, &name),
            RepoError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        Self::InvalidArgument(err.message().to_string())
    }
}

/// Container for catalog use cases.
pub struct CatalogUseCases {
    pub event: EventCrud,
    pub venue: VenueCrud,
}

impl CatalogUseCases {
    pub fn new(
        events: Arc<dyn EventRepo>,
        venues: Arc<dyn VenueRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let rules = Arc::new(CatalogRules::new(
            events.clone(),
            venues.clone(),
            clock.clone(),
        ));
        let writes = Arc::new(Mutex::new(()));

        Self {
            event: EventCrud::new(
                events.clone(),
                venues.clone(),
                rules.clone(),
                clock,
                writes.clone(),
            ),
            venue: VenueCrud::new(venues, events, rules, writes),
        }
    }
}
