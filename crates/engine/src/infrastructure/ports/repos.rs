//! Repository port traits for catalog storage.
//!
//! Stores assign identifiers and stamp `created_at`/`updated_at` on every
//! write. Name uniqueness (case-insensitive) is enforced by the store itself
//! and reported as `RepoError::Duplicate`, so a lost race between a rule check
//! and the write still cannot admit a duplicate.

use async_trait::async_trait;
use eventvenue_domain::{
    Event, EventDraft, EventFilter, EventId, EventSortField, Page, PageRequest, Venue, VenueDraft,
    VenueFilter, VenueId, VenueSortField,
};

use super::error::RepoError;

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepo: Send + Sync {
    // CRUD
    async fn insert(&self, draft: EventDraft) -> Result<Event, RepoError>;
    async fn update(&self, event: Event) -> Result<Event, RepoError>;
    async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError>;
    async fn exists(&self, id: EventId) -> Result<bool, RepoError>;
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: EventId) -> Result<bool, RepoError>;

    // Rule support
    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError>;
    async fn count_by_venue(&self, venue_id: VenueId) -> Result<u64, RepoError>;

    // Queries
    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>, RepoError>;
    async fn page(
        &self,
        filter: EventFilter,
        request: PageRequest<EventSortField>,
    ) -> Result<Page<Event>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueRepo: Send + Sync {
    // CRUD
    async fn insert(&self, draft: VenueDraft) -> Result<Venue, RepoError>;
    async fn update(&self, venue: Venue) -> Result<Venue, RepoError>;
    async fn get(&self, id: VenueId) -> Result<Option<Venue>, RepoError>;
    async fn exists(&self, id: VenueId) -> Result<bool, RepoError>;
    /// Returns `false` when nothing was deleted. Refuses with
    /// `RepoError::ConstraintViolation` while events still reference the venue.
    async fn delete(&self, id: VenueId) -> Result<bool, RepoError>;

    // Rule support
    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError>;

    // Queries
    async fn list(&self, filter: VenueFilter) -> Result<Vec<Venue>, RepoError>;
    async fn page(
        &self,
        filter: VenueFilter,
        request: PageRequest<VenueSortField>,
    ) -> Result<Page<Venue>, RepoError>;
}
