//! Admissibility checks for catalog writes.
//!
//! Checks run in a fixed order and stop at the first violation. They only read
//! the store. Each update check resolves the stored record and hands it back so
//! the caller can merge the patch without a second lookup.

use std::sync::Arc;

use eventvenue_domain::{
    Event, EventDraft, EventId, EventPatch, Venue, VenueDraft, VenueId, VenuePatch,
};

use super::CatalogError;
use crate::infrastructure::ports::{ClockPort, EventRepo, VenueRepo};
use crate::use_cases::validation::{
    require_future, require_non_empty, require_non_negative, require_positive,
};

pub struct CatalogRules {
    events: Arc<dyn EventRepo>,
    venues: Arc<dyn VenueRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CatalogRules {
    pub fn new(
        events: Arc<dyn EventRepo>,
        venues: Arc<dyn VenueRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            events,
            venues,
            clock,
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub async fn validate_create_event(&self, draft: &EventDraft) -> Result<(), CatalogError> {
        require_non_empty(&draft.name, "Event name")?;
        self.require_unique_event_name(&draft.name).await?;
        if let Some(venue_id) = draft.venue_id {
            self.require_venue(venue_id).await?;
        }
        require_future(draft.event_date, self.clock.now(), "Event date")?;
        if let Some(capacity) = draft.capacity {
            require_positive(capacity, "Capacity")?;
        }
        require_non_negative(draft.ticket_price, "Ticket price")?;
        Ok(())
    }

    /// Returns the stored event the patch applies to.
    pub async fn validate_update_event(
        &self,
        id: EventId,
        patch: &EventPatch,
    ) -> Result<Event, CatalogError> {
        let existing = self
            .events
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Event", id))?;

        if let Some(name) = patch.name.as_set() {
            require_non_empty(name, "Event name")?;
            if !existing.has_name(name) {
                self.require_unique_event_name(name).await?;
            }
        }
        if let Some(venue_id) = patch.venue_id.as_set() {
            self.require_venue(*venue_id).await?;
        }
        if let Some(event_date) = patch.event_date.as_set() {
            require_future(*event_date, self.clock.now(), "Event date")?;
        }
        if let Some(capacity) = patch.capacity.as_set() {
            require_positive(*capacity, "Capacity")?;
        }
        if let Some(ticket_price) = patch.ticket_price.as_set() {
            require_non_negative(*ticket_price, "Ticket price")?;
        }
        Ok(existing)
    }

    pub async fn validate_delete_event(&self, id: EventId) -> Result<(), CatalogError> {
        if !self.events.exists(id).await? {
            return Err(CatalogError::not_found("Event", id));
        }
        Ok(())
    }

    // =========================================================================
    // Venues
    // =========================================================================

    pub async fn validate_create_venue(&self, draft: &VenueDraft) -> Result<(), CatalogError> {
        require_non_empty(&draft.name, "Venue name")?;
        self.require_unique_venue_name(&draft.name).await?;
        require_non_empty(&draft.address, "Address")?;
        require_non_empty(&draft.city, "City")?;
        require_positive(draft.max_capacity, "Max capacity")?;
        Ok(())
    }

    /// Returns the stored venue the patch applies to.
    pub async fn validate_update_venue(
        &self,
        id: VenueId,
        patch: &VenuePatch,
    ) -> Result<Venue, CatalogError> {
        let existing = self
            .venues
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Venue", id))?;

        if let Some(name) = patch.name.as_set() {
            require_non_empty(name, "Venue name")?;
            if !existing.has_name(name) {
                self.require_unique_venue_name(name).await?;
            }
        }
        if let Some(address) = patch.address.as_set() {
            require_non_empty(address, "Address")?;
        }
        if let Some(city) = patch.city.as_set() {
            require_non_empty(city, "City")?;
        }
        if let Some(max_capacity) = patch.max_capacity.as_set() {
            require_positive(*max_capacity, "Max capacity")?;
        }
        Ok(existing)
    }

    pub async fn validate_delete_venue(&self, id: VenueId) -> Result<(), CatalogError> {
        self.require_venue(id).await?;
        let dependents = self.events.count_by_venue(id).await?;
        if dependents > 0 {
            return Err(CatalogError::invalid(format!(
                "Cannot delete venue with ID {id} because it has {dependents} associated event(s)"
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Shared lookups
    // =========================================================================

    pub async fn require_venue(&self, id: VenueId) -> Result<(), CatalogError> {
        if !self.venues.exists(id).await? {
            return Err(CatalogError::not_found("Venue", id));
        }
        Ok(())
    }

    async fn require_unique_event_name(&self, name: &str) -> Result<(), CatalogError> {
        if self.events.exists_by_name(name).await? {
            return Err(CatalogError::duplicate_name("Event", name));
        }
        Ok(())
    }

    async fn require_unique_venue_name(&self, name: &str) -> Result<(), CatalogError> {
        if self.venues.exists_by_name(name).await? {
            return Err(CatalogError::duplicate_name("Venue", name));
        }
        Ok(())
    }
}
