//! Event operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eventvenue_domain::{
    Event, EventDraft, EventFilter, EventId, EventPatch, EventSortField, Page, PageRequest,
    VenueId,
};
use tokio::sync::Mutex;

use super::{CatalogError, CatalogRules};
use crate::infrastructure::ports::{ClockPort, EventRepo, VenueRepo};

/// Optional criteria accepted by event search. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSearch {
    pub venue_id: Option<VenueId>,
    pub active: Option<bool>,
    /// Events on or after this instant.
    pub start_date: Option<DateTime<Utc>>,
}

pub struct EventCrud {
    events: Arc<dyn EventRepo>,
    venues: Arc<dyn VenueRepo>,
    rules: Arc<CatalogRules>,
    clock: Arc<dyn ClockPort>,
    writes: Arc<Mutex<()>>,
}

impl EventCrud {
    pub fn new(
        events: Arc<dyn EventRepo>,
        venues: Arc<dyn VenueRepo>,
        rules: Arc<CatalogRules>,
        clock: Arc<dyn ClockPort>,
        writes: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            events,
            venues,
            rules,
            clock,
            writes,
        }
    }

    pub async fn create(&self, draft: EventDraft) -> Result<Event, CatalogError> {
        let _guard = self.writes.lock().await;

        if let Err(e) = self.rules.validate_create_event(&draft).await {
            tracing::warn!(name = %draft.name, error = %e, "Event creation rejected");
            return Err(e);
        }
        let event = self.events.insert(draft).await?;

        tracing::info!(event_id = %event.id, name = %event.name, "Event created");
        Ok(event)
    }

    pub async fn get(&self, id: EventId) -> Result<Event, CatalogError> {
        self.events
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Event", id))
    }

    pub async fn list(&self) -> Result<Vec<Event>, CatalogError> {
        Ok(self.events.list(EventFilter::default()).await?)
    }

    /// Overwrite the fields the patch sets; `updated_at` is stamped by the store.
    pub async fn update(&self, id: EventId, patch: EventPatch) -> Result<Event, CatalogError> {
        let _guard = self.writes.lock().await;

        let mut event = match self.rules.validate_update_event(id, &patch).await {
            Ok(existing) => existing,
            Err(e) => {
                tracing::warn!(event_id = %id, error = %e, "Event update rejected");
                return Err(e);
            }
        };
        event.apply(patch);
        let event = self.events.update(event).await?;

        tracing::info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    pub async fn delete(&self, id: EventId) -> Result<(), CatalogError> {
        let _guard = self.writes.lock().await;

        self.rules.validate_delete_event(id).await?;
        if !self.events.delete(id).await? {
            return Err(CatalogError::not_found("Event", id));
        }

        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn list_by_venue(&self, venue_id: VenueId) -> Result<Vec<Event>, CatalogError> {
        if !self.venues.exists(venue_id).await? {
            return Err(CatalogError::not_found("Venue", venue_id));
        }
        Ok(self.events.list(EventFilter::for_venue(venue_id)).await?)
    }

    pub async fn list_active(&self) -> Result<Vec<Event>, CatalogError> {
        Ok(self.events.list(EventFilter::active_only()).await?)
    }

    /// Events dated strictly after the current clock reading.
    pub async fn list_upcoming(&self) -> Result<Vec<Event>, CatalogError> {
        let now = self.clock.now();
        Ok(self.events.list(EventFilter::upcoming(now)).await?)
    }

    /// Events dated within `[start, end]`.
    pub async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, CatalogError> {
        if start > end {
            return Err(CatalogError::invalid(
                "Start date must be before or equal to end date",
            ));
        }
        Ok(self.events.list(EventFilter::between(start, end)).await?)
    }

    pub async fn page_all(
        &self,
        request: PageRequest<EventSortField>,
    ) -> Result<Page<Event>, CatalogError> {
        Ok(self.events.page(EventFilter::default(), request).await?)
    }

    pub async fn page_active(
        &self,
        request: PageRequest<EventSortField>,
    ) -> Result<Page<Event>, CatalogError> {
        Ok(self.events.page(EventFilter::active_only(), request).await?)
    }

    pub async fn page_upcoming(
        &self,
        request: PageRequest<EventSortField>,
    ) -> Result<Page<Event>, CatalogError> {
        let now = self.clock.now();
        Ok(self.events.page(EventFilter::upcoming(now), request).await?)
    }

    pub async fn search(
        &self,
        criteria: EventSearch,
        request: PageRequest<EventSortField>,
    ) -> Result<Page<Event>, CatalogError> {
        let filter = EventFilter {
            venue_id: criteria.venue_id,
            active: criteria.active,
            date_from: criteria.start_date,
            ..EventFilter::default()
        };
        Ok(self.events.page(filter, request).await?)
    }
}
