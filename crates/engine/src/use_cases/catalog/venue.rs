//! Venue operations.

use std::sync::Arc;

use eventvenue_domain::{
    Page, PageRequest, Venue, VenueDraft, VenueFilter, VenueId, VenuePatch, VenueSortField,
};
use tokio::sync::Mutex;

use super::{CatalogError, CatalogRules};
use crate::infrastructure::ports::{EventRepo, VenueRepo};

/// Optional criteria accepted by venue search. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueSearch {
    /// Case-insensitive exact city; blank is treated as unset.
    pub city: Option<String>,
    pub available: Option<bool>,
    pub min_capacity: Option<i32>,
}

pub struct VenueCrud {
    venues: Arc<dyn VenueRepo>,
    events: Arc<dyn EventRepo>,
    rules: Arc<CatalogRules>,
    writes: Arc<Mutex<()>>,
}

impl VenueCrud {
    pub fn new(
        venues: Arc<dyn VenueRepo>,
        events: Arc<dyn EventRepo>,
        rules: Arc<CatalogRules>,
        writes: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            venues,
            events,
            rules,
            writes,
        }
    }

    pub async fn create(&self, draft: VenueDraft) -> Result<Venue, CatalogError> {
        let _guard = self.writes.lock().await;

        if let Err(e) = self.rules.validate_create_venue(&draft).await {
            tracing::warn!(name = %draft.name, error = %e, "Venue creation rejected");
            return Err(e);
        }
        let venue = self.venues.insert(draft).await?;

        tracing::info!(venue_id = %venue.id, name = %venue.name, "Venue created");
        Ok(venue)
    }

    pub async fn get(&self, id: VenueId) -> Result<Venue, CatalogError> {
        self.venues
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Venue", id))
    }

    pub async fn list(&self) -> Result<Vec<Venue>, CatalogError> {
        Ok(self.venues.list(VenueFilter::default()).await?)
    }

    pub async fn update(&self, id: VenueId, patch: VenuePatch) -> Result<Venue, CatalogError> {
        let _guard = self.writes.lock().await;
        self.apply_patch(id, patch).await
    }

    pub async fn delete(&self, id: VenueId) -> Result<(), CatalogError> {
        let _guard = self.writes.lock().await;

        if let Err(e) = self.rules.validate_delete_venue(id).await {
            tracing::warn!(venue_id = %id, error = %e, "Venue deletion rejected");
            return Err(e);
        }
        if !self.venues.delete(id).await? {
            return Err(CatalogError::not_found("Venue", id));
        }

        tracing::info!(venue_id = %id, "Venue deleted");
        Ok(())
    }

    pub async fn mark_available(&self, id: VenueId) -> Result<Venue, CatalogError> {
        let _guard = self.writes.lock().await;
        self.apply_patch(id, VenuePatch::availability(true)).await
    }

    pub async fn mark_unavailable(&self, id: VenueId) -> Result<Venue, CatalogError> {
        let _guard = self.writes.lock().await;
        self.apply_patch(id, VenuePatch::availability(false)).await
    }

    /// Caller must hold the write lock.
    async fn apply_patch(&self, id: VenueId, patch: VenuePatch) -> Result<Venue, CatalogError> {
        let mut venue = match self.rules.validate_update_venue(id, &patch).await {
            Ok(existing) => existing,
            Err(e) => {
                tracing::warn!(venue_id = %id, error = %e, "Venue update rejected");
                return Err(e);
            }
        };
        venue.apply(patch);
        let venue = self.venues.update(venue).await?;

        tracing::info!(venue_id = %venue.id, available = venue.available, "Venue updated");
        Ok(venue)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn list_by_city(&self, city: &str) -> Result<Vec<Venue>, CatalogError> {
        if city.trim().is_empty() {
            return Err(CatalogError::invalid("City cannot be empty"));
        }
        Ok(self.venues.list(VenueFilter::in_city(city.trim())).await?)
    }

    /// `None` mirrors a request that omitted the flag altogether.
    pub async fn list_by_availability(
        &self,
        available: Option<bool>,
    ) -> Result<Vec<Venue>, CatalogError> {
        let available =
            available.ok_or_else(|| CatalogError::invalid("Available status cannot be null"))?;
        Ok(self.venues.list(VenueFilter::availability(available)).await?)
    }

    pub async fn list_available(&self) -> Result<Vec<Venue>, CatalogError> {
        self.list_by_availability(Some(true)).await
    }

    pub async fn list_min_capacity(&self, capacity: i32) -> Result<Vec<Venue>, CatalogError> {
        if capacity <= 0 {
            return Err(CatalogError::invalid("Min capacity must be positive"));
        }
        Ok(self.venues.list(VenueFilter::min_capacity(capacity)).await?)
    }

    pub async fn count_events(&self, id: VenueId) -> Result<u64, CatalogError> {
        self.rules.require_venue(id).await?;
        Ok(self.events.count_by_venue(id).await?)
    }

    pub async fn page_all(
        &self,
        request: PageRequest<VenueSortField>,
    ) -> Result<Page<Venue>, CatalogError> {
        Ok(self.venues.page(VenueFilter::default(), request).await?)
    }

    pub async fn search(
        &self,
        criteria: VenueSearch,
        request: PageRequest<VenueSortField>,
    ) -> Result<Page<Venue>, CatalogError> {
        let filter = VenueFilter {
            city: criteria
                .city
                .map(|city| city.trim().to_string())
                .filter(|city| !city.is_empty()),
            available: criteria.available,
            min_capacity: criteria.min_capacity,
        };
        Ok(self.venues.page(filter, request).await?)
    }
}
