//! In-memory catalog store.
//!
//! Both tables sit behind one `RwLock`, so every write sees a consistent view of
//! the other table: name uniqueness and the venue delete restriction are checked
//! and applied under the same write guard. Listing order is insertion order.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use eventvenue_domain::{
    Event, EventDraft, EventFilter, EventId, EventSortField, Page, PageRequest, Venue, VenueDraft,
    VenueFilter, VenueId, VenueSortField,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{ClockPort, EventRepo, RepoError, VenueRepo};

#[derive(Default)]
struct Tables {
    events: BTreeMap<EventId, Event>,
    venues: BTreeMap<VenueId, Venue>,
    last_event_id: i64,
    last_venue_id: i64,
}

impl Tables {
    fn event_name_taken(&self, name: &str, except: Option<EventId>) -> bool {
        self.events
            .values()
            .any(|event| Some(event.id) != except && event.has_name(name))
    }

    fn venue_name_taken(&self, name: &str, except: Option<VenueId>) -> bool {
        self.venues
            .values()
            .any(|venue| Some(venue.id) != except && venue.has_name(name))
    }

    fn events_at(&self, venue_id: VenueId) -> u64 {
        self.events
            .values()
            .filter(|event| event.venue_id == Some(venue_id))
            .count() as u64
    }

    fn require_venue(&self, venue_id: Option<VenueId>) -> Result<(), RepoError> {
        match venue_id {
            Some(id) if !self.venues.contains_key(&id) => Err(RepoError::constraint(format!(
                "event references missing venue {}",
                id
            ))),
            _ => Ok(()),
        }
    }
}

/// Memory-backed implementation of both catalog repositories.
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
    clock: Arc<dyn ClockPort>,
}

impl MemoryCatalogStore {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }
}

fn paginate<T: Clone, F: eventvenue_domain::SortField>(
    mut rows: Vec<T>,
    request: &PageRequest<F>,
    compare: impl Fn(&T, &T) -> std::cmp::Ordering,
) -> Page<T> {
    let sort = request.sort();
    // Stable sort keeps insertion order between equal keys.
    rows.sort_by(|a, b| sort.direction.orient(compare(a, b)));
    let total = rows.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let items = rows
        .into_iter()
        .skip(offset)
        .take(request.size() as usize)
        .collect();
    Page::new(items, request, total)
}

#[async_trait]
impl EventRepo for MemoryCatalogStore {
    async fn insert(&self, draft: EventDraft) -> Result<Event, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.event_name_taken(&draft.name, None) {
            return Err(RepoError::duplicate("Event", &draft.name));
        }
        tables.require_venue(draft.venue_id)?;

        tables.last_event_id += 1;
        let id = EventId::new(tables.last_event_id);
        let event = Event::from_draft(id, draft, self.clock.now());
        tables.events.insert(id, event.clone());
        Ok(event)
    }

    async fn update(&self, mut event: Event) -> Result<Event, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.events.get(&event.id) else {
            return Err(RepoError::not_found("Event", event.id));
        };
        let created_at = stored.created_at;
        if tables.event_name_taken(&event.name, Some(event.id)) {
            return Err(RepoError::duplicate("Event", &event.name));
        }
        tables.require_venue(event.venue_id)?;

        event.created_at = created_at;
        event.updated_at = self.clock.now();
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn exists(&self, id: EventId) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.events.contains_key(&id))
    }

    async fn delete(&self, id: EventId) -> Result<bool, RepoError> {
        Ok(self.tables.write().await.events.remove(&id).is_some())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.event_name_taken(name, None))
    }

    async fn count_by_venue(&self, venue_id: VenueId) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.events_at(venue_id))
    }

    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect())
    }

    async fn page(
        &self,
        filter: EventFilter,
        request: PageRequest<EventSortField>,
    ) -> Result<Page<Event>, RepoError> {
        let rows = EventRepo::list(self, filter).await?;
        let field = request.sort().field;
        Ok(paginate(rows, &request, |a, b| field.compare(a, b)))
    }
}

#[async_trait]
impl VenueRepo for MemoryCatalogStore {
    async fn insert(&self, draft: VenueDraft) -> Result<Venue, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.venue_name_taken(&draft.name, None) {
            return Err(RepoError::duplicate("Venue", &draft.name));
        }

        tables.last_venue_id += 1;
        let id = VenueId::new(tables.last_venue_id);
        let venue = Venue::from_draft(id, draft, self.clock.now());
        tables.venues.insert(id, venue.clone());
        Ok(venue)
    }

    async fn update(&self, mut venue: Venue) -> Result<Venue, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.venues.get(&venue.id) else {
            return Err(RepoError::not_found("Venue", venue.id));
        };
        let created_at = stored.created_at;
        if tables.venue_name_taken(&venue.name, Some(venue.id)) {
            return Err(RepoError::duplicate("Venue", &venue.name));
        }

        venue.created_at = created_at;
        venue.updated_at = self.clock.now();
        tables.venues.insert(venue.id, venue.clone());
        Ok(venue)
    }

    async fn get(&self, id: VenueId) -> Result<Option<Venue>, RepoError> {
        Ok(self.tables.read().await.venues.get(&id).cloned())
    }

    async fn exists(&self, id: VenueId) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.venues.contains_key(&id))
    }

    async fn delete(&self, id: VenueId) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let dependents = tables.events_at(id);
        if dependents > 0 {
            return Err(RepoError::constraint(format!(
                "venue {} is referenced by {} event(s)",
                id, dependents
            )));
        }
        Ok(tables.venues.remove(&id).is_some())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.venue_name_taken(name, None))
    }

    async fn list(&self, filter: VenueFilter) -> Result<Vec<Venue>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .venues
            .values()
            .filter(|venue| filter.matches(venue))
            .cloned()
            .collect())
    }

    async fn page(
        &self,
        filter: VenueFilter,
        request: PageRequest<VenueSortField>,
    ) -> Result<Page<Venue>, RepoError> {
        let rows = VenueRepo::list(self, filter).await?;
        let field = request.sort().field;
        Ok(paginate(rows, &request, |a, b| field.compare(a, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};
    use eventvenue_domain::{Sort, SortDirection};

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::starting_at(
            Utc.with_ymd_and_hms(2030, 6, 1, 9, 0, 0).single().expect("valid"),
        ))
    }

    fn venue_draft(name: &str, city: &str, max_capacity: i32) -> VenueDraft {
        VenueDraft {
            name: name.to_string(),
            address: "1 Main Street".to_string(),
            city: city.to_string(),
            country: None,
            max_capacity,
            venue_type: None,
            available: None,
        }
    }

    fn event_draft(name: &str, venue_id: Option<VenueId>, clock: &ManualClock) -> EventDraft {
        EventDraft {
            name: name.to_string(),
            description: None,
            event_date: clock.now() + Duration::days(7),
            venue_id,
            capacity: None,
            ticket_price: 10.0,
            active: None,
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids_and_timestamps() {
        let clock = clock();
        let store = MemoryCatalogStore::new(clock.clone());

        let first = VenueRepo::insert(&store, venue_draft("Hall A", "Springfield", 100))
            .await
            .expect("insert");
        let second = VenueRepo::insert(&store, venue_draft("Hall B", "Springfield", 100))
            .await
            .expect("insert");

        assert_eq!(first.id, VenueId::new(1));
        assert_eq!(second.id, VenueId::new(2));
        assert_eq!(first.created_at, clock.now());
        assert!(first.available);
    }

    #[tokio::test]
    async fn rejects_case_insensitive_duplicates_on_insert_and_rename() {
        let clock = clock();
        let store = MemoryCatalogStore::new(clock.clone());

        EventRepo::insert(&store, event_draft("Gala", None, &clock))
            .await
            .expect("insert");
        let err = EventRepo::insert(&store, event_draft("GALA", None, &clock))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, RepoError::Duplicate { .. }));

        let mut other = EventRepo::insert(&store, event_draft("Concert", None, &clock))
            .await
            .expect("insert");
        other.name = "gala".to_string();
        let err = EventRepo::update(&store, other).await.expect_err("rename collides");
        assert!(matches!(err, RepoError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_bumps_updated_at() {
        let clock = clock();
        let store = MemoryCatalogStore::new(clock.clone());
        let event = EventRepo::insert(&store, event_draft("Gala", None, &clock))
            .await
            .expect("insert");

        clock.advance(Duration::minutes(5));
        let updated = EventRepo::update(&store, event.clone()).await.expect("update");

        assert_eq!(updated.created_at, event.created_at);
        assert_eq!(updated.updated_at, event.updated_at + Duration::minutes(5));
    }

    #[tokio::test]
    async fn venue_delete_is_restricted_while_events_reference_it() {
        let clock = clock();
        let store = MemoryCatalogStore::new(clock.clone());
        let venue = VenueRepo::insert(&store, venue_draft("Main Hall", "Springfield", 500))
            .await
            .expect("insert");
        let event = EventRepo::insert(&store, event_draft("Gala", Some(venue.id), &clock))
            .await
            .expect("insert");

        assert_eq!(store.count_by_venue(venue.id).await.expect("count"), 1);
        let err = VenueRepo::delete(&store, venue.id).await.expect_err("restricted");
        assert!(matches!(err, RepoError::ConstraintViolation(_)));

        assert!(EventRepo::delete(&store, event.id).await.expect("delete"));
        assert!(VenueRepo::delete(&store, venue.id).await.expect("delete"));
        assert!(!VenueRepo::delete(&store, venue.id).await.expect("delete"));
    }

    #[tokio::test]
    async fn insert_refuses_dangling_venue_reference() {
        let clock = clock();
        let store = MemoryCatalogStore::new(clock.clone());
        let err = EventRepo::insert(&store, event_draft("Gala", Some(VenueId::new(99)), &clock))
            .await
            .expect_err("no such venue");
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn pages_filtered_and_sorted_rows() {
        let clock = clock();
        let store = MemoryCatalogStore::new(clock.clone());
        for (name, capacity) in [("Arena", 900), ("Club", 150), ("Dome", 5000), ("Barn", 80)] {
            VenueRepo::insert(&store, venue_draft(name, "Springfield", capacity))
                .await
                .expect("insert");
        }

        let request = PageRequest::new(
            0,
            2,
            Sort::new(VenueSortField::MaxCapacity, SortDirection::Desc),
        )
        .expect("valid");
        let page = VenueRepo::page(&store, VenueFilter::min_capacity(100), request)
            .await
            .expect("page");

        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        let names: Vec<_> = page.items.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Dome", "Arena"]);
    }
}
