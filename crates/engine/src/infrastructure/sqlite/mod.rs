//! SQLite-backed catalog store.
//!
//! The schema carries the catalog invariants the rules also check:
//! - `name` columns are `UNIQUE COLLATE NOCASE`
//! - `events.venue_id` references `venues(id)` with `ON DELETE RESTRICT`
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text (microsecond
//! precision), which keeps lexicographic and chronological order identical.

mod events;
mod venues;

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::infrastructure::ports::{ClockPort, RepoError};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS venues (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL COLLATE NOCASE UNIQUE,
        address TEXT NOT NULL,
        city TEXT NOT NULL,
        country TEXT,
        max_capacity INTEGER NOT NULL,
        venue_type TEXT,
        available INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL COLLATE NOCASE UNIQUE,
        description TEXT,
        event_date TEXT NOT NULL,
        venue_id INTEGER REFERENCES venues(id) ON DELETE RESTRICT,
        capacity INTEGER,
        ticket_price REAL NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_events_venue_id ON events (venue_id)",
];

/// SQLite implementation of both catalog repositories.
pub struct SqliteCatalogStore {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteCatalogStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    ///
    /// In-memory URLs get a single long-lived connection, since every SQLite
    /// connection to `:memory:` is its own database.
    pub async fn connect(url: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| RepoError::database("connect", e))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        let store = Self { pool, clock };
        store.ensure_schema().await?;
        tracing::info!(url = %url, "SQLite catalog store ready");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), RepoError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("ensure_schema", e))?;
        }
        Ok(())
    }

    /// Current time at the precision the store keeps.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(6)
    }
}

fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("bad timestamp {value:?}: {e}")))
}

/// Extended result code SQLite reports when a `RESTRICT` action fires
/// (`SQLITE_CONSTRAINT_TRIGGER`), which sqlx does not classify as a foreign key
/// violation.
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

fn decode_error(e: sqlx::Error) -> RepoError {
    RepoError::serialization(e)
}

/// Translate constraint failures into the port's vocabulary.
fn write_error(
    operation: &'static str,
    entity_type: &'static str,
    name: &str,
    err: sqlx::Error,
) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepoError::duplicate(entity_type, name);
        }
        if db.is_foreign_key_violation()
            || db.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER)
        {
            return RepoError::constraint(format!("{operation}: {}", db.message()));
        }
    }
    RepoError::database(operation, err)
}

fn page_window(offset: u64, size: u32) -> (i64, i64) {
    (
        i64::from(size),
        i64::try_from(offset).unwrap_or(i64::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;
    use crate::infrastructure::ports::{EventRepo, VenueRepo};
    use chrono::{Duration, TimeZone};
    use eventvenue_domain::{
        EventDraft, EventFilter, EventSortField, PageRequest, Sort, SortDirection, VenueDraft,
        VenueFilter, VenueId,
    };

    async fn store() -> (SqliteCatalogStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_at(
            Utc.with_ymd_and_hms(2030, 3, 10, 18, 30, 0).single().expect("valid"),
        ));
        let store = SqliteCatalogStore::connect("sqlite::memory:", clock.clone())
            .await
            .expect("in-memory sqlite");
        (store, clock)
    }

    fn venue_draft(name: &str) -> VenueDraft {
        VenueDraft {
            name: name.to_string(),
            address: "42 Harbour Road".to_string(),
            city: "Springfield".to_string(),
            country: Some("USA".to_string()),
            max_capacity: 800,
            venue_type: Some("theater".to_string()),
            available: None,
        }
    }

    fn event_draft(name: &str, venue_id: Option<VenueId>, at: DateTime<Utc>) -> EventDraft {
        EventDraft {
            name: name.to_string(),
            description: Some("An evening out".to_string()),
            event_date: at,
            venue_id,
            capacity: Some(300),
            ticket_price: 45.0,
            active: None,
        }
    }

    #[tokio::test]
    async fn inserted_rows_read_back_identically() {
        let (store, clock) = store().await;
        let venue = VenueRepo::insert(&store, venue_draft("Opera House"))
            .await
            .expect("insert venue");
        let event = EventRepo::insert(
            &store,
            event_draft("Tosca", Some(venue.id), clock.now() + Duration::days(3)),
        )
        .await
        .expect("insert event");

        let loaded = EventRepo::get(&store, event.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded, event);
        assert!(loaded.active);

        let loaded = VenueRepo::get(&store, venue.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded, venue);
    }

    #[tokio::test]
    async fn unique_index_reports_duplicates_regardless_of_case() {
        let (store, _) = store().await;
        VenueRepo::insert(&store, venue_draft("Opera House"))
            .await
            .expect("insert");

        let err = VenueRepo::insert(&store, venue_draft("OPERA house"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, RepoError::Duplicate { entity_type: "Venue", .. }));
        assert!(VenueRepo::exists_by_name(&store, "opera HOUSE")
            .await
            .expect("exists"));
    }

    #[tokio::test]
    async fn foreign_key_restricts_venue_delete() {
        let (store, clock) = store().await;
        let venue = VenueRepo::insert(&store, venue_draft("Opera House"))
            .await
            .expect("insert venue");
        let event = EventRepo::insert(
            &store,
            event_draft("Tosca", Some(venue.id), clock.now() + Duration::days(3)),
        )
        .await
        .expect("insert event");

        assert_eq!(store.count_by_venue(venue.id).await.expect("count"), 1);
        let err = VenueRepo::delete(&store, venue.id)
            .await
            .expect_err("restricted");
        assert!(matches!(err, RepoError::ConstraintViolation(_)), "{err:?}");
        let api = crate::api::ApiError::from(crate::use_cases::CatalogError::from(err));
        assert_eq!(api.status(), axum::http::StatusCode::CONFLICT);

        assert!(EventRepo::delete(&store, event.id).await.expect("delete"));
        assert!(VenueRepo::delete(&store, venue.id).await.expect("delete"));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let (store, clock) = store().await;
        let mut event = EventRepo::insert(
            &store,
            event_draft("Tosca", None, clock.now() + Duration::days(3)),
        )
        .await
        .expect("insert");
        assert!(EventRepo::delete(&store, event.id).await.expect("delete"));

        event.name = "Carmen".to_string();
        let err = EventRepo::update(&store, event).await.expect_err("gone");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn filters_and_pages_events() {
        let (store, clock) = store().await;
        let base = clock.now();
        for (i, name) in ["Alpha", "Bravo", "Charlie", "Delta"].iter().enumerate() {
            let mut draft = event_draft(name, None, base + Duration::days(i as i64 + 1));
            draft.active = Some(i % 2 == 0);
            EventRepo::insert(&store, draft).await.expect("insert");
        }

        let upcoming = EventRepo::list(&store, EventFilter::upcoming(base + Duration::days(2)))
            .await
            .expect("list");
        let names: Vec<_> = upcoming.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Delta"]);

        let request = PageRequest::new(
            0,
            10,
            Sort::new(EventSortField::EventDate, SortDirection::Desc),
        )
        .expect("valid");
        let page = EventRepo::page(&store, EventFilter::active_only(), request)
            .await
            .expect("page");
        let names: Vec<_> = page.items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Alpha"]);
        assert_eq!(page.total_items, 2);
    }

    #[tokio::test]
    async fn filters_venues_by_city_ignoring_case() {
        let (store, _) = store().await;
        VenueRepo::insert(&store, venue_draft("Opera House"))
            .await
            .expect("insert");
        let mut elsewhere = venue_draft("Town Hall");
        elsewhere.city = "Shelbyville".to_string();
        VenueRepo::insert(&store, elsewhere).await.expect("insert");

        let found = VenueRepo::list(&store, VenueFilter::in_city("springfield"))
            .await
            .expect("list");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Opera House");
    }
}
