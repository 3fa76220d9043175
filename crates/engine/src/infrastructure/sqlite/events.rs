//! Event table access.

use async_trait::async_trait;
use chrono::SubsecRound;
use eventvenue_domain::{
    Event, EventDraft, EventFilter, EventId, EventSortField, Page, PageRequest, VenueId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::{
    decode_error, decode_timestamp, encode_timestamp, page_window, write_error,
    SqliteCatalogStore,
};
use crate::infrastructure::ports::{EventRepo, RepoError};

const COLUMNS: &str = "id, name, description, event_date, venue_id, capacity, ticket_price, \
                       active, created_at, updated_at";

fn order_column(field: EventSortField) -> &'static str {
    match field {
        EventSortField::Id => "id",
        EventSortField::Name => "name",
        EventSortField::EventDate => "event_date",
        EventSortField::TicketPrice => "ticket_price",
        EventSortField::Capacity => "capacity",
        EventSortField::CreatedAt => "created_at",
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &EventFilter) {
    query.push(" WHERE 1 = 1");
    if let Some(venue_id) = filter.venue_id {
        query.push(" AND venue_id = ").push_bind(venue_id.get());
    }
    if let Some(active) = filter.active {
        query.push(" AND active = ").push_bind(active);
    }
    if let Some(after) = filter.date_after {
        query.push(" AND event_date > ").push_bind(encode_timestamp(after));
    }
    if let Some(from) = filter.date_from {
        query.push(" AND event_date >= ").push_bind(encode_timestamp(from));
    }
    if let Some(to) = filter.date_to {
        query.push(" AND event_date <= ").push_bind(encode_timestamp(to));
    }
}

fn row_to_event(row: &SqliteRow) -> Result<Event, RepoError> {
    let event_date: String = row.try_get("event_date").map_err(decode_error)?;
    let created_at: String = row.try_get("created_at").map_err(decode_error)?;
    let updated_at: String = row.try_get("updated_at").map_err(decode_error)?;
    let venue_id: Option<i64> = row.try_get("venue_id").map_err(decode_error)?;

    Ok(Event {
        id: EventId::new(row.try_get("id").map_err(decode_error)?),
        name: row.try_get("name").map_err(decode_error)?,
        description: row.try_get("description").map_err(decode_error)?,
        event_date: decode_timestamp(&event_date)?,
        venue_id: venue_id.map(VenueId::new),
        capacity: row.try_get("capacity").map_err(decode_error)?,
        ticket_price: row.try_get("ticket_price").map_err(decode_error)?,
        active: row.try_get("active").map_err(decode_error)?,
        created_at: decode_timestamp(&created_at)?,
        updated_at: decode_timestamp(&updated_at)?,
    })
}

impl SqliteCatalogStore {
    async fn count_events(&self, filter: &EventFilter) -> Result<u64, RepoError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut query, filter);
        let total: i64 = query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("count_events", e))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[async_trait]
impl EventRepo for SqliteCatalogStore {
    async fn insert(&self, mut draft: EventDraft) -> Result<Event, RepoError> {
        let now = self.now();
        draft.event_date = draft.event_date.trunc_subsecs(6);
        let stamp = encode_timestamp(now);

        let result = sqlx::query(
            "INSERT INTO events (name, description, event_date, venue_id, capacity, \
             ticket_price, active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.name)
        .bind(draft.description.as_deref())
        .bind(encode_timestamp(draft.event_date))
        .bind(draft.venue_id.map(VenueId::get))
        .bind(draft.capacity)
        .bind(draft.ticket_price)
        .bind(draft.active.unwrap_or(true))
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("insert_event", "Event", &draft.name, e))?;

        let id = EventId::new(result.last_insert_rowid());
        Ok(Event::from_draft(id, draft, now))
    }

    async fn update(&self, mut event: Event) -> Result<Event, RepoError> {
        event.updated_at = self.now();
        event.event_date = event.event_date.trunc_subsecs(6);

        let result = sqlx::query(
            "UPDATE events SET name = ?, description = ?, event_date = ?, venue_id = ?, \
             capacity = ?, ticket_price = ?, active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&event.name)
        .bind(event.description.as_deref())
        .bind(encode_timestamp(event.event_date))
        .bind(event.venue_id.map(VenueId::get))
        .bind(event.capacity)
        .bind(event.ticket_price)
        .bind(event.active)
        .bind(encode_timestamp(event.updated_at))
        .bind(event.id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("update_event", "Event", &event.name, e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Event", event.id));
        }
        Ok(event)
    }

    async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM events WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_event", e))?;
        row.as_ref().map(row_to_event).transpose()
    }

    async fn exists(&self, id: EventId) -> Result<bool, RepoError> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE id = ?")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("event_exists", e))?;
        Ok(found > 0)
    }

    async fn delete(&self, id: EventId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_event", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE name = ? COLLATE NOCASE")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::database("event_exists_by_name", e))?;
        Ok(found > 0)
    }

    async fn count_by_venue(&self, venue_id: VenueId) -> Result<u64, RepoError> {
        self.count_events(&EventFilter::for_venue(venue_id)).await
    }

    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>, RepoError> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM events"));
        push_filter(&mut query, &filter);
        query.push(" ORDER BY id ASC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_events", e))?;
        rows.iter().map(row_to_event).collect()
    }

    async fn page(
        &self,
        filter: EventFilter,
        request: PageRequest<EventSortField>,
    ) -> Result<Page<Event>, RepoError> {
        let total = self.count_events(&filter).await?;

        let sort = request.sort();
        let (limit, offset) = page_window(request.offset(), request.size());
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM events"));
        push_filter(&mut query, &filter);
        query
            .push(" ORDER BY ")
            .push(order_column(sort.field))
            .push(" ")
            .push(sort.direction.as_sql())
            .push(", id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("page_events", e))?;
        let items = rows.iter().map(row_to_event).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, &request, total))
    }
}
