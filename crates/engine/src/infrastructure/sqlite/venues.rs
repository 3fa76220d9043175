//! Venue table access.

use async_trait::async_trait;
use eventvenue_domain::{
    Page, PageRequest, Venue, VenueDraft, VenueFilter, VenueId, VenueSortField,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::{
    decode_error, decode_timestamp, encode_timestamp, page_window, write_error,
    SqliteCatalogStore,
};
use crate::infrastructure::ports::{RepoError, VenueRepo};

const COLUMNS: &str = "id, name, address, city, country, max_capacity, venue_type, available, \
                       created_at, updated_at";

fn order_column(field: VenueSortField) -> &'static str {
    match field {
        VenueSortField::Id => "id",
        VenueSortField::Name => "name",
        VenueSortField::City => "city COLLATE NOCASE",
        VenueSortField::MaxCapacity => "max_capacity",
        VenueSortField::CreatedAt => "created_at",
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &VenueFilter) {
    query.push(" WHERE 1 = 1");
    if let Some(city) = &filter.city {
        query
            .push(" AND city = ")
            .push_bind(city.clone())
            .push(" COLLATE NOCASE");
    }
    if let Some(available) = filter.available {
        query.push(" AND available = ").push_bind(available);
    }
    if let Some(min_capacity) = filter.min_capacity {
        query.push(" AND max_capacity >= ").push_bind(min_capacity);
    }
}

fn row_to_venue(row: &SqliteRow) -> Result<Venue, RepoError> {
    let created_at: String = row.try_get("created_at").map_err(decode_error)?;
    let updated_at: String = row.try_get("updated_at").map_err(decode_error)?;

    Ok(Venue {
        id: VenueId::new(row.try_get("id").map_err(decode_error)?),
        name: row.try_get("name").map_err(decode_error)?,
        address: row.try_get("address").map_err(decode_error)?,
        city: row.try_get("city").map_err(decode_error)?,
        country: row.try_get("country").map_err(decode_error)?,
        max_capacity: row.try_get("max_capacity").map_err(decode_error)?,
        venue_type: row.try_get("venue_type").map_err(decode_error)?,
        available: row.try_get("available").map_err(decode_error)?,
        created_at: decode_timestamp(&created_at)?,
        updated_at: decode_timestamp(&updated_at)?,
    })
}

impl SqliteCatalogStore {
    async fn count_venues(&self, filter: &VenueFilter) -> Result<u64, RepoError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM venues");
        push_filter(&mut query, filter);
        let total: i64 = query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("count_venues", e))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[async_trait]
impl VenueRepo for SqliteCatalogStore {
    async fn insert(&self, draft: VenueDraft) -> Result<Venue, RepoError> {
        let now = self.now();
        let stamp = encode_timestamp(now);

        let result = sqlx::query(
            "INSERT INTO venues (name, address, city, country, max_capacity, venue_type, \
             available, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.name)
        .bind(&draft.address)
        .bind(&draft.city)
        .bind(draft.country.as_deref())
        .bind(draft.max_capacity)
        .bind(draft.venue_type.as_deref())
        .bind(draft.available.unwrap_or(true))
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("insert_venue", "Venue", &draft.name, e))?;

        let id = VenueId::new(result.last_insert_rowid());
        Ok(Venue::from_draft(id, draft, now))
    }

    async fn update(&self, mut venue: Venue) -> Result<Venue, RepoError> {
        venue.updated_at = self.now();

        let result = sqlx::query(
            "UPDATE venues SET name = ?, address = ?, city = ?, country = ?, max_capacity = ?, \
             venue_type = ?, available = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&venue.name)
        .bind(&venue.address)
        .bind(&venue.city)
        .bind(venue.country.as_deref())
        .bind(venue.max_capacity)
        .bind(venue.venue_type.as_deref())
        .bind(venue.available)
        .bind(encode_timestamp(venue.updated_at))
        .bind(venue.id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("update_venue", "Venue", &venue.name, e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Venue", venue.id));
        }
        Ok(venue)
    }

    async fn get(&self, id: VenueId) -> Result<Option<Venue>, RepoError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM venues WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_venue", e))?;
        row.as_ref().map(row_to_venue).transpose()
    }

    async fn exists(&self, id: VenueId) -> Result<bool, RepoError> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues WHERE id = ?")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("venue_exists", e))?;
        Ok(found > 0)
    }

    async fn delete(&self, id: VenueId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("delete_venue", "Venue", &id.to_string(), e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM venues WHERE name = ? COLLATE NOCASE")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::database("venue_exists_by_name", e))?;
        Ok(found > 0)
    }

    async fn list(&self, filter: VenueFilter) -> Result<Vec<Venue>, RepoError> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM venues"));
        push_filter(&mut query, &filter);
        query.push(" ORDER BY id ASC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_venues", e))?;
        rows.iter().map(row_to_venue).collect()
    }

    async fn page(
        &self,
        filter: VenueFilter,
        request: PageRequest<VenueSortField>,
    ) -> Result<Page<Venue>, RepoError> {
        let total = self.count_venues(&filter).await?;

        let sort = request.sort();
        let (limit, offset) = page_window(request.offset(), request.size());
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM venues"));
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
            .map_err(|e| RepoError::database("page_venues", e))?;
        let items = rows.iter().map(row_to_venue).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, &request, total))
    }
}
