//! `/api/venues` routes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use eventvenue_domain::{Page, Venue, VenueId, VenueSortField};
use serde::Serialize;

use super::dto::{
    AvailabilityParams, CreateVenueRequest, PageParams, UpdateVenueRequest, VenueSearchParams,
};
use super::extract::{ApiPath, ApiQuery, ValidatedJson};
use super::http::ApiError;
use crate::app::App;

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/venues", get(list_venues).post(create_venue))
        .route("/api/venues/available", get(list_available))
        .route("/api/venues/availability", get(list_by_availability))
        .route("/api/venues/city/{city}", get(list_by_city))
        .route("/api/venues/min-capacity/{capacity}", get(list_min_capacity))
        .route("/api/venues/paginated", get(page_all))
        .route("/api/venues/search", get(search))
        .route(
            "/api/venues/{id}",
            get(get_venue).put(update_venue).delete(delete_venue),
        )
        .route("/api/venues/{id}/events/count", get(count_events))
        .route("/api/venues/{id}/available", patch(mark_available))
        .route("/api/venues/{id}/unavailable", patch(mark_unavailable))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventCount {
    venue_id: VenueId,
    event_count: u64,
}

async fn create_venue(
    State(app): State<Arc<App>>,
    ValidatedJson(body): ValidatedJson<CreateVenueRequest>,
) -> Result<(StatusCode, Json<Venue>), ApiError> {
    let venue = app.use_cases.catalog.venue.create(body.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(venue)))
}

async fn list_venues(State(app): State<Arc<App>>) -> Result<Json<Vec<Venue>>, ApiError> {
    Ok(Json(app.use_cases.catalog.venue.list().await?))
}

async fn get_venue(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Venue>, ApiError> {
    Ok(Json(app.use_cases.catalog.venue.get(VenueId::new(id)).await?))
}

async fn update_venue(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateVenueRequest>,
) -> Result<Json<Venue>, ApiError> {
    let venue = app
        .use_cases
        .catalog
        .venue
        .update(VenueId::new(id), body.into_patch())
        .await?;
    Ok(Json(venue))
}

async fn delete_venue(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.catalog.venue.delete(VenueId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_available(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Venue>, ApiError> {
    let venue = app
        .use_cases
        .catalog
        .venue
        .mark_available(VenueId::new(id))
        .await?;
    Ok(Json(venue))
}

async fn mark_unavailable(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Venue>, ApiError> {
    let venue = app
        .use_cases
        .catalog
        .venue
        .mark_unavailable(VenueId::new(id))
        .await?;
    Ok(Json(venue))
}

async fn count_events(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<EventCount>, ApiError> {
    let venue_id = VenueId::new(id);
    let event_count = app.use_cases.catalog.venue.count_events(venue_id).await?;
    Ok(Json(EventCount {
        venue_id,
        event_count,
    }))
}

async fn list_by_city(
    State(app): State<Arc<App>>,
    ApiPath(city): ApiPath<String>,
) -> Result<Json<Vec<Venue>>, ApiError> {
    Ok(Json(app.use_cases.catalog.venue.list_by_city(&city).await?))
}

async fn list_available(State(app): State<Arc<App>>) -> Result<Json<Vec<Venue>>, ApiError> {
    Ok(Json(app.use_cases.catalog.venue.list_available().await?))
}

async fn list_by_availability(
    State(app): State<Arc<App>>,
    ApiQuery(params): ApiQuery<AvailabilityParams>,
) -> Result<Json<Vec<Venue>>, ApiError> {
    let venues = app
        .use_cases
        .catalog
        .venue
        .list_by_availability(params.available)
        .await?;
    Ok(Json(venues))
}

async fn list_min_capacity(
    State(app): State<Arc<App>>,
    ApiPath(capacity): ApiPath<i32>,
) -> Result<Json<Vec<Venue>>, ApiError> {
    Ok(Json(
        app.use_cases.catalog.venue.list_min_capacity(capacity).await?,
    ))
}

async fn page_all(
    State(app): State<Arc<App>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Venue>>, ApiError> {
    let request = params.into_request(VenueSortField::Id)?;
    Ok(Json(app.use_cases.catalog.venue.page_all(request).await?))
}

async fn search(
    State(app): State<Arc<App>>,
    ApiQuery(criteria): ApiQuery<VenueSearchParams>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Venue>>, ApiError> {
    let request = params.into_request(VenueSortField::Name)?;
    let page = app
        .use_cases
        .catalog
        .venue
        .search(criteria.into(), request)
        .await?;
    Ok(Json(page))
}
