//! `/api/events` routes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use eventvenue_domain::{Event, EventId, EventSortField, Page, VenueId};

use super::dto::{
    CreateEventRequest, DateRangeParams, EventSearchParams, PageParams, UpdateEventRequest,
};
use super::extract::{ApiPath, ApiQuery, ValidatedJson};
use super::http::ApiError;
use crate::app::App;

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/active", get(list_active))
        .route("/api/events/upcoming", get(list_upcoming))
        .route("/api/events/range", get(list_in_range))
        .route("/api/events/venue/{venue_id}", get(list_by_venue))
        .route("/api/events/paginated", get(page_all))
        .route("/api/events/paginated/active", get(page_active))
        .route("/api/events/paginated/upcoming", get(page_upcoming))
        .route("/api/events/search", get(search))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

async fn create_event(
    State(app): State<Arc<App>>,
    ValidatedJson(body): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = app.use_cases.catalog.event.create(body.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn list_events(State(app): State<Arc<App>>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(app.use_cases.catalog.event.list().await?))
}

async fn get_event(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(app.use_cases.catalog.event.get(EventId::new(id)).await?))
}

async fn update_event(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = app
        .use_cases
        .catalog
        .event
        .update(EventId::new(id), body.into_patch())
        .await?;
    Ok(Json(event))
}

async fn delete_event(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.catalog.event.delete(EventId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_by_venue(
    State(app): State<Arc<App>>,
    ApiPath(venue_id): ApiPath<i64>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = app
        .use_cases
        .catalog
        .event
        .list_by_venue(VenueId::new(venue_id))
        .await?;
    Ok(Json(events))
}

async fn list_active(State(app): State<Arc<App>>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(app.use_cases.catalog.event.list_active().await?))
}

async fn list_upcoming(State(app): State<Arc<App>>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(app.use_cases.catalog.event.list_upcoming().await?))
}

async fn list_in_range(
    State(app): State<Arc<App>>,
    ApiQuery(range): ApiQuery<DateRangeParams>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = app
        .use_cases
        .catalog
        .event
        .list_in_range(range.start, range.end)
        .await?;
    Ok(Json(events))
}

async fn page_all(
    State(app): State<Arc<App>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Event>>, ApiError> {
    let request = params.into_request(EventSortField::Id)?;
    Ok(Json(app.use_cases.catalog.event.page_all(request).await?))
}

async fn page_active(
    State(app): State<Arc<App>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Event>>, ApiError> {
    let request = params.into_request(EventSortField::Name)?;
    Ok(Json(app.use_cases.catalog.event.page_active(request).await?))
}

async fn page_upcoming(
    State(app): State<Arc<App>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Event>>, ApiError> {
    let request = params.into_request(EventSortField::EventDate)?;
    Ok(Json(app.use_cases.catalog.event.page_upcoming(request).await?))
}

async fn search(
    State(app): State<Arc<App>>,
    ApiQuery(criteria): ApiQuery<EventSearchParams>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Event>>, ApiError> {
    let request = params.into_request(EventSortField::EventDate)?;
    let page = app
        .use_cases
        .catalog
        .event
        .search(criteria.into(), request)
        .await?;
    Ok(Json(page))
}
