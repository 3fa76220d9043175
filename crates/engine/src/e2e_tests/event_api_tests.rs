//! Event endpoints.

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use super::{assert_error, E2ETestContext};

#[tokio::test]
async fn create_then_fetch_round_trips() {
    let ctx = E2ETestContext::in_memory();
    let venue_id = ctx.create_venue("Main Hall", "Springfield", 500).await;

    let created = ctx
        .post(
            "/api/events",
            json!({
                "name": "Gala",
                "description": "Annual fundraiser",
                "eventDate": ctx.at(Duration::days(1)),
                "venueId": venue_id,
                "capacity": 300,
                "ticketPrice": 20.0,
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["active"], true);
    assert_eq!(created.body["venueId"], venue_id);
    assert!(created.body["createdAt"].is_string());

    let id = created.body["id"].as_i64().expect("id");
    let fetched = ctx.get(&format!("/api/events/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);
}

#[tokio::test]
async fn missing_event_is_404_with_error_body() {
    let ctx = E2ETestContext::in_memory();
    let response = ctx.get("/api/events/404").await;
    let message = assert_error(&response, StatusCode::NOT_FOUND, "/api/events/404");
    assert_eq!(message, "Event with ID 404 not found");
}

#[tokio::test]
async fn duplicate_name_in_other_case_is_409() {
    let ctx = E2ETestContext::in_memory();
    ctx.create_event("Gala", 1, None).await;

    let response = ctx
        .post(
            "/api/events",
            json!({
                "name": "GALA",
                "eventDate": ctx.at(Duration::days(2)),
                "ticketPrice": 5,
            }),
        )
        .await;
    let message = assert_error(&response, StatusCode::CONFLICT, "/api/events");
    assert_eq!(message, "Event with name 'GALA' already exists");
}

#[tokio::test]
async fn event_dated_now_is_400() {
    let ctx = E2ETestContext::in_memory();
    let response = ctx
        .post(
            "/api/events",
            json!({
                "name": "Gala",
                "eventDate": ctx.at(Duration::zero()),
                "ticketPrice": 5,
            }),
        )
        .await;
    let message = assert_error(&response, StatusCode::BAD_REQUEST, "/api/events");
    assert_eq!(message, "Event date must be in the future");
}

#[tokio::test]
async fn unknown_venue_reference_is_404() {
    let ctx = E2ETestContext::in_memory();
    let response = ctx
        .post(
            "/api/events",
            json!({
                "name": "Gala",
                "eventDate": ctx.at(Duration::days(1)),
                "venueId": 77,
                "ticketPrice": 5,
            }),
        )
        .await;
    let message = assert_error(&response, StatusCode::NOT_FOUND, "/api/events");
    assert_eq!(message, "Venue with ID 77 not found");
}

#[tokio::test]
async fn field_errors_are_aggregated() {
    let ctx = E2ETestContext::in_memory();
    let response = ctx
        .post(
            "/api/events",
            json!({
                "name": "Go",
                "capacity": 0,
                "ticketPrice": -1,
            }),
        )
        .await;
    let message = assert_error(&response, StatusCode::BAD_REQUEST, "/api/events");
    assert_eq!(message, "Validation failed");

    let errors: Vec<&str> = response.body["validationErrors"]
        .as_array()
        .expect("validation errors")
        .iter()
        .filter_map(|e| e.as_str())
        .collect();
    assert_eq!(errors.len(), 4, "{errors:?}");
    assert!(errors.iter().any(|e| e.starts_with("name:")));
    assert!(errors.iter().any(|e| e.starts_with("eventDate:")));
    assert!(errors.iter().any(|e| e.starts_with("capacity:")));
    assert!(errors.iter().any(|e| e.starts_with("ticketPrice:")));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let ctx = E2ETestContext::in_memory();
    let response = ctx
        .send_raw_json(axum::http::Method::POST, "/api/events", "{\"name\": ")
        .await;
    let message = assert_error(&response, StatusCode::BAD_REQUEST, "/api/events");
    assert_eq!(
        message,
        "Malformed JSON request. Please check your request body format."
    );
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let ctx = E2ETestContext::in_memory();
    let id = ctx.create_event("Gala", 3, None).await;
    let before = ctx.get(&format!("/api/events/{id}")).await.body;
    ctx.clock.advance(Duration::minutes(1));

    let updated = ctx
        .put(
            &format!("/api/events/{id}"),
            json!({ "ticketPrice": 35.5, "description": null }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["ticketPrice"], 35.5);
    assert_eq!(updated.body["name"], before["name"]);
    assert_eq!(updated.body["eventDate"], before["eventDate"]);
    assert_eq!(updated.body["active"], before["active"]);
    assert_eq!(updated.body["createdAt"], before["createdAt"]);
    assert_ne!(updated.body["updatedAt"], before["updatedAt"]);
}

#[tokio::test]
async fn update_rejects_past_date_and_unknown_event() {
    let ctx = E2ETestContext::in_memory();
    let id = ctx.create_event("Gala", 3, None).await;

    let path = format!("/api/events/{id}");
    let response = ctx
        .put(&path, json!({ "eventDate": ctx.at(-Duration::days(1)) }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, &path);

    let response = ctx.put("/api/events/999", json!({ "name": "Other" })).await;
    assert_error(&response, StatusCode::NOT_FOUND, "/api/events/999");
}

#[tokio::test]
async fn delete_is_204_then_404() {
    let ctx = E2ETestContext::in_memory();
    let id = ctx.create_event("Gala", 3, None).await;
    let path = format!("/api/events/{id}");

    assert_eq!(ctx.delete(&path).await.status, StatusCode::NO_CONTENT);
    assert_error(&ctx.delete(&path).await, StatusCode::NOT_FOUND, &path);
}

#[tokio::test]
async fn filtered_lists() {
    let ctx = E2ETestContext::in_memory();
    let venue_id = ctx.create_venue("Main Hall", "Springfield", 500).await;
    ctx.create_event("Opening", 1, Some(venue_id)).await;
    let late = ctx.create_event("Closing", 10, None).await;
    ctx.put(&format!("/api/events/{late}"), json!({ "active": false }))
        .await;

    let by_venue = ctx.get(&format!("/api/events/venue/{venue_id}")).await;
    assert_eq!(by_venue.body.as_array().map(Vec::len), Some(1));

    let active = ctx.get("/api/events/active").await;
    assert_eq!(active.body.as_array().map(Vec::len), Some(1));

    ctx.clock.advance(Duration::days(2));
    let upcoming = ctx.get("/api/events/upcoming").await;
    assert_eq!(upcoming.body[0]["name"], "Closing");
    assert_eq!(upcoming.body.as_array().map(Vec::len), Some(1));

    let response = ctx.get("/api/events/venue/999").await;
    assert_error(&response, StatusCode::NOT_FOUND, "/api/events/venue/999");
}

#[tokio::test]
async fn date_range_is_inclusive_and_ordered() {
    let ctx = E2ETestContext::in_memory();
    ctx.create_event("Opening", 1, None).await;
    ctx.create_event("Closing", 10, None).await;

    let start = ctx.at(Duration::days(1));
    let end = ctx.at(Duration::days(5));
    let found = ctx
        .get(&format!("/api/events/range?start={start}&end={end}"))
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body.as_array().map(Vec::len), Some(1));
    assert_eq!(found.body[0]["name"], "Opening");

    let backwards = ctx
        .get(&format!("/api/events/range?start={end}&end={start}"))
        .await;
    assert_error(&backwards, StatusCode::BAD_REQUEST, "/api/events/range");
}

#[tokio::test]
async fn pagination_and_search() {
    let ctx = E2ETestContext::in_memory();
    let venue_id = ctx.create_venue("Main Hall", "Springfield", 500).await;
    for (i, name) in ["Alpha", "Bravo", "Charlie", "Delta", "Echo"].iter().enumerate() {
        ctx.create_event(name, i as i64 + 1, Some(venue_id)).await;
    }

    let page = ctx
        .get("/api/events/paginated?page=1&size=2&sortBy=name&direction=DESC")
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["items"][0]["name"], "Charlie");
    assert_eq!(page.body["items"][1]["name"], "Bravo");
    assert_eq!(page.body["totalItems"], 5);
    assert_eq!(page.body["totalPages"], 3);
    assert_eq!(page.body["sort"]["field"], "name");
    assert_eq!(page.body["sort"]["direction"], "desc");

    let upcoming = ctx.get("/api/events/paginated/upcoming?size=3").await;
    assert_eq!(upcoming.body["items"][0]["name"], "Alpha");
    assert_eq!(upcoming.body["sort"]["field"], "eventDate");

    let search = ctx
        .get(&format!(
            "/api/events/search?venueId={venue_id}&active=true&startDate={}",
            ctx.at(Duration::days(4))
        ))
        .await;
    assert_eq!(search.body["totalItems"], 2);

    let bad_sort = ctx.get("/api/events/paginated?sortBy=popularity").await;
    assert_error(&bad_sort, StatusCode::BAD_REQUEST, "/api/events/paginated");

    let bad_size = ctx.get("/api/events/paginated?size=0").await;
    assert_error(&bad_size, StatusCode::BAD_REQUEST, "/api/events/paginated");
}

#[tokio::test]
async fn unknown_route_is_404_with_error_body() {
    let ctx = E2ETestContext::in_memory();
    let response = ctx.get("/api/tickets").await;
    assert_error(&response, StatusCode::NOT_FOUND, "/api/tickets");
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let ctx = E2ETestContext::in_memory();
    let response = ctx.get("/api/events/abc").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "/api/events/abc");
}
