//! Helpers for driving the router in-process.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::api;
use crate::app::App;
use crate::infrastructure::clock::ManualClock;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::sqlite::SqliteCatalogStore;

/// Router plus the clock behind it.
pub struct E2ETestContext {
    pub router: Router,
    pub clock: Arc<ManualClock>,
}

/// Decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::starting_at(
        Utc.with_ymd_and_hms(2030, 9, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    ))
}

impl E2ETestContext {
    /// Context backed by the in-memory store.
    pub fn in_memory() -> Self {
        let clock = start_clock();
        let app = App::in_memory(clock.clone());
        Self {
            router: api::router(Arc::new(app)),
            clock,
        }
    }

    /// Context backed by a private in-memory SQLite database.
    pub async fn sqlite() -> Self {
        let clock = start_clock();
        let store = Arc::new(
            SqliteCatalogStore::connect("sqlite::memory:", clock.clone())
                .await
                .expect("in-memory sqlite"),
        );
        let app = App::new(store.clone(), store, clock.clone());
        Self {
            router: api::router(Arc::new(app)),
            clock,
        }
    }

    /// RFC 3339 timestamp `offset` from the current clock reading.
    pub fn at(&self, offset: Duration) -> String {
        rfc3339(self.clock.now() + offset)
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send_request(request).await
    }

    pub async fn send_raw_json(&self, method: Method, uri: &str, raw: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .expect("request");
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str) -> TestResponse {
        self.send(Method::PATCH, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Create a venue and return its id.
    pub async fn create_venue(&self, name: &str, city: &str, max_capacity: i32) -> i64 {
        let response = self
            .post(
                "/api/venues",
                json!({
                    "name": name,
                    "address": "1 Main Street",
                    "city": city,
                    "maxCapacity": max_capacity,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().expect("venue id")
    }

    /// Create an event `days` ahead of now and return its id.
    pub async fn create_event(&self, name: &str, days: i64, venue_id: Option<i64>) -> i64 {
        let response = self
            .post(
                "/api/events",
                json!({
                    "name": name,
                    "eventDate": self.at(Duration::days(days)),
                    "venueId": venue_id,
                    "ticketPrice": 20.0,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().expect("event id")
    }
}

pub fn rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Assert the standard error body and return its message.
pub fn assert_error(response: &TestResponse, status: StatusCode, path: &str) -> String {
    assert_eq!(response.status, status, "{:?}", response.body);
    assert_eq!(response.body["status"], status.as_u16());
    assert_eq!(response.body["path"], path);
    assert!(response.body["timestamp"].is_string());
    assert!(response.body["error"].is_string());
    response.body["message"]
        .as_str()
        .expect("message")
        .to_string()
}
