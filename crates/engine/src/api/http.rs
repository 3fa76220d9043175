//! HTTP routes and error rendering.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use eventvenue_domain::DomainError;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::{events, venues};
use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::CatalogError;

const MALFORMED_JSON: &str = "Malformed JSON request. Please check your request body format.";
const DATA_RELATIONSHIPS: &str = "Cannot complete operation due to data relationships.";
const DATABASE_FAILURE: &str = "A database error occurred. Please try again later.";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .merge(events::routes())
        .merge(venues::routes())
}

/// The complete service: routes, fallback, error-path stamping and tracing.
pub fn router(app: Arc<App>) -> Router {
    routes()
        .fallback(no_route)
        .with_state(app)
        .layer(middleware::from_fn(attach_request_path))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "OK"
}

async fn no_route(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No endpoint found for {}", uri.path()))
}

/// Fill in `path` on error bodies; handlers never see the request URI.
async fn attach_request_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    match response.extensions().get::<ErrorBody>().cloned() {
        Some(mut body) => {
            body.path = path;
            (response.status(), Json(body)).into_response()
        }
        None => response,
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Conflict(String),
    BadRequest(String),
    /// Field-level payload errors, each rendered as `field: message`.
    Validation(Vec<String>),
    MalformedJson,
    /// A store relationship constraint; the detail is logged only.
    Constraint(String),
    /// Any other store failure; the detail is logged only.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::Constraint(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::MalformedJson => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::NotFound(msg) | ApiError::Conflict(msg) | ApiError::BadRequest(msg) => {
                msg.clone()
            }
            ApiError::Validation(_) => "Validation failed".to_string(),
            ApiError::MalformedJson => MALFORMED_JSON.to_string(),
            ApiError::Constraint(_) => DATA_RELATIONSHIPS.to_string(),
            ApiError::Internal(_) => DATABASE_FAILURE.to_string(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Constraint(detail) => {
                tracing::error!(detail = %detail, "Store constraint violation");
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Store failure");
            }
            _ => {}
        }

        let body = ErrorBody {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.public_message(),
            path: String::new(),
            validation_errors: match self {
                ApiError::Validation(errors) => Some(errors),
                _ => None,
            },
        };

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            CatalogError::Duplicate(msg) => ApiError::Conflict(msg),
            CatalogError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            CatalogError::Repo(RepoError::ConstraintViolation(detail)) => {
                ApiError::Constraint(detail)
            }
            CatalogError::Repo(other) => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::BadRequest(e.message().to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                let field = wire_name(&field);
                field_errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    format!("{field}: {message}")
                })
            })
            .collect();
        messages.sort();
        ApiError::Validation(messages)
    }
}

/// JSON name of a request field, as the client sent it.
fn wire_name(field: &str) -> String {
    match field {
        // Serialized with `#[serde(rename = "type")]` on the request DTOs.
        "venue_type" => "type".to_string(),
        other => camel_case(other),
    }
}

/// `ticket_price` -> `ticketPrice`, matching the JSON field names.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
