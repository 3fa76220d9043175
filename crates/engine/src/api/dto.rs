//! Request payloads and query parameters.
//!
//! Create payloads mark mandatory fields `required` so a missing field is a
//! field error rather than a parse failure. Update payloads carry no required
//! fields: an absent or null field leaves the stored value as it is.

use chrono::{DateTime, Utc};
use eventvenue_domain::{
    DomainError, EventDraft, EventPatch, PageRequest, Patch, SortField, VenueDraft, VenueId,
    VenuePatch, PAGE_SIZE_DEFAULT,
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::use_cases::catalog::{EventSearch, VenueSearch};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(
        required(message = "Event name is required"),
        length(min = 3, max = 100, message = "Event name must be between 3 and 100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(required(message = "Event date is required"))]
    pub event_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "Venue ID must be positive"))]
    pub venue_id: Option<i64>,
    #[validate(range(min = 1, max = 100000, message = "Capacity must be between 1 and 100000"))]
    pub capacity: Option<i32>,
    #[validate(
        required(message = "Ticket price is required"),
        range(min = 0.0, max = 10000000.0, message = "Ticket price must be between 0 and 10000000")
    )]
    pub ticket_price: Option<f64>,
    pub active: Option<bool>,
}

impl CreateEventRequest {
    /// Only call after `validate()`: required fields fall back to neutral values.
    pub fn into_draft(self) -> EventDraft {
        EventDraft {
            name: self.name.unwrap_or_default(),
            description: self.description,
            event_date: self.event_date.unwrap_or_default(),
            venue_id: self.venue_id.map(VenueId::new),
            capacity: self.capacity,
            ticket_price: self.ticket_price.unwrap_or_default(),
            active: self.active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(
        length(min = 3, max = 100, message = "Event name must be between 3 and 100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "Venue ID must be positive"))]
    pub venue_id: Option<i64>,
    #[validate(range(min = 1, max = 100000, message = "Capacity must be between 1 and 100000"))]
    pub capacity: Option<i32>,
    #[validate(range(
        min = 0.0,
        max = 10000000.0,
        message = "Ticket price must be between 0 and 10000000"
    ))]
    pub ticket_price: Option<f64>,
    pub active: Option<bool>,
}

impl UpdateEventRequest {
    pub fn into_patch(self) -> EventPatch {
        EventPatch {
            name: Patch::from(self.name),
            description: Patch::from(self.description),
            event_date: Patch::from(self.event_date),
            venue_id: Patch::from(self.venue_id.map(VenueId::new)),
            capacity: Patch::from(self.capacity),
            ticket_price: Patch::from(self.ticket_price),
            active: Patch::from(self.active),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSearchParams {
    pub venue_id: Option<i64>,
    pub active: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
}

impl From<EventSearchParams> for EventSearch {
    fn from(params: EventSearchParams) -> Self {
        Self {
            venue_id: params.venue_id.map(VenueId::new),
            active: params.active,
            start_date: params.start_date,
        }
    }
}

// =============================================================================
// Venues
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueRequest {
    #[validate(
        required(message = "Venue name is required"),
        length(min = 3, max = 100, message = "Venue name must be between 3 and 100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Address is required"),
        length(min = 5, max = 200, message = "Address must be between 5 and 200 characters"),
        custom(function = "not_blank")
    )]
    pub address: Option<String>,
    #[validate(
        required(message = "City is required"),
        length(min = 2, max = 100, message = "City must be between 2 and 100 characters"),
        custom(function = "not_blank")
    )]
    pub city: Option<String>,
    #[validate(length(min = 2, max = 100, message = "Country must be between 2 and 100 characters"))]
    pub country: Option<String>,
    #[validate(
        required(message = "Max capacity is required"),
        range(min = 1, max = 500000, message = "Max capacity must be between 1 and 500000")
    )]
    pub max_capacity: Option<i32>,
    #[serde(rename = "type")]
    #[validate(length(max = 50, message = "Type cannot exceed 50 characters"))]
    pub venue_type: Option<String>,
    pub available: Option<bool>,
}

impl CreateVenueRequest {
    /// Only call after `validate()`: required fields fall back to neutral values.
    pub fn into_draft(self) -> VenueDraft {
        VenueDraft {
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            country: self.country,
            max_capacity: self.max_capacity.unwrap_or_default(),
            venue_type: self.venue_type,
            available: self.available,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenueRequest {
    #[validate(
        length(min = 3, max = 100, message = "Venue name must be between 3 and 100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 5, max = 200, message = "Address must be between 5 and 200 characters"),
        custom(function = "not_blank")
    )]
    pub address: Option<String>,
    #[validate(
        length(min = 2, max = 100, message = "City must be between 2 and 100 characters"),
        custom(function = "not_blank")
    )]
    pub city: Option<String>,
    #[validate(length(min = 2, max = 100, message = "Country must be between 2 and 100 characters"))]
    pub country: Option<String>,
    #[validate(range(min = 1, max = 500000, message = "Max capacity must be between 1 and 500000"))]
    pub max_capacity: Option<i32>,
    #[serde(rename = "type")]
    #[validate(length(max = 50, message = "Type cannot exceed 50 characters"))]
    pub venue_type: Option<String>,
    pub available: Option<bool>,
}

impl UpdateVenueRequest {
    pub fn into_patch(self) -> VenuePatch {
        VenuePatch {
            name: Patch::from(self.name),
            address: Patch::from(self.address),
            city: Patch::from(self.city),
            country: Patch::from(self.country),
            max_capacity: Patch::from(self.max_capacity),
            venue_type: Patch::from(self.venue_type),
            available: Patch::from(self.available),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityParams {
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSearchParams {
    pub city: Option<String>,
    pub available: Option<bool>,
    pub min_capacity: Option<i32>,
}

impl From<VenueSearchParams> for VenueSearch {
    fn from(params: VenueSearchParams) -> Self {
        Self {
            city: params.city,
            available: params.available,
            min_capacity: params.min_capacity,
        }
    }
}

// =============================================================================
// Paging
// =============================================================================

fn default_page_size() -> u32 {
    PAGE_SIZE_DEFAULT
}

/// `page` (zero-based), `size`, `sortBy`, `direction`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
    pub sort_by: Option<String>,
    pub direction: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: PAGE_SIZE_DEFAULT,
            sort_by: None,
            direction: None,
        }
    }
}

impl PageParams {
    pub fn into_request<F: SortField>(self, default_field: F) -> Result<PageRequest<F>, DomainError> {
        PageRequest::parse(
            self.page,
            self.size,
            self.sort_by.as_deref(),
            self.direction.as_deref(),
            default_field,
        )
    }
}
