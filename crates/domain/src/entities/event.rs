//! Event entity - a dated, priced happening that may take place at a venue.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{EventId, VenueId};
use crate::value_objects::{Patch, SortField};

/// A persisted event.
///
/// `venue_id` is a weak reference: it names a venue by identifier only and is
/// resolved through the store whenever it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub venue_id: Option<VenueId>,
    pub capacity: Option<i32>,
    pub ticket_price: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Materialize a draft once the store has assigned its identity.
    pub fn from_draft(id: EventId, draft: EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            event_date: draft.event_date,
            venue_id: draft.venue_id,
            capacity: draft.capacity,
            ticket_price: draft.ticket_price,
            active: draft.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every field the patch mentions. Timestamps are the store's job.
    pub fn apply(&mut self, patch: EventPatch) {
        patch.name.apply_to(&mut self.name);
        patch.description.apply_to_option(&mut self.description);
        patch.event_date.apply_to(&mut self.event_date);
        patch.venue_id.apply_to_option(&mut self.venue_id);
        patch.capacity.apply_to_option(&mut self.capacity);
        patch.ticket_price.apply_to(&mut self.ticket_price);
        patch.active.apply_to(&mut self.active);
    }

    /// Case-insensitive name comparison used for uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Payload for a new event, before the store assigns identity and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub venue_id: Option<VenueId>,
    pub capacity: Option<i32>,
    pub ticket_price: f64,
    /// Defaults to `true` when left unspecified.
    pub active: Option<bool>,
}

/// Partial update of an event; `Keep` fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub event_date: Patch<DateTime<Utc>>,
    pub venue_id: Patch<VenueId>,
    pub capacity: Patch<i32>,
    pub ticket_price: Patch<f64>,
    pub active: Patch<bool>,
}

/// Conjunction of optional event criteria. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub venue_id: Option<VenueId>,
    pub active: Option<bool>,
    /// Strictly after.
    pub date_after: Option<DateTime<Utc>>,
    /// On or after.
    pub date_from: Option<DateTime<Utc>>,
    /// On or before.
    pub date_to: Option<DateTime<Utc>>,
}

impl EventFilter {
    pub fn active_only() -> Self {
        Self {
            active: Some(true),
            ..Self::default()
        }
    }

    pub fn for_venue(venue_id: VenueId) -> Self {
        Self {
            venue_id: Some(venue_id),
            ..Self::default()
        }
    }

    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            date_after: Some(now),
            ..Self::default()
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            date_from: Some(start),
            date_to: Some(end),
            ..Self::default()
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(venue_id) = self.venue_id {
            if event.venue_id != Some(venue_id) {
                return false;
            }
        }
        if let Some(active) = self.active {
            if event.active != active {
                return false;
            }
        }
        if let Some(after) = self.date_after {
            if event.event_date <= after {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if event.event_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if event.event_date > to {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSortField {
    Id,
    Name,
    EventDate,
    TicketPrice,
    Capacity,
    CreatedAt,
}

impl EventSortField {
    /// Ascending comparison of two events on this field.
    pub fn compare(self, a: &Event, b: &Event) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::EventDate => a.event_date.cmp(&b.event_date),
            Self::TicketPrice => a.ticket_price.total_cmp(&b.ticket_price),
            Self::Capacity => a.capacity.cmp(&b.capacity),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl SortField for EventSortField {
    fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::EventDate => "eventDate",
            Self::TicketPrice => "ticketPrice",
            Self::Capacity => "capacity",
            Self::CreatedAt => "createdAt",
        }
    }
}

impl FromStr for EventSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "eventDate" | "event_date" => Ok(Self::EventDate),
            "ticketPrice" | "ticket_price" => Ok(Self::TicketPrice),
            "capacity" => Ok(Self::Capacity),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            _ => Err(DomainError::parse(format!("Unknown event sort field: {}", s))),
        }
    }
}
