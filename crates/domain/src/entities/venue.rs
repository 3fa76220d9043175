//! Venue entity - a place with an address and a maximum capacity.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::VenueId;
use crate::value_objects::{Patch, SortField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: Option<String>,
    pub max_capacity: i32,
    /// Free-form category ("stadium", "theater", ...).
    #[serde(rename = "type")]
    pub venue_type: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    pub fn from_draft(id: VenueId, draft: VenueDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            address: draft.address,
            city: draft.city,
            country: draft.country,
            max_capacity: draft.max_capacity,
            venue_type: draft.venue_type,
            available: draft.available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: VenuePatch) {
        patch.name.apply_to(&mut self.name);
        patch.address.apply_to(&mut self.address);
        patch.city.apply_to(&mut self.city);
        patch.country.apply_to_option(&mut self.country);
        patch.max_capacity.apply_to(&mut self.max_capacity);
        patch.venue_type.apply_to_option(&mut self.venue_type);
        patch.available.apply_to(&mut self.available);
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDraft {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: Option<String>,
    pub max_capacity: i32,
    pub venue_type: Option<String>,
    /// Defaults to `true` when left unspecified.
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenuePatch {
    pub name: Patch<String>,
    pub address: Patch<String>,
    pub city: Patch<String>,
    pub country: Patch<String>,
    pub max_capacity: Patch<i32>,
    pub venue_type: Patch<String>,
    pub available: Patch<bool>,
}

impl VenuePatch {
    pub fn availability(available: bool) -> Self {
        Self {
            available: Patch::Set(available),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueFilter {
    /// Case-insensitive exact match.
    pub city: Option<String>,
    pub available: Option<bool>,
    /// Inclusive lower bound on `max_capacity`.
    pub min_capacity: Option<i32>,
}

impl VenueFilter {
    pub fn in_city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }

    pub fn availability(available: bool) -> Self {
        Self {
            available: Some(available),
            ..Self::default()
        }
    }

    pub fn min_capacity(capacity: i32) -> Self {
        Self {
            min_capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn matches(&self, venue: &Venue) -> bool {
        if let Some(city) = &self.city {
            if venue.city.to_lowercase() != city.to_lowercase() {
                return false;
            }
        }
        if let Some(available) = self.available {
            if venue.available != available {
                return false;
            }
        }
        if let Some(min) = self.min_capacity {
            if venue.max_capacity < min {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueSortField {
    Id,
    Name,
    City,
    MaxCapacity,
    CreatedAt,
}

impl VenueSortField {
    pub fn compare(self, a: &Venue, b: &Venue) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::City => a.city.to_lowercase().cmp(&b.city.to_lowercase()),
            Self::MaxCapacity => a.max_capacity.cmp(&b.max_capacity),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl SortField for VenueSortField {
    fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::City => "city",
            Self::MaxCapacity => "maxCapacity",
            Self::CreatedAt => "createdAt",
        }
    }
}

impl FromStr for VenueSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "city" => Ok(Self::City),
            "maxCapacity" | "max_capacity" => Ok(Self::MaxCapacity),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            _ => Err(DomainError::parse(format!("Unknown venue sort field: {}", s))),
        }
    }
}
