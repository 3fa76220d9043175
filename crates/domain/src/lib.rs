//! EventVenue domain.
//!
//! Pure catalog vocabulary shared by every store adapter and the engine:
//! identifiers, the `Event` and `Venue` records, creation drafts, partial-update
//! patches, query filters and paging types. Nothing in here performs I/O.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    Event, EventDraft, EventFilter, EventPatch, EventSortField, Venue, VenueDraft, VenueFilter,
    VenuePatch, VenueSortField,
};
pub use error::DomainError;
pub use ids::{EventId, VenueId};
pub use value_objects::{
    Page, PageRequest, Patch, Sort, SortDirection, SortField, SortSpec, PAGE_SIZE_DEFAULT,
    PAGE_SIZE_MAX,
};
