//! Catalog entities.

mod event;
mod venue;

pub use event::{Event, EventDraft, EventFilter, EventPatch, EventSortField};
pub use venue::{Venue, VenueDraft, VenueFilter, VenuePatch, VenueSortField};
