//! Value objects shared across entities.

mod page;
mod patch;

pub use page::{
    Page, PageRequest, Sort, SortDirection, SortField, SortSpec, PAGE_SIZE_DEFAULT, PAGE_SIZE_MAX,
};
pub use patch::Patch;
