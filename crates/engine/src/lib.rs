//! EventVenue Engine library.
//!
//! Server-side catalog of events and venues.
//!
//! ## Structure
//!
//! - `use_cases/` - Catalog rules and operation sequencing
//! - `infrastructure/` - Ports and their adapters (in-memory, SQLite, clock)
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment-driven settings

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

/// HTTP round-trip tests against the full router.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
