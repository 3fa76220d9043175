//! Use cases - User story orchestration.
//!
//! Use cases sequence the catalog rules and a single store write per
//! operation. Handlers stay thin and call into these.

pub mod catalog;
pub mod validation;

pub use catalog::{CatalogError, CatalogUseCases};
