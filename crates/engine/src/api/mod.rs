//! API layer - HTTP entry points.

pub mod dto;
mod events;
mod extract;
pub mod http;
mod venues;

pub use http::{router, routes, ApiError};
