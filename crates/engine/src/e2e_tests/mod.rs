//! End-to-end HTTP tests.
//!
//! Each test drives the complete router (extractors, use cases, store and
//! error rendering) with `tower::ServiceExt::oneshot`. The clock is manual so
//! "future" and "upcoming" are deterministic.
//!
//! ```bash
//! cargo test -p eventvenue-engine --lib e2e_tests
//! ```

mod e2e_helpers;
mod event_api_tests;

pub use e2e_helpers::*;
