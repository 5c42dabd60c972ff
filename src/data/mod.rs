//! Resource-level caching and de-duplication over the API client.
//!
//! The `DataManager` fronts three resources - the user profile, the
//! task list, and the analytics bundle - keeping each fresh for a short
//! window and collapsing concurrent loads of the same resource into a
//! single network call.

pub mod manager;

pub use manager::{DataManager, LoadResult};
