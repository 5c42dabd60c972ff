//! Local key-value persistence.
//!
//! This module provides the `LocalStore`, a string-keyed store backed by
//! a single JSON file. Writes are last-write-wins with no schema
//! versioning; it holds the bearer token, the cached username, and the
//! seeded demo data.

pub mod store;

pub use store::{
    LocalStore, KEY_DEMO_CATEGORIES, KEY_DEMO_INITIALIZED, KEY_DEMO_TASKS, KEY_DEMO_USER,
    KEY_TOKEN, KEY_USERNAME,
};
