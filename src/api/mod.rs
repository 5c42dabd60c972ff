//! REST API client module for the to-do list service.
//!
//! This module provides the `ApiClient` for communicating with the
//! remote to-do API: bearer-token authentication, a short-lived
//! response cache, a serial request queue, and bounded retry.
//!
//! A 401 response is never surfaced to callers; it clears the stored
//! token and emits a `SessionEvent` so the UI can return to the login
//! page.

pub mod client;
pub mod error;

pub use client::{ApiClient, CallOptions, SessionEvent, DEFAULT_API_BASE};
pub use error::ApiError;
