//! Terminal user interface.
//!
//! Layout follows the usual four-band shape: title bar, navigation
//! tabs, page content, status bar. Notifications and confirmation
//! dialogs render as overlays on top.

pub mod confirm;
pub mod input;
pub mod nav;
pub mod notify;
pub mod pages;
pub mod render;
pub mod styles;
