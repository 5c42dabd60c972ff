//! Data models for the to-do list API.
//!
//! All task and profile data is owned by the remote API; the client
//! holds read-through copies only.
//!
//! - `Task`, `TaskStatus`: the core task entity and its status set
//! - `UserProfile`: the signed-in user's profile
//! - `AnalyticsOverview`, `AnalyticsBundle`: analytics payloads

pub mod analytics;
pub mod task;
pub mod user;

pub use analytics::{AnalyticsBundle, AnalyticsOverview};
pub use task::{parse_task_list, Task, TaskStatus};
pub use user::{parse_user_info, UserProfile};
