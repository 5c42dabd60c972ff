//! Sample data seeding for offline browsing.
//!
//! When the remote API is unreachable (or the user just wants to poke
//! around), the app renders a seeded sample data set from the local
//! store. Seeding happens once, guarded by the `demo_initialized` key;
//! `reset` wipes and reseeds.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Task, TaskStatus, UserProfile};
use crate::storage::{
    LocalStore, KEY_DEMO_CATEGORIES, KEY_DEMO_INITIALIZED, KEY_DEMO_TASKS, KEY_DEMO_USER,
    KEY_USERNAME,
};

/// Aggregate counts over a task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
}

pub fn stats(tasks: &[Task]) -> TaskStats {
    TaskStats {
        total: tasks.len(),
        completed: count_status(tasks, TaskStatus::Completed),
        pending: count_status(tasks, TaskStatus::Pending),
        in_progress: count_status(tasks, TaskStatus::InProgress),
    }
}

fn count_status(tasks: &[Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|t| t.status == status).count()
}

/// Seed the store with sample data unless it has been seeded before.
pub fn ensure_seeded(store: &LocalStore) -> Result<()> {
    if store.get(KEY_DEMO_INITIALIZED).is_some() {
        return Ok(());
    }

    let user = sample_user();
    let tasks = sample_tasks();
    let categories = sample_categories();

    store.set_json(KEY_DEMO_USER, &user)?;
    if store.username().is_none() {
        store.set(KEY_USERNAME, user.username.clone())?;
    }
    store.set_json(KEY_DEMO_TASKS, &tasks)?;
    store.set_json(KEY_DEMO_CATEGORIES, &categories)?;
    store.set(KEY_DEMO_INITIALIZED, "true")?;

    info!(
        tasks = tasks.len(),
        categories = categories.len(),
        "Seeded demo data"
    );
    Ok(())
}

/// Wipe the seeded data and seed again from scratch.
pub fn reset(store: &LocalStore) -> Result<()> {
    store.remove(KEY_DEMO_INITIALIZED)?;
    store.remove(KEY_DEMO_USER)?;
    store.remove(KEY_DEMO_TASKS)?;
    store.remove(KEY_DEMO_CATEGORIES)?;
    ensure_seeded(store)
}

/// Seeded tasks, falling back to a generated set if the store entry is
/// missing or unreadable.
pub fn tasks(store: &LocalStore) -> Vec<Task> {
    store
        .get_json(KEY_DEMO_TASKS)
        .unwrap_or_else(sample_tasks)
}

/// Seeded user, with the same fallback.
pub fn user(store: &LocalStore) -> UserProfile {
    store.get_json(KEY_DEMO_USER).unwrap_or_else(sample_user)
}

pub fn sample_user() -> UserProfile {
    UserProfile {
        username: "demo".to_string(),
        email: Some("demo@example.com".to_string()),
        display_name: Some("Demo User".to_string()),
        location: Some("Khon Kaen".to_string()),
        bio: Some("Sample account for offline browsing".to_string()),
        created_at: Some("2024-01-15T10:00:00.000Z".to_string()),
    }
}

pub fn sample_categories() -> Vec<String> {
    [
        "Routine", "Meetings", "Daily", "Development", "Learning", "Design", "Presentations",
        "Personal", "Technical", "Finance", "Health", "Writing",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn sample_tasks() -> Vec<Task> {
    let specs: Vec<(i64, &str, &str, TaskStatus, u8, &str, &str, &str, Option<&str>)> = vec![
        (
            1,
            "Write the monthly report",
            "Summarize August progress for the team",
            TaskStatus::Completed,
            3,
            "Routine",
            "2024-08-15",
            "2024-08-01T09:00:00.000Z",
            Some("2024-08-10T16:30:00.000Z"),
        ),
        (
            2,
            "Development team meeting",
            "Plan the next quarter's roadmap",
            TaskStatus::Completed,
            2,
            "Meetings",
            "2024-08-12",
            "2024-08-05T10:00:00.000Z",
            Some("2024-08-12T14:00:00.000Z"),
        ),
        (
            3,
            "Clear the inbox",
            "Reply to important mail and archive the rest",
            TaskStatus::Completed,
            1,
            "Daily",
            "2024-08-10",
            "2024-08-10T08:00:00.000Z",
            Some("2024-08-10T09:30:00.000Z"),
        ),
        (
            4,
            "Ship the website update",
            "New features plus the open bug fixes",
            TaskStatus::Completed,
            3,
            "Development",
            "2024-08-20",
            "2024-08-08T11:00:00.000Z",
            Some("2024-08-18T17:00:00.000Z"),
        ),
        (
            5,
            "Finish the JavaScript course",
            "Complete the advanced modules",
            TaskStatus::Completed,
            2,
            "Learning",
            "2024-08-25",
            "2024-08-01T19:00:00.000Z",
            Some("2024-08-22T20:30:00.000Z"),
        ),
        (
            6,
            "Design the new screens",
            "Mock up the redesigned application views",
            TaskStatus::Completed,
            3,
            "Design",
            "2024-08-30",
            "2024-08-15T13:00:00.000Z",
            Some("2024-08-28T16:45:00.000Z"),
        ),
        (
            7,
            "Prepare the project presentation",
            "Slides and talking points for the demo",
            TaskStatus::Pending,
            3,
            "Presentations",
            "2024-08-28",
            "2024-08-20T10:00:00.000Z",
            None,
        ),
        (
            8,
            "Buy household supplies",
            "Restock the essentials",
            TaskStatus::Pending,
            1,
            "Personal",
            "2024-08-25",
            "2024-08-22T18:00:00.000Z",
            None,
        ),
        (
            9,
            "Back up the data",
            "Push important files to cloud storage",
            TaskStatus::Pending,
            2,
            "Technical",
            "2024-08-26",
            "2024-08-23T09:00:00.000Z",
            None,
        ),
        (
            10,
            "Plan next month's trip",
            "Book the stay and sketch the itinerary",
            TaskStatus::InProgress,
            2,
            "Personal",
            "2024-09-01",
            "2024-08-20T15:00:00.000Z",
            None,
        ),
        (
            11,
            "Review the budget",
            "Check spending against the monthly plan",
            TaskStatus::Pending,
            2,
            "Finance",
            "2024-08-31",
            "2024-08-24T12:00:00.000Z",
            None,
        ),
        (
            12,
            "Finish reading Clean Code",
            "Last four chapters",
            TaskStatus::InProgress,
            1,
            "Learning",
            "2024-09-15",
            "2024-08-10T20:00:00.000Z",
            None,
        ),
        (
            13,
            "Gym three times this week",
            "Keep the streak going",
            TaskStatus::InProgress,
            2,
            "Health",
            "2024-08-31",
            "2024-08-01T06:00:00.000Z",
            None,
        ),
        (
            14,
            "Tidy the desk",
            "Clean up the workspace",
            TaskStatus::Pending,
            1,
            "Personal",
            "2024-08-27",
            "2024-08-25T17:00:00.000Z",
            None,
        ),
        (
            15,
            "Draft the responsive design post",
            "New article for the blog",
            TaskStatus::Pending,
            2,
            "Writing",
            "2024-09-05",
            "2024-08-25T14:00:00.000Z",
            None,
        ),
    ];

    specs
        .into_iter()
        .map(
            |(id, title, description, status, priority, category, due, created, completed)| Task {
                id,
                title: title.to_string(),
                description: description.to_string(),
                status,
                priority,
                category: Some(category.to_string()),
                due_date: Some(due.to_string()),
                created_at: Some(created.to_string()),
                completed_at: completed.map(|s| s.to_string()),
            },
        )
        .collect()
}
