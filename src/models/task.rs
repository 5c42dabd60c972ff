use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::dates;

/// Task lifecycle status. Serialized with the API's kebab-case names
/// (`pending`, `in-progress`, `completed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// A to-do task as served by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

fn default_priority() -> u8 {
    1
}

impl Task {
    /// An open task whose due date has passed.
    pub fn is_overdue(&self) -> bool {
        self.status != TaskStatus::Completed && dates::is_overdue(&self.due_date)
    }

    pub fn is_due_today(&self) -> bool {
        dates::is_today(&self.due_date)
    }

    pub fn priority_label(&self) -> &'static str {
        match self.priority {
            0 | 1 => "low",
            2 => "medium",
            _ => "high",
        }
    }
}

#[derive(Debug, Deserialize)]
struct TasksResponse {
    tasks: Vec<Task>,
}

/// Parse a task-list payload. The API wraps the list in a `tasks`
/// field, but some responses are a bare array; anything else (including
/// the null body of a short-circuited call) is an empty list.
pub fn parse_task_list(value: Value) -> Vec<Task> {
    if let Ok(wrapper) = serde_json::from_value::<TasksResponse>(value.clone()) {
        return wrapper.tasks;
    }
    serde_json::from_value::<Vec<Task>>(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> Value {
        json!({
            "id": 7,
            "title": "Write release notes",
            "description": "Summarize the changes",
            "status": "in-progress",
            "priority": 2,
            "category": "Writing",
            "due_date": "2024-08-20",
            "created_at": "2024-08-10T09:00:00.000Z"
        })
    }

    #[test]
    fn parses_status_strings() {
        for (text, status) in [
            ("pending", TaskStatus::Pending),
            ("in-progress", TaskStatus::InProgress),
            ("completed", TaskStatus::Completed),
        ] {
            let parsed: TaskStatus =
                serde_json::from_value(Value::String(text.to_string())).unwrap();
            assert_eq!(parsed, status);
            assert_eq!(serde_json::to_value(status).unwrap(), json!(text));
        }
    }

    #[test]
    fn parses_task_with_defaults() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "title": "Bare minimum",
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(task.priority, 1);
        assert_eq!(task.description, "");
        assert!(task.due_date.is_none());
    }

    #[test]
    fn parses_wrapped_and_bare_task_lists() {
        let wrapped = json!({ "tasks": [sample_json()] });
        let bare = json!([sample_json()]);
        assert_eq!(parse_task_list(wrapped).len(), 1);
        assert_eq!(parse_task_list(bare).len(), 1);
        assert!(parse_task_list(Value::Null).is_empty());
        assert!(parse_task_list(json!({"unexpected": true})).is_empty());
    }

    #[test]
    fn completed_tasks_are_never_overdue() {
        let mut task: Task = serde_json::from_value(sample_json()).unwrap();
        task.due_date = Some("2000-01-01".to_string());
        assert!(task.is_overdue());
        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue());
    }

    #[test]
    fn priority_labels() {
        let mut task: Task = serde_json::from_value(sample_json()).unwrap();
        task.priority = 1;
        assert_eq!(task.priority_label(), "low");
        task.priority = 2;
        assert_eq!(task.priority_label(), "medium");
        task.priority = 3;
        assert_eq!(task.priority_label(), "high");
    }
}
