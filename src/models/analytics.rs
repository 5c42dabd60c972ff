use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aggregate task counts from `/analytics/overview`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub completed_tasks: u64,
    #[serde(default)]
    pub pending_tasks: u64,
    #[serde(default)]
    pub in_progress_tasks: u64,
}

impl AnalyticsOverview {
    pub fn completion_percent(&self) -> u64 {
        if self.total_tasks == 0 {
            0
        } else {
            self.completed_tasks * 100 / self.total_tasks
        }
    }
}

/// Composite of the three analytics endpoints. Each field is loaded
/// independently; a failed sub-call leaves its field unset without
/// failing the others.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsBundle {
    pub overview: Option<AnalyticsOverview>,
    pub tasks: Option<Value>,
    pub habits: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_percent_handles_zero_total() {
        assert_eq!(AnalyticsOverview::default().completion_percent(), 0);
        let overview = AnalyticsOverview {
            total_tasks: 4,
            completed_tasks: 3,
            ..Default::default()
        };
        assert_eq!(overview.completion_percent(), 75);
    }
}
