//! Server-computed analytics, as returned by `/analytics/dashboard`.
//!
//! Nothing here is computed client-side; the structs only give the payload a
//! shape the dashboard can render, tolerating missing sections.

use serde::{Deserialize, Serialize};

use crate::de::{lenient_vec, null_as_default};
use crate::models::{ProjectStatus, Task, TaskPriority, TaskStatus};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Overview {
    pub total_projects: u64,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub overdue_tasks: u64,
    pub completion_rate: f64,
}

/// One bucket of a server-side group-by; `_id` carries the grouped value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    default,
    rename_all = "camelCase",
    bound(deserialize = "K: Default + Deserialize<'de>")
)]
pub struct Bucket<K: Default> {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub key: K,
    pub count: u64,
    pub total_budget: Option<f64>,
    pub total_estimated_hours: Option<f64>,
    pub total_actual_hours: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamWorkload {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    pub overdue_tasks: u64,
    pub total_estimated_hours: f64,
    pub total_actual_hours: f64,
    pub completion_rate: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardAnalytics {
    #[serde(deserialize_with = "null_as_default")]
    pub overview: Overview,
    #[serde(deserialize_with = "lenient_vec")]
    pub project_stats: Vec<Bucket<ProjectStatus>>,
    #[serde(deserialize_with = "lenient_vec")]
    pub task_stats: Vec<Bucket<TaskStatus>>,
    #[serde(deserialize_with = "lenient_vec")]
    pub priority_stats: Vec<Bucket<TaskPriority>>,
    #[serde(deserialize_with = "lenient_vec")]
    pub team_workload: Vec<TeamWorkload>,
    #[serde(deserialize_with = "lenient_vec")]
    pub recent_activity: Vec<Task>,
}

impl DashboardAnalytics {
    pub fn task_count(&self, status: TaskStatus) -> u64 {
        self.task_stats
            .iter()
            .filter(|b| b.key == status)
            .map(|b| b.count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_dashboard_payload() {
        let analytics: DashboardAnalytics = serde_json::from_value(json!({
            "overview": { "totalProjects": 3, "totalTasks": 12, "completionRate": 41.7 },
            "taskStats": [
                { "_id": "todo", "count": 4 },
                { "_id": "completed", "count": 5, "totalActualHours": 20.5 },
                { "_id": "archived", "count": 1 }
            ],
            "teamWorkload": null
        }))
        .unwrap();

        assert_eq!(analytics.overview.total_projects, 3);
        assert_eq!(analytics.overview.overdue_tasks, 0);
        assert_eq!(analytics.task_count(TaskStatus::Completed), 5);
        assert_eq!(analytics.task_count(TaskStatus::Blocked), 0);
        // the unknown status bucket is skipped
        assert_eq!(analytics.task_stats.len(), 2);
        assert!(analytics.team_workload.is_empty());
        assert!(analytics.recent_activity.is_empty());
    }
}
