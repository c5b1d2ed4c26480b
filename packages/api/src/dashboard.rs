//! Dashboard loading: analytics, projects and tasks fetched concurrently.
//!
//! The three requests are independent. Each one that fails leaves its slice
//! empty and adds a notice; the others are still applied.

use resolver::{DashboardAnalytics, Page, Project, ProjectQuery, Task, TaskQuery};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;

/// How many projects and tasks the dashboard asks for.
pub const DASHBOARD_LIMIT: u32 = 100;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dashboard {
    pub analytics: Option<DashboardAnalytics>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    /// One entry per failed request, suitable for a notification.
    pub notices: Vec<String>,
    /// Set when any request found the session unrecoverable.
    pub signed_out: bool,
}

impl<T: Transport> ApiClient<T> {
    pub async fn load_dashboard(&self) -> Dashboard {
        let project_query = ProjectQuery {
            page: Page::limit(DASHBOARD_LIMIT),
            ..Default::default()
        };
        let task_query = TaskQuery {
            page: Page::limit(DASHBOARD_LIMIT),
            ..Default::default()
        };

        let (analytics, projects, tasks) = futures::join!(
            self.dashboard_analytics(),
            self.projects(&project_query),
            self.tasks(&task_query),
        );

        let mut dashboard = Dashboard::default();
        dashboard.analytics = dashboard.absorb("analytics", analytics);
        dashboard.projects = dashboard
            .absorb("projects", projects)
            .map(|l| l.items)
            .unwrap_or_default();
        dashboard.tasks = dashboard
            .absorb("tasks", tasks)
            .map(|l| l.items)
            .unwrap_or_default();
        dashboard
    }
}

impl Dashboard {
    fn absorb<V>(&mut self, what: &str, result: Result<V, ApiError>) -> Option<V> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Dashboard {what} failed: {e}");
                self.signed_out |= e.requires_login();
                self.notices
                    .push(format!("Failed to load {what}: {}", e.user_message()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedTransport;
    use crate::session::Session;
    use serde_json::json;

    #[tokio::test]
    async fn test_one_failure_does_not_block_the_others() {
        let transport = ScriptedTransport::new();
        // join! polls in argument order and the transport answers immediately,
        // so responses are consumed analytics, projects, tasks.
        transport.respond(500, json!({ "success": false, "message": "aggregation failed" }));
        transport.respond(200, json!({ "success": true, "data": { "items": [{ "_id": "p1" }] } }));
        transport.respond(200, json!({ "success": true, "items": [{ "_id": "t1" }, { "_id": "t2" }] }));
        let client = ApiClient::new(transport.clone(), Session::default());

        let dashboard = client.load_dashboard().await;
        assert!(dashboard.analytics.is_none());
        assert_eq!(dashboard.projects.len(), 1);
        assert_eq!(dashboard.tasks.len(), 2);
        assert_eq!(dashboard.notices, vec!["Failed to load analytics: aggregation failed"]);
        assert!(!dashboard.signed_out);

        let limits: Vec<_> = transport.requests().iter().map(|r| r.query.clone()).collect();
        assert_eq!(limits[1], vec![("limit", "100".to_string())]);
        assert_eq!(limits[2], vec![("limit", "100".to_string())]);
    }

    #[tokio::test]
    async fn test_all_succeed() {
        let transport = ScriptedTransport::new();
        transport.respond(200, json!({ "success": true, "data": { "overview": { "totalTasks": 2 } } }));
        transport.respond(200, json!({ "success": true, "data": { "projects": [] } }));
        transport.respond(200, json!({ "success": true, "data": { "tasks": [{ "_id": "t1" }] } }));
        let client = ApiClient::new(transport, Session::default());

        let dashboard = client.load_dashboard().await;
        assert_eq!(dashboard.analytics.map(|a| a.overview.total_tasks), Some(2));
        assert!(dashboard.projects.is_empty());
        assert_eq!(dashboard.tasks.len(), 1);
        assert!(dashboard.notices.is_empty());
    }
}
