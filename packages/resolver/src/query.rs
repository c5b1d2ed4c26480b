//! Query parameters for the collection endpoints.
//!
//! Unset fields are omitted so the server applies its own defaults.

use crate::models::{ProjectPriority, ProjectStatus, TaskPriority, TaskStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Paging and sorting shared by every collection query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl Page {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        push(pairs, "page", self.page.map(|p| p.to_string()));
        push(pairs, "limit", self.limit.map(|l| l.to_string()));
        push(pairs, "sort", self.sort.clone());
        push(pairs, "order", self.order.map(|o| o.as_str().to_string()));
    }
}

fn push(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        pairs.push((key, value));
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub manager_id: Option<String>,
    pub search: Option<String>,
    pub page: Page,
}

impl ProjectQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "status", self.status.map(|s| s.as_str().to_string()));
        push(&mut pairs, "priority", self.priority.map(|p| p.as_str().to_string()));
        push(&mut pairs, "managerId", self.manager_id.clone());
        push(&mut pairs, "search", self.search.clone());
        self.page.push_pairs(&mut pairs);
        pairs
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<String>,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
    pub search: Option<String>,
    pub overdue: Option<bool>,
    pub page: Page,
}

impl TaskQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "status", self.status.map(|s| s.as_str().to_string()));
        push(&mut pairs, "priority", self.priority.map(|p| p.as_str().to_string()));
        push(&mut pairs, "projectId", self.project_id.clone());
        push(&mut pairs, "assignedTo", self.assigned_to.clone());
        push(&mut pairs, "createdBy", self.created_by.clone());
        push(&mut pairs, "search", self.search.clone());
        push(&mut pairs, "overdue", self.overdue.map(|o| o.to_string()));
        self.page.push_pairs(&mut pairs);
        pairs
    }
}

impl From<&crate::filter::TaskFilter> for TaskQuery {
    fn from(filter: &crate::filter::TaskFilter) -> Self {
        Self {
            status: filter.status,
            priority: filter.priority,
            project_id: filter.project_id.clone(),
            search: Some(filter.search.clone()),
            ..Default::default()
        }
    }
}

impl From<&crate::filter::ProjectFilter> for ProjectQuery {
    fn from(filter: &crate::filter::ProjectFilter) -> Self {
        Self {
            status: filter.status,
            priority: filter.priority,
            search: Some(filter.search.clone()),
            ..Default::default()
        }
    }
}
