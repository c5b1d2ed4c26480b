//! Client-side list composition: visibility first, then the user's filters.

use crate::models::{
    Project, ProjectPriority, ProjectStatus, Role, Task, TaskPriority, TaskStatus, User,
};
use crate::policy::AccessPolicy;
use crate::relation::extract_id;

/// Case-insensitive substring match over title and description. An empty term
/// matches everything.
fn matches_search(term: &str, title: &str, description: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    title.to_lowercase().contains(&needle) || description.to_lowercase().contains(&needle)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectFilter {
    pub search: String,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        matches_search(&self.search, &project.title, &project.description)
            && self.status.map_or(true, |s| project.status == s)
            && self.priority.map_or(true, |p| project.priority == p)
    }

    /// Number of dropdown filters in effect (search is not counted).
    pub fn active_count(&self) -> usize {
        [self.status.is_some(), self.priority.is_some()]
            .into_iter()
            .filter(|active| *active)
            .count()
    }

    pub fn clear(&mut self) {
        self.status = None;
        self.priority = None;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskFilter {
    pub search: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        matches_search(&self.search, &task.title, &task.description)
            && self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self
                .project_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .map_or(true, |id| extract_id(task.project_id.as_ref()) == Some(id))
    }

    pub fn active_count(&self) -> usize {
        [
            self.status.is_some(),
            self.priority.is_some(),
            self.project_id.as_deref().is_some_and(|id| !id.is_empty()),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn clear(&mut self) {
        self.status = None;
        self.priority = None;
        self.project_id = None;
    }
}

/// Projects the acting user may see that also pass `filter`, in input order.
pub fn visible_projects<'p>(
    policy: &AccessPolicy<'_>,
    projects: &'p [Project],
    filter: &ProjectFilter,
) -> Vec<&'p Project> {
    projects
        .iter()
        .filter(|p| policy.can_view_project(p) && filter.matches(p))
        .collect()
}

/// Tasks the acting user may see that also pass `filter`, in input order.
pub fn visible_tasks<'t>(
    policy: &AccessPolicy<'_>,
    tasks: &'t [Task],
    filter: &TaskFilter,
) -> Vec<&'t Task> {
    tasks
        .iter()
        .filter(|t| policy.can_view_task(t) && filter.matches(t))
        .collect()
}

/// Users that can be put on a project team: everyone except admins.
pub fn team_candidates(users: &[User]) -> Vec<&User> {
    users.iter().filter(|u| u.role != Role::Admin).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;

    fn task(id: &str, title: &str, status: TaskStatus, project: &str) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            status,
            project_id: Some(project.into()),
            ..Default::default()
        }
    }

    fn admin() -> User {
        User {
            id: "a1".into(),
            role: Role::Admin,
            ..Default::default()
        }
    }

    #[test]
    fn test_status_and_search_are_conjunctive() {
        let admin = admin();
        let policy = AccessPolicy::new(Some(&admin), &[]);
        let tasks = vec![
            task("t1", "Fix bug", TaskStatus::Todo, "p1"),
            task("t2", "Write docs", TaskStatus::Completed, "p1"),
        ];
        let filter = TaskFilter {
            search: "bug".into(),
            status: Some(TaskStatus::Todo),
            ..Default::default()
        };
        let visible = visible_tasks(&policy, &tasks, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "t1");
    }

    #[test]
    fn test_search_is_case_insensitive_over_description() {
        let mut t = task("t1", "Release", TaskStatus::Todo, "p1");
        t.description = "Bump the CHANGELOG".into();
        let filter = TaskFilter {
            search: "changelog".into(),
            ..Default::default()
        };
        assert!(filter.matches(&t));
        assert!(TaskFilter::default().matches(&t));
    }

    #[test]
    fn test_project_filter_accepts_both_relation_shapes() {
        let mut embedded = task("t2", "B", TaskStatus::Todo, "p1");
        embedded.project_id = Some(Relation::Embedded(Box::new(Project {
            id: "p1".into(),
            ..Default::default()
        })));
        let filter = TaskFilter {
            project_id: Some("p1".into()),
            ..Default::default()
        };
        assert!(filter.matches(&task("t1", "A", TaskStatus::Todo, "p1")));
        assert!(filter.matches(&embedded));
        assert!(!filter.matches(&task("t3", "C", TaskStatus::Todo, "p2")));
    }

    #[test]
    fn test_filters_cannot_bypass_visibility() {
        let member = User {
            id: "u1".into(),
            role: Role::TeamMember,
            ..Default::default()
        };
        let projects = vec![Project {
            id: "p1".into(),
            title: "Mine".into(),
            team_members: vec!["u1".into()],
            ..Default::default()
        }];
        let tasks = vec![
            task("t1", "Visible", TaskStatus::Todo, "p1"),
            task("t2", "Hidden", TaskStatus::Todo, "p2"),
        ];
        let policy = AccessPolicy::new(Some(&member), &projects);
        let filter = TaskFilter {
            project_id: Some("p2".into()),
            ..Default::default()
        };
        assert!(visible_tasks(&policy, &tasks, &filter).is_empty());
        assert_eq!(visible_tasks(&policy, &tasks, &TaskFilter::default()).len(), 1);
    }

    #[test]
    fn test_visible_projects_apply_status_and_priority() {
        let admin = admin();
        let projects = vec![
            Project {
                id: "p1".into(),
                status: ProjectStatus::InProgress,
                priority: ProjectPriority::High,
                ..Default::default()
            },
            Project {
                id: "p2".into(),
                status: ProjectStatus::InProgress,
                priority: ProjectPriority::Low,
                ..Default::default()
            },
        ];
        let policy = AccessPolicy::new(Some(&admin), &projects);
        let filter = ProjectFilter {
            status: Some(ProjectStatus::InProgress),
            priority: Some(ProjectPriority::High),
            ..Default::default()
        };
        let visible = visible_projects(&policy, &projects, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "p1");
        assert_eq!(filter.active_count(), 2);
    }

    #[test]
    fn test_active_count_and_clear() {
        let mut filter = TaskFilter {
            search: "x".into(),
            status: Some(TaskStatus::Blocked),
            project_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.active_count(), 1);
        filter.clear();
        assert_eq!(filter.active_count(), 0);
        assert_eq!(filter.search, "x");
    }

    #[test]
    fn test_team_candidates_exclude_admins() {
        let users = vec![
            admin(),
            User {
                id: "u1".into(),
                role: Role::TeamMember,
                ..Default::default()
            },
            User {
                id: "m1".into(),
                role: Role::Manager,
                ..Default::default()
            },
        ];
        let ids: Vec<_> = team_candidates(&users).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "m1"]);
    }
}
