//! # Role-based access policy
//!
//! [`AccessPolicy`] answers view/create/edit/delete questions for the acting user.
//! It holds no decisions of its own: it is built from the current user and the
//! currently loaded project list on every render, and every predicate is pure.
//!
//! | Action | Admin | Member (team_member, manager by default) |
//! |--------|-------|------------------------------------------|
//! | View / edit project | always | member of the project's team |
//! | Create / delete project | always | never |
//! | View task | always | assignee, or member of the task's loaded project |
//! | Edit task | always | assignee, creator, or member of the task's loaded project |
//! | Delete task | always | never |
//! | Create task | always | only for a given project the user is a member of |
//!
//! No user, or a role this client does not recognise, means every answer is `false`.
//! A task whose project is not in the loaded list is never reachable through project
//! membership: missing data does not grant access.
//!
//! These checks only decide which affordances the UI offers. The API authorizes every
//! mutation independently.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Project, Role, Task, User};
use crate::relation::{extract_id, extract_ids};

/// Tunables for [`AccessPolicy`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOptions {
    /// Give managers the same rights as admins. Off by default, in which case
    /// managers follow the team-member rules.
    #[serde(default)]
    pub elevate_managers: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Privilege {
    Full,
    Member,
}

pub struct AccessPolicy<'a> {
    user: Option<&'a User>,
    projects: HashMap<&'a str, &'a Project>,
    options: PolicyOptions,
}

impl<'a> AccessPolicy<'a> {
    /// Build a policy for `user` against the loaded `projects`. When a project id
    /// appears more than once, the first occurrence is used.
    pub fn new(user: Option<&'a User>, projects: &'a [Project]) -> Self {
        let mut index = HashMap::with_capacity(projects.len());
        for project in projects {
            if !project.id.is_empty() {
                index.entry(project.id.as_str()).or_insert(project);
            }
        }
        Self {
            user,
            projects: index,
            options: PolicyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PolicyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn user(&self) -> Option<&'a User> {
        self.user
    }

    fn privilege(&self) -> Option<Privilege> {
        let user = self.user?;
        match user.role {
            Role::Admin => Some(Privilege::Full),
            Role::Manager if self.options.elevate_managers => Some(Privilege::Full),
            Role::Manager | Role::TeamMember => Some(Privilege::Member),
            Role::Unknown => None,
        }
    }

    /// The acting user's id, only when they hold member-level rights.
    fn member_id(&self) -> Option<&'a str> {
        match self.privilege()? {
            Privilege::Member => self.user.map(|u| u.id.as_str()).filter(|id| !id.is_empty()),
            Privilege::Full => None,
        }
    }

    fn is_full(&self) -> bool {
        self.privilege() == Some(Privilege::Full)
    }

    fn is_team_member(project: &Project, user_id: &str) -> bool {
        extract_ids(&project.team_members).any(|id| id == user_id)
    }

    /// Membership through the task's project, resolved against the loaded list only.
    fn is_member_via_project(&self, task: &Task, user_id: &str) -> bool {
        extract_id(task.project_id.as_ref())
            .and_then(|project_id| self.projects.get(project_id))
            .is_some_and(|project| Self::is_team_member(project, user_id))
    }

    pub fn can_view_project(&self, project: &Project) -> bool {
        if self.is_full() {
            return true;
        }
        self.member_id()
            .is_some_and(|user_id| Self::is_team_member(project, user_id))
    }

    pub fn can_edit_project(&self, project: &Project) -> bool {
        self.can_view_project(project)
    }

    pub fn can_delete_project(&self, _project: &Project) -> bool {
        self.is_full()
    }

    pub fn can_create_project(&self) -> bool {
        self.is_full()
    }

    pub fn can_view_task(&self, task: &Task) -> bool {
        if self.is_full() {
            return true;
        }
        let Some(user_id) = self.member_id() else {
            return false;
        };
        extract_id(task.assigned_to.as_ref()) == Some(user_id)
            || self.is_member_via_project(task, user_id)
    }

    pub fn can_edit_task(&self, task: &Task) -> bool {
        if self.is_full() {
            return true;
        }
        let Some(user_id) = self.member_id() else {
            return false;
        };
        extract_id(task.assigned_to.as_ref()) == Some(user_id)
            || extract_id(task.created_by.as_ref()) == Some(user_id)
            || self.is_member_via_project(task, user_id)
    }

    pub fn can_delete_task(&self, _task: &Task) -> bool {
        self.is_full()
    }

    pub fn can_create_task(&self, project: Option<&Project>) -> bool {
        if self.is_full() {
            return true;
        }
        match (self.member_id(), project) {
            (Some(user_id), Some(project)) => Self::is_team_member(project, user_id),
            _ => false,
        }
    }

    /// Whether any project in the loaded list accepts new tasks from this user.
    pub fn can_create_any_task(&self) -> bool {
        self.is_full()
            || self
                .projects
                .values()
                .copied()
                .any(|p| self.can_create_task(Some(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;
    use serde_json::json;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.into(),
            role,
            ..Default::default()
        }
    }

    fn project(id: &str, members: &[&str]) -> Project {
        Project {
            id: id.into(),
            team_members: members.iter().map(|m| Relation::from(*m)).collect(),
            ..Default::default()
        }
    }

    fn task(project_id: &str, assigned_to: Option<&str>, created_by: Option<&str>) -> Task {
        Task {
            id: "t1".into(),
            project_id: Some(project_id.into()),
            assigned_to: assigned_to.map(Relation::from),
            created_by: created_by.map(Relation::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_admin_sees_every_project() {
        let admin = user("a1", Role::Admin);
        let projects = vec![project("p1", &[]), project("p2", &["u1"])];
        let policy = AccessPolicy::new(Some(&admin), &projects);
        for p in &projects {
            assert!(policy.can_view_project(p));
            assert!(policy.can_edit_project(p));
            assert!(policy.can_delete_project(p));
        }
        assert!(policy.can_create_project());
        assert!(policy.can_create_task(None));
    }

    #[test]
    fn test_member_sees_only_their_projects() {
        let member = user("u1", Role::TeamMember);
        let projects = vec![
            project("p1", &["u1", "u2"]),
            project("p2", &["u2"]),
            project("p3", &[]),
        ];
        let policy = AccessPolicy::new(Some(&member), &projects);
        assert!(policy.can_view_project(&projects[0]));
        assert!(policy.can_edit_project(&projects[0]));
        assert!(!policy.can_delete_project(&projects[0]));
        assert!(!policy.can_view_project(&projects[1]));
        assert!(!policy.can_view_project(&projects[2]));
        assert!(!policy.can_create_project());
    }

    #[test]
    fn test_membership_matches_embedded_members() {
        let member = user("u1", Role::TeamMember);
        let mut p = project("p1", &[]);
        p.team_members.push(Relation::Embedded(Box::new(user("u1", Role::TeamMember))));
        let projects = vec![p];
        let policy = AccessPolicy::new(Some(&member), &projects);
        assert!(policy.can_view_project(&projects[0]));
    }

    #[test]
    fn test_task_visible_through_loaded_project() {
        let member = user("u1", Role::TeamMember);
        let projects = vec![project("p1", &["u1"])];
        let policy = AccessPolicy::new(Some(&member), &projects);
        let t = task("p1", Some("u3"), Some("u4"));
        assert!(policy.can_view_task(&t));
        assert!(policy.can_edit_task(&t));
        assert!(!policy.can_delete_task(&t));
    }

    #[test]
    fn test_task_with_unloaded_project_is_hidden() {
        let member = user("u1", Role::TeamMember);
        let projects = vec![project("p1", &["u1"])];
        let policy = AccessPolicy::new(Some(&member), &projects);
        let t = task("p9", Some("u3"), None);
        assert!(!policy.can_view_task(&t));
        assert!(!policy.can_edit_task(&t));
    }

    #[test]
    fn test_embedded_project_membership_is_not_trusted() {
        let member = user("u1", Role::TeamMember);
        let mut t = task("p9", None, None);
        t.project_id = Some(Relation::Embedded(Box::new(project("p9", &["u1"]))));
        let policy = AccessPolicy::new(Some(&member), &[]);
        assert!(!policy.can_view_task(&t));
    }

    #[test]
    fn test_assignee_and_creator_rules() {
        let member = user("u1", Role::TeamMember);
        let policy = AccessPolicy::new(Some(&member), &[]);

        let assigned = task("p9", Some("u1"), None);
        assert!(policy.can_view_task(&assigned));
        assert!(policy.can_edit_task(&assigned));

        let created = task("p9", Some("u2"), Some("u1"));
        assert!(!policy.can_view_task(&created));
        assert!(policy.can_edit_task(&created));
    }

    #[test]
    fn test_create_task_needs_member_project() {
        let member = user("u1", Role::TeamMember);
        let projects = vec![project("p1", &["u1"]), project("p2", &["u2"])];
        let policy = AccessPolicy::new(Some(&member), &projects);
        assert!(!policy.can_create_task(None));
        assert!(policy.can_create_task(Some(&projects[0])));
        assert!(!policy.can_create_task(Some(&projects[1])));
        assert!(policy.can_create_any_task());
    }

    #[test]
    fn test_no_user_denies_everything() {
        let projects = vec![project("p1", &[""])];
        let policy = AccessPolicy::new(None, &projects);
        let t = task("p1", None, None);
        assert!(!policy.can_view_project(&projects[0]));
        assert!(!policy.can_edit_project(&projects[0]));
        assert!(!policy.can_delete_project(&projects[0]));
        assert!(!policy.can_create_project());
        assert!(!policy.can_view_task(&t));
        assert!(!policy.can_edit_task(&t));
        assert!(!policy.can_delete_task(&t));
        assert!(!policy.can_create_task(Some(&projects[0])));
    }

    #[test]
    fn test_unknown_role_denies_everything() {
        let stranger = user("u1", Role::Unknown);
        let projects = vec![project("p1", &["u1"])];
        let policy = AccessPolicy::new(Some(&stranger), &projects);
        assert!(!policy.can_view_project(&projects[0]));
        assert!(!policy.can_view_task(&task("p1", Some("u1"), None)));
    }

    #[test]
    fn test_manager_follows_member_rules_unless_elevated() {
        let manager = user("m1", Role::Manager);
        let projects = vec![project("p1", &["m1"]), project("p2", &[])];

        let policy = AccessPolicy::new(Some(&manager), &projects);
        assert!(policy.can_view_project(&projects[0]));
        assert!(!policy.can_view_project(&projects[1]));
        assert!(!policy.can_delete_project(&projects[0]));

        let elevated = AccessPolicy::new(Some(&manager), &projects)
            .with_options(PolicyOptions { elevate_managers: true });
        assert!(elevated.can_view_project(&projects[1]));
        assert!(elevated.can_delete_project(&projects[1]));
    }

    #[test]
    fn test_blank_user_id_matches_nothing() {
        let ghost = user("", Role::TeamMember);
        let projects = vec![project("p1", &[""])];
        let policy = AccessPolicy::new(Some(&ghost), &projects);
        assert!(!policy.can_view_project(&projects[0]));
        assert!(!policy.can_view_task(&task("p1", None, None)));
    }

    #[test]
    fn test_absent_or_malformed_team_grants_nothing() {
        let member = user("u1", Role::TeamMember);
        let projects: Vec<Project> = vec![
            serde_json::from_value(json!({ "_id": "p1" })).unwrap(),
            serde_json::from_value(json!({ "_id": "p2", "teamMembers": "u1" })).unwrap(),
        ];
        let policy = AccessPolicy::new(Some(&member), &projects);
        for p in &projects {
            assert!(p.team_members.is_empty());
            assert!(!policy.can_view_project(p));
        }
    }

    #[test]
    fn test_membership_survives_partially_decodable_members() {
        let member = user("u1", Role::TeamMember);
        let projects: Vec<Project> = vec![serde_json::from_value(json!({
            "_id": "p1",
            "teamMembers": [{ "_id": "u1", "firstName": "Ada", "isActive": 1 }]
        }))
        .unwrap()];
        let policy = AccessPolicy::new(Some(&member), &projects);
        assert!(policy.can_view_project(&projects[0]));

        let joined: Task = serde_json::from_value(json!({
            "_id": "t9",
            "projectId": { "_id": "p1", "title": "Apollo", "status": "archived" }
        }))
        .unwrap();
        assert_eq!(extract_id(joined.project_id.as_ref()), Some("p1"));
        assert!(policy.can_view_task(&joined));
    }
}
