//! # Domain models for users, projects and tasks
//!
//! These are the client-side shapes of the entities served by the remote API. The
//! client never persists them; every page load fetches them fresh and replaces the
//! previous list wholesale.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | An authenticated account. Its [`Role`] drives every access decision in [`crate::policy`]. |
//! | [`Project`] | A project with a manager and a team. Both are [`Relation`]s to [`User`]. |
//! | [`Task`] | A unit of work inside a project, optionally assigned, with comments and dependencies. |
//! | [`TaskComment`] | A single comment on a task. |
//!
//! ## Decoding
//!
//! All structs decode leniently: missing fields take their defaults, `null` strings
//! become empty, list fields that are not arrays become empty, and relation fields
//! that hold something other than an id or an object become absent. Only the
//! enumerations are strict, so an entity with an unknown status is rejected as a
//! whole (and dropped by [`crate::envelope::decode_collection`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::de::{lenient_option, lenient_vec, null_as_default};
use crate::relation::Relation;

/// Error returned when a string does not name a known enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Authorization class of a user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    TeamMember,
    /// Any role string this client does not know. Grants nothing.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::TeamMember => "team_member",
            Role::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl ProjectPriority {
    pub const ALL: [ProjectPriority; 4] = [
        ProjectPriority::Low,
        ProjectPriority::Medium,
        ProjectPriority::High,
        ProjectPriority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPriority::Low => "low",
            ProjectPriority::Medium => "medium",
            ProjectPriority::High => "high",
            ProjectPriority::Critical => "critical",
        }
    }
}

impl FromStr for ProjectPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "project priority",
                value: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Testing,
    Completed,
    OnHold,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 6] = [
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::Testing,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Testing => "testing",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "project status",
                value: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "task priority",
                value: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Testing,
    Completed,
    Blocked,
}

impl TaskStatus {
    /// Board order, left to right.
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Testing,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Testing => "testing",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "task status",
                value: s.to_string(),
            })
    }
}

/// An account as returned by `/auth/profile`, `/auth/login` and `/users`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    /// "First Last", or `None` when both name fields are blank.
    pub fn full_name(&self) -> Option<String> {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Full name, falling back to the email address.
    pub fn display_name(&self) -> String {
        self.full_name().unwrap_or_else(|| self.email.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub deadline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: ProjectPriority,
    #[serde(deserialize_with = "null_as_default")]
    pub status: ProjectStatus,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<Relation<User>>,
    #[serde(deserialize_with = "lenient_vec")]
    pub team_members: Vec<Relation<User>>,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(deserialize_with = "lenient_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskComment {
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Relation<User>>,
    #[serde(deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Relation<Project>>,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Relation<User>>,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Relation<User>>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: TaskPriority,
    #[serde(deserialize_with = "null_as_default")]
    pub due_date: String,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(deserialize_with = "lenient_option", skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(deserialize_with = "lenient_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub attachments: Vec<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub dependencies: Vec<Relation<Task>>,
    #[serde(deserialize_with = "lenient_vec")]
    pub comments: Vec<TaskComment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_decodes_known_and_unknown_values() {
        let roles: Vec<Role> =
            serde_json::from_value(json!(["admin", "manager", "team_member", "auditor"])).unwrap();
        assert_eq!(
            roles,
            vec![Role::Admin, Role::Manager, Role::TeamMember, Role::Unknown]
        );
    }

    #[test]
    fn test_user_without_role_is_unknown() {
        let user: User = serde_json::from_value(json!({ "_id": "u1" })).unwrap();
        assert_eq!(user.role, Role::Unknown);
    }

    #[test]
    fn test_enum_round_trip_through_strings() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert!("done".parse::<TaskStatus>().is_err());
        assert_eq!("on_hold".parse::<ProjectStatus>(), Ok(ProjectStatus::OnHold));
        assert_eq!("urgent".parse::<TaskPriority>(), Ok(TaskPriority::Urgent));
        assert_eq!(
            "critical".parse::<ProjectPriority>(),
            Ok(ProjectPriority::Critical)
        );
    }

    #[test]
    fn test_project_with_mixed_team_members() {
        let project: Project = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Apollo",
            "description": null,
            "status": "in_progress",
            "priority": "high",
            "managerId": { "_id": "u9", "firstName": "Ada", "lastName": "Lovelace" },
            "teamMembers": ["u1", { "_id": "u2", "email": "b@example.com" }, 42],
        }))
        .unwrap();

        assert_eq!(project.description, "");
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.team_members.len(), 2);
        assert!(matches!(project.manager_id, Some(Relation::Embedded(_))));
    }

    #[test]
    fn test_task_relations_and_comments() {
        let task: Task = serde_json::from_value(json!({
            "_id": "t1",
            "title": "Fix bug",
            "projectId": { "_id": "p1", "title": "Apollo" },
            "assignedTo": "u3",
            "createdBy": null,
            "status": "review",
            "dependencies": ["t0"],
            "comments": [{ "userId": "u3", "comment": "on it" }],
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Review);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.created_by.is_none());
        assert_eq!(task.assigned_to, Some(Relation::Reference("u3".into())));
        assert_eq!(task.dependencies.len(), 1);
        assert_eq!(task.comments[0].comment, "on it");
    }

    #[test]
    fn test_unknown_task_status_rejects_entity() {
        let result = serde_json::from_value::<Task>(json!({ "_id": "t1", "status": "archived" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_user_display_name_falls_back_to_email() {
        let user = User {
            email: "sam@example.com".into(),
            ..Default::default()
        };
        assert_eq!(user.full_name(), None);
        assert_eq!(user.display_name(), "sam@example.com");

        let named = User {
            first_name: "Sam".into(),
            last_name: "Lee".into(),
            ..user
        };
        assert_eq!(named.display_name(), "Sam Lee");
    }
}
