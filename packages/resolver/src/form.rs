//! # Create/edit payloads and their client-side validation
//!
//! Forms are validated before anything is sent: a [`ValidationError`] is shown to the
//! user and no request is made. The structs serialize to the camelCase bodies the
//! API expects for `POST`/`PUT` on `/projects` and `/tasks`.

use serde::{Deserialize, Serialize};

use crate::display::{date_input_value, parse_date};
use crate::models::{Project, ProjectPriority, ProjectStatus, Task, TaskPriority, TaskStatus};
use crate::relation::{extract_id, extract_ids};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Deadline is required")]
    MissingDeadline,
    #[error("Due date is required")]
    MissingDueDate,
    #[error("Project is required")]
    MissingProject,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Hours must be a positive number: {0}")]
    InvalidHours(String),
    #[error("Comment cannot be empty")]
    EmptyComment,
}

/// Split comma-separated tag input, trimming and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Blank input is `None`; anything else must be a number greater than zero.
pub fn parse_hours(input: &str) -> Result<Option<f64>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours > 0.0 => Ok(Some(hours)),
        _ => Err(ValidationError::InvalidHours(input.to_string())),
    }
}

fn require_date(value: &str, missing: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(missing);
    }
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::InvalidDate(value.to_string()))
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub priority: ProjectPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    pub team_members: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    pub tags: Vec<String>,
}

impl ProjectForm {
    /// Prefill an edit form. The manager is not part of an edit.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            deadline: date_input_value(&project.deadline),
            priority: project.priority,
            status: Some(project.status),
            manager_id: None,
            team_members: extract_ids(&project.team_members).map(str::to_string).collect(),
            budget: project.budget,
            estimated_hours: project.estimated_hours,
            tags: project.tags.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        require_date(&self.deadline, ValidationError::MissingDeadline)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub due_date: String,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
}

impl TaskForm {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            project_id: extract_id(task.project_id.as_ref())
                .unwrap_or_default()
                .to_string(),
            assigned_to: extract_id(task.assigned_to.as_ref()).map(str::to_string),
            due_date: date_input_value(&task.due_date),
            priority: task.priority,
            status: Some(task.status),
            estimated_hours: task.estimated_hours,
            tags: task.tags.clone(),
            dependencies: extract_ids(&task.dependencies).map(str::to_string).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        require_date(&self.due_date, ValidationError::MissingDueDate)?;
        if self.project_id.trim().is_empty() {
            return Err(ValidationError::MissingProject);
        }
        Ok(())
    }
}

/// Body of a partial task update, e.g. a status change from the board.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

pub fn validate_comment(comment: &str) -> Result<String, ValidationError> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(comment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;
    use serde_json::json;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" web, ,api ,"), vec!["web", "api"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours(""), Ok(None));
        assert_eq!(parse_hours(" 12.5 "), Ok(Some(12.5)));
        assert!(matches!(parse_hours("-1"), Err(ValidationError::InvalidHours(_))));
        assert!(matches!(parse_hours("0"), Err(ValidationError::InvalidHours(_))));
        assert_eq!(parse_hours("0.25"), Ok(Some(0.25)));
        assert!(matches!(parse_hours("lots"), Err(ValidationError::InvalidHours(_))));
    }

    #[test]
    fn test_project_form_requires_title_and_deadline() {
        let mut form = ProjectForm {
            title: "  ".into(),
            deadline: "2025-01-05".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingTitle));

        form.title = "Apollo".into();
        form.deadline = String::new();
        assert_eq!(form.validate(), Err(ValidationError::MissingDeadline));

        form.deadline = "next week".into();
        assert!(matches!(form.validate(), Err(ValidationError::InvalidDate(_))));

        form.deadline = "2025-01-05".into();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_project_form_errors_name_the_field() {
        let form = ProjectForm {
            title: "Apollo".into(),
            deadline: "soon".into(),
            ..Default::default()
        };
        let message = form.validate().unwrap_err().to_string();
        assert_eq!(message, "Invalid date: soon");

        let form = ProjectForm {
            title: "Apollo".into(),
            ..Default::default()
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Deadline is required");
    }

    #[test]
    fn test_task_form_requires_project() {
        let form = TaskForm {
            title: "Fix bug".into(),
            due_date: "2025-01-05".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingProject));
        assert_eq!(ValidationError::MissingProject.to_string(), "Project is required");
    }

    #[test]
    fn test_task_form_serializes_camel_case() {
        let form = TaskForm {
            title: "Fix bug".into(),
            project_id: "p1".into(),
            due_date: "2025-01-05".into(),
            status: Some(TaskStatus::Todo),
            ..Default::default()
        };
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["projectId"], json!("p1"));
        assert_eq!(body["dueDate"], json!("2025-01-05"));
        assert_eq!(body["status"], json!("todo"));
        assert!(body.get("assignedTo").is_none());
    }

    #[test]
    fn test_task_form_prefill_flattens_relations() {
        let task = Task {
            title: "Fix bug".into(),
            project_id: Some(Relation::Embedded(Box::new(Project {
                id: "p1".into(),
                ..Default::default()
            }))),
            assigned_to: Some("u2".into()),
            due_date: "2025-01-05T00:00:00.000Z".into(),
            dependencies: vec!["t0".into()],
            ..Default::default()
        };
        let form = TaskForm::from_task(&task);
        assert_eq!(form.project_id, "p1");
        assert_eq!(form.assigned_to.as_deref(), Some("u2"));
        assert_eq!(form.due_date, "2025-01-05");
        assert_eq!(form.dependencies, vec!["t0"]);
    }

    #[test]
    fn test_status_patch_body() {
        let body = serde_json::to_value(TaskPatch::status(TaskStatus::Blocked)).unwrap();
        assert_eq!(body, json!({ "status": "blocked" }));
    }

    #[test]
    fn test_validate_comment() {
        assert_eq!(validate_comment("  looks good "), Ok("looks good".to_string()));
        assert_eq!(validate_comment("   "), Err(ValidationError::EmptyComment));
    }
}
