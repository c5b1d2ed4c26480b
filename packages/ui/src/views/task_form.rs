use std::str::FromStr;

use dioxus::prelude::*;
use resolver::display::enum_to_display_text;
use resolver::form::{parse_hours, parse_tags, TaskForm};
use resolver::{Project, Task, TaskPriority, TaskStatus, User};

use super::ModalOverlay;
use crate::notifications::{notify, use_notifications, Level};
use crate::{report_error, use_api, use_auth};

/// Create a task, or edit `existing` when given.
///
/// `projects` lists the projects the user may file the task under; the caller
/// filters it through the access policy.
#[component]
pub fn TaskFormModal(
    existing: Option<Task>,
    projects: Vec<Project>,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let mut auth = use_auth();
    let api = use_api();
    let mut notifications = use_notifications();

    let is_edit = existing.is_some();
    let edit_id = existing.as_ref().map(|t| t.id.clone());
    let initial = existing.as_ref().map(TaskForm::from_task).unwrap_or_default();

    let mut title = use_signal(|| initial.title.clone());
    let mut description = use_signal(|| initial.description.clone());
    let mut project_id = use_signal(|| initial.project_id.clone());
    let mut assigned_to = use_signal(|| initial.assigned_to.clone().unwrap_or_default());
    let mut due_date = use_signal(|| initial.due_date.clone());
    let mut priority = use_signal(|| initial.priority);
    let mut status = use_signal(|| initial.status.unwrap_or_default());
    let mut hours = use_signal(|| initial.estimated_hours.map(|h| h.to_string()).unwrap_or_default());
    let mut tags = use_signal(|| initial.tags.join(", "));
    let dependencies = use_signal(|| initial.dependencies.clone());
    let mut submitting = use_signal(|| false);
    let mut users = use_signal(Vec::<User>::new);

    let client = api.client.clone();
    let _users_loader = use_resource(move || {
        let client = client.clone();
        async move {
            let Some(client) = client else { return };
            match client.users().await {
                Ok(list) => users.set(list),
                // Members may not be allowed to list users; the task can still be left unassigned.
                Err(e) if !e.requires_login() => tracing::warn!("Could not load assignees: {e}"),
                Err(e) => report_error(&e, "Failed to load users", &mut notifications, &mut auth),
            }
        }
    });

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let Some(client) = api.client.clone() else { return };

        let estimated_hours = match parse_hours(&hours()) {
            Ok(h) => h,
            Err(e) => return notify(&mut notifications, Level::Error, e.to_string()),
        };
        let form = TaskForm {
            title: title().trim().to_string(),
            description: description(),
            project_id: project_id(),
            assigned_to: Some(assigned_to()).filter(|id| !id.is_empty()),
            due_date: due_date(),
            priority: priority(),
            status: Some(status()),
            estimated_hours,
            tags: parse_tags(&tags()),
            dependencies: dependencies(),
        };
        if let Err(e) = form.validate() {
            return notify(&mut notifications, Level::Error, e.to_string());
        }

        let edit_id = edit_id.clone();
        submitting.set(true);
        spawn(async move {
            let result = match &edit_id {
                Some(id) => client.update_task(id, &form).await,
                None => client.create_task(&form).await,
            };
            submitting.set(false);
            match result {
                Ok(_) => {
                    let verb = if edit_id.is_some() { "updated" } else { "created" };
                    notify(&mut notifications, Level::Success, format!("Task {verb} successfully"));
                    on_saved.call(());
                }
                Err(e) => report_error(&e, "Failed to save task", &mut notifications, &mut auth),
            }
        });
    };

    let user_list = users();
    let heading = if is_edit { "Edit Task" } else { "Create New Task" };

    rsx! {
        ModalOverlay {
            title: heading.to_string(),
            on_close: move |_| on_close.call(()),
            form {
                class: "form",
                onsubmit: handle_submit,
                label { "Task Title *" }
                input {
                    r#type: "text",
                    placeholder: "Enter task title...",
                    value: title(),
                    oninput: move |evt| title.set(evt.value()),
                }
                label { "Description" }
                textarea {
                    rows: 4,
                    placeholder: "Describe the task...",
                    value: description(),
                    oninput: move |evt| description.set(evt.value()),
                }
                div {
                    class: "form-row",
                    div {
                        label { "Project *" }
                        select {
                            disabled: is_edit,
                            onchange: move |evt| project_id.set(evt.value()),
                            option { value: "", selected: project_id().is_empty(), "Select a project" }
                            for project in projects.iter() {
                                option {
                                    key: "{project.id}",
                                    value: "{project.id}",
                                    selected: project.id == project_id(),
                                    "{project.title}"
                                }
                            }
                        }
                    }
                    div {
                        label { "Assign To" }
                        select {
                            onchange: move |evt| assigned_to.set(evt.value()),
                            option { value: "", selected: assigned_to().is_empty(), "Unassigned" }
                            for user in user_list.iter() {
                                option {
                                    key: "{user.id}",
                                    value: "{user.id}",
                                    selected: user.id == assigned_to(),
                                    "{user.display_name()}"
                                }
                            }
                        }
                    }
                }
                div {
                    class: "form-row",
                    div {
                        label { "Due Date *" }
                        input {
                            r#type: "date",
                            value: due_date(),
                            oninput: move |evt| due_date.set(evt.value()),
                        }
                    }
                    div {
                        label { "Estimated Hours" }
                        input {
                            r#type: "number",
                            min: "0",
                            step: "0.5",
                            value: hours(),
                            oninput: move |evt| hours.set(evt.value()),
                        }
                    }
                }
                div {
                    class: "form-row",
                    div {
                        label { "Priority" }
                        select {
                            onchange: move |evt| {
                                if let Ok(p) = TaskPriority::from_str(&evt.value()) {
                                    priority.set(p);
                                }
                            },
                            for p in TaskPriority::ALL {
                                option { value: p.as_str(), selected: p == priority(), "{enum_to_display_text(p.as_str())}" }
                            }
                        }
                    }
                    div {
                        label { "Status" }
                        select {
                            onchange: move |evt| {
                                if let Ok(s) = TaskStatus::from_str(&evt.value()) {
                                    status.set(s);
                                }
                            },
                            for s in TaskStatus::ALL {
                                option { value: s.as_str(), selected: s == status(), "{enum_to_display_text(s.as_str())}" }
                            }
                        }
                    }
                }
                label { "Tags" }
                input {
                    r#type: "text",
                    placeholder: "Enter tags separated by commas...",
                    value: tags(),
                    oninput: move |evt| tags.set(evt.value()),
                }
                div {
                    class: "form-actions",
                    button {
                        r#type: "button",
                        class: "button button--outline",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        r#type: "submit",
                        class: "button button--primary",
                        disabled: submitting(),
                        if submitting() { "Saving..." } else if is_edit { "Save Changes" } else { "Create Task" }
                    }
                }
            }
        }
    }
}
