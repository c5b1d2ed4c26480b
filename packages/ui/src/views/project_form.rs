use std::str::FromStr;

use dioxus::prelude::*;
use resolver::form::{parse_hours, parse_tags, ProjectForm};
use resolver::{team_candidates, Project, ProjectPriority, ProjectStatus, User};

use super::ModalOverlay;
use crate::notifications::{notify, use_notifications, Level};
use crate::{report_error, use_api, use_auth};

/// Create a project, or edit `existing` when given.
#[component]
pub fn ProjectFormModal(
    existing: Option<Project>,
    on_close: EventHandler<()>,
    /// Called after a successful save; the caller reloads its list.
    on_saved: EventHandler<()>,
) -> Element {
    let mut auth = use_auth();
    let api = use_api();
    let mut notifications = use_notifications();

    let is_edit = existing.is_some();
    let edit_id = existing.as_ref().map(|p| p.id.clone());
    let initial = existing.as_ref().map(ProjectForm::from_project).unwrap_or_default();

    let mut title = use_signal(|| initial.title.clone());
    let mut description = use_signal(|| initial.description.clone());
    let mut deadline = use_signal(|| initial.deadline.clone());
    let mut priority = use_signal(|| initial.priority);
    let mut status = use_signal(|| initial.status.unwrap_or_default());
    let mut team = use_signal(|| initial.team_members.clone());
    let mut hours = use_signal(|| initial.estimated_hours.map(|h| h.to_string()).unwrap_or_default());
    let mut budget = use_signal(|| initial.budget.map(|b| b.to_string()).unwrap_or_default());
    let mut tags = use_signal(|| initial.tags.join(", "));
    let mut submitting = use_signal(|| false);
    let mut users = use_signal(Vec::<User>::new);

    let client = api.client.clone();
    let _users_loader = use_resource(move || {
        let client = client.clone();
        async move {
            let Some(client) = client else { return };
            match client.users().await {
                Ok(list) => users.set(list),
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
        let budget = match parse_hours(&budget()) {
            Ok(b) => b,
            Err(_) => return notify(&mut notifications, Level::Error, "Budget must be a positive number"),
        };
        let form = ProjectForm {
            title: title().trim().to_string(),
            description: description(),
            deadline: deadline(),
            priority: priority(),
            status: Some(status()),
            manager_id: if is_edit {
                None
            } else {
                auth().user.as_ref().map(|u| u.id.clone())
            },
            team_members: team(),
            budget,
            estimated_hours,
            tags: parse_tags(&tags()),
        };
        if let Err(e) = form.validate() {
            return notify(&mut notifications, Level::Error, e.to_string());
        }

        let edit_id = edit_id.clone();
        submitting.set(true);
        spawn(async move {
            let result = match &edit_id {
                Some(id) => client.update_project(id, &form).await,
                None => client.create_project(&form).await,
            };
            submitting.set(false);
            match result {
                Ok(_) => {
                    let verb = if edit_id.is_some() { "updated" } else { "created" };
                    notify(&mut notifications, Level::Success, format!("Project {verb} successfully"));
                    on_saved.call(());
                }
                Err(e) => report_error(&e, "Failed to save project", &mut notifications, &mut auth),
            }
        });
    };

    let all_users = users();
    let candidates = team_candidates(&all_users);
    let heading = if is_edit { "Edit Project" } else { "Create New Project" };

    rsx! {
        ModalOverlay {
            title: heading.to_string(),
            on_close: move |_| on_close.call(()),
            form {
                class: "form",
                onsubmit: handle_submit,
                label { "Project Title *" }
                input {
                    r#type: "text",
                    placeholder: "Enter project title...",
                    value: title(),
                    oninput: move |evt| title.set(evt.value()),
                }
                label { "Description" }
                textarea {
                    rows: 4,
                    placeholder: "Describe the project in detail...",
                    value: description(),
                    oninput: move |evt| description.set(evt.value()),
                }
                div {
                    class: "form-row",
                    div {
                        label { "Deadline *" }
                        input {
                            r#type: "date",
                            value: deadline(),
                            oninput: move |evt| deadline.set(evt.value()),
                        }
                    }
                    div {
                        label { "Priority" }
                        select {
                            value: priority().as_str(),
                            onchange: move |evt| {
                                if let Ok(p) = ProjectPriority::from_str(&evt.value()) {
                                    priority.set(p);
                                }
                            },
                            for p in ProjectPriority::ALL {
                                option { value: p.as_str(), selected: p == priority(), "{resolver::display::enum_to_display_text(p.as_str())}" }
                            }
                        }
                    }
                }
                div {
                    class: "form-row",
                    div {
                        label { if is_edit { "Status" } else { "Initial Status" } }
                        select {
                            value: status().as_str(),
                            onchange: move |evt| {
                                if let Ok(s) = ProjectStatus::from_str(&evt.value()) {
                                    status.set(s);
                                }
                            },
                            for s in ProjectStatus::ALL {
                                option { value: s.as_str(), selected: s == status(), "{resolver::display::enum_to_display_text(s.as_str())}" }
                            }
                        }
                    }
                    div {
                        label { "Tags" }
                        input {
                            r#type: "text",
                            placeholder: "Enter tags separated by commas...",
                            value: tags(),
                            oninput: move |evt| tags.set(evt.value()),
                        }
                    }
                }
                div {
                    class: "form-row",
                    div {
                        label { "Estimated Hours" }
                        input {
                            r#type: "number",
                            min: "0",
                            value: hours(),
                            oninput: move |evt| hours.set(evt.value()),
                        }
                    }
                    div {
                        label { "Budget" }
                        input {
                            r#type: "number",
                            min: "0",
                            value: budget(),
                            oninput: move |evt| budget.set(evt.value()),
                        }
                    }
                }
                label { "Assign Team Members" }
                div {
                    class: "checkbox-list",
                    for candidate in candidates.clone() {
                        label {
                            key: "{candidate.id}",
                            class: "checkbox-row",
                            input {
                                r#type: "checkbox",
                                checked: team().contains(&candidate.id),
                                onchange: {
                                    let id = candidate.id.clone();
                                    move |evt: FormEvent| {
                                        let mut selected = team();
                                        selected.retain(|m| m != &id);
                                        if evt.checked() {
                                            selected.push(id.clone());
                                        }
                                        team.set(selected);
                                    }
                                },
                            }
                            span { "{candidate.display_name()}" }
                        }
                    }
                    if candidates.is_empty() {
                        p { class: "muted", "No team members available" }
                    }
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
                        if submitting() { "Saving..." } else if is_edit { "Save Changes" } else { "Create Project" }
                    }
                }
            }
        }
    }
}
