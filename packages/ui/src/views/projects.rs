use std::str::FromStr;

use api::{Generation, HttpClient};
use dioxus::prelude::*;
use resolver::display::{enum_to_display_text, format_date, truncate_text};
use resolver::relation::extract_label;
use resolver::{visible_projects, Page, Project, ProjectFilter, ProjectPriority, ProjectQuery, ProjectStatus};

use super::ProjectFormModal;
use crate::badges::{project_priority_class, project_status_class, Badge};
use crate::icons::{FaMagnifyingGlass, FaPen, FaPlus, FaTrash};
use crate::notifications::{notify, use_notifications, Level, Notifications};
use crate::{policy_for, report_error, use_api, use_auth, AuthState, Icon};

#[derive(Clone, PartialEq)]
enum Editing {
    Closed,
    New,
    Existing(Project),
}

/// Project list with search, status and priority filters.
#[component]
pub fn ProjectsView() -> Element {
    let mut auth = use_auth();
    let api = use_api();
    let mut notifications = use_notifications();

    let mut filter = use_signal(ProjectFilter::default);
    let mut projects = use_signal(Vec::<Project>::new);
    let mut loading = use_signal(|| true);
    let mut reload = use_signal(|| 0u32);
    let mut editing = use_signal(|| Editing::Closed);
    let generation = use_hook(Generation::new);

    let client = api.client.clone();
    let _loader = use_resource(move || {
        let client = client.clone();
        let generation = generation.clone();
        let current = filter();
        let _ = reload();
        async move {
            let Some(client) = client else {
                loading.set(false);
                return;
            };
            let ticket = generation.begin();
            let query = ProjectQuery {
                status: current.status,
                priority: current.priority,
                search: Some(current.search.trim().to_string()).filter(|s| !s.is_empty()),
                page: Page::limit(100),
                ..Default::default()
            };
            let result = client.projects(&query).await;
            let Some(result) = generation.accept(ticket, result) else {
                return;
            };
            match result {
                Ok(listing) => projects.set(listing.items),
                Err(e) => {
                    projects.set(Vec::new());
                    report_error(&e, "Failed to load projects", &mut notifications, &mut auth);
                }
            }
            loading.set(false);
        }
    });

    let state = auth();
    let all = projects();
    let current = filter();
    let policy = policy_for(&state, &all, api.policy);
    let shown = visible_projects(&policy, &all, &current);
    let active_filters = current.active_count();

    rsx! {
        div {
            class: "page",
            header {
                class: "page-header",
                div {
                    h1 { "Projects" }
                    p { class: "muted", "{shown.len()} project(s)" }
                }
                if policy.can_create_project() {
                    button {
                        class: "button button--primary",
                        onclick: move |_| editing.set(Editing::New),
                        Icon { icon: FaPlus, width: 14, height: 14 }
                        "New Project"
                    }
                }
            }

            section {
                class: "filters",
                div {
                    class: "input-with-icon",
                    Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
                    input {
                        r#type: "search",
                        placeholder: "Search projects...",
                        value: current.search.clone(),
                        oninput: move |evt| filter.write().search = evt.value(),
                    }
                }
                select {
                    onchange: move |evt| filter.write().status = ProjectStatus::from_str(&evt.value()).ok(),
                    option { value: "", selected: current.status.is_none(), "All statuses" }
                    for s in ProjectStatus::ALL {
                        option { value: s.as_str(), selected: current.status == Some(s), "{enum_to_display_text(s.as_str())}" }
                    }
                }
                select {
                    onchange: move |evt| filter.write().priority = ProjectPriority::from_str(&evt.value()).ok(),
                    option { value: "", selected: current.priority.is_none(), "All priorities" }
                    for p in ProjectPriority::ALL {
                        option { value: p.as_str(), selected: current.priority == Some(p), "{enum_to_display_text(p.as_str())}" }
                    }
                }
                if active_filters > 0 {
                    button {
                        class: "button button--ghost",
                        onclick: move |_| filter.write().clear(),
                        "Clear filters ({active_filters})"
                    }
                }
            }

            if loading() {
                div { class: "page-center", div { class: "spinner" } }
            } else if shown.is_empty() {
                div {
                    class: "empty",
                    h3 { "No projects found" }
                    if active_filters > 0 {
                        p { "Try adjusting your filters." }
                    }
                }
            } else {
                div {
                    class: "card-grid",
                    for project in shown {
                        div {
                            key: "{project.id}",
                            class: "card",
                            div {
                                class: "card-header",
                                h3 { "{project.title}" }
                                div {
                                    class: "card-actions",
                                    if policy.can_edit_project(project) {
                                        button {
                                            class: "icon-button",
                                            title: "Edit",
                                            onclick: {
                                                let project = project.clone();
                                                move |_| editing.set(Editing::Existing(project.clone()))
                                            },
                                            Icon { icon: FaPen, width: 14, height: 14 }
                                        }
                                    }
                                    if policy.can_delete_project(project) {
                                        button {
                                            class: "icon-button icon-button--danger",
                                            title: "Delete",
                                            onclick: {
                                                let client = api.client.clone();
                                                let project = project.clone();
                                                move |_| delete_project(client.clone(), project.clone(), notifications, auth, reload)
                                            },
                                            Icon { icon: FaTrash, width: 14, height: 14 }
                                        }
                                    }
                                }
                            }
                            p { class: "muted", "{truncate_text(&project.description, 120)}" }
                            div {
                                class: "badge-row",
                                Badge { class: project_status_class(project.status), value: project.status.as_str() }
                                Badge { class: project_priority_class(project.priority), value: project.priority.as_str() }
                            }
                            div {
                                class: "card-footer",
                                span { "Manager: {extract_label(project.manager_id.as_ref())}" }
                                span { "{project.team_members.len()} member(s)" }
                                span { "Due {format_date(&project.deadline)}" }
                            }
                            if !project.tags.is_empty() {
                                div {
                                    class: "tag-row",
                                    for tag in project.tags.iter() {
                                        span { class: "tag", "{tag}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            {match editing() {
                Editing::Closed => rsx! {},
                Editing::New => rsx! {
                    ProjectFormModal {
                        on_close: move |_| editing.set(Editing::Closed),
                        on_saved: move |_| {
                            editing.set(Editing::Closed);
                            reload += 1;
                        },
                    }
                },
                Editing::Existing(project) => rsx! {
                    ProjectFormModal {
                        existing: project,
                        on_close: move |_| editing.set(Editing::Closed),
                        on_saved: move |_| {
                            editing.set(Editing::Closed);
                            reload += 1;
                        },
                    }
                },
            }}
        }
    }
}

fn delete_project(
    client: Option<HttpClient>,
    project: Project,
    mut notifications: Signal<Notifications>,
    mut auth: Signal<AuthState>,
    mut reload: Signal<u32>,
) {
    let Some(client) = client else { return };
    if !confirm(&format!("Delete \"{}\"? This cannot be undone.", project.title)) {
        return;
    }
    spawn(async move {
        match client.delete_project(&project.id).await {
            Ok(()) => {
                notify(&mut notifications, Level::Success, "Project deleted successfully");
                reload += 1;
            }
            Err(e) => report_error(&e, "Failed to delete project", &mut notifications, &mut auth),
        }
    });
}

/// Ask the browser for confirmation. Without a window there is nobody to ask.
pub(crate) fn confirm(message: &str) -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::debug!("Auto-confirming: {message}");
        true
    }
}
