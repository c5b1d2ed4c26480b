use api::Dashboard;
use dioxus::prelude::*;
use resolver::display::{completion_percentage, enum_to_display_text, format_date, today, truncate_text};
use resolver::relation::extract_label;
use resolver::{task_stats, visible_projects, visible_tasks, ProjectFilter, TaskFilter};

use crate::badges::{project_status_class, task_status_class, Badge};
use crate::notifications::{notify, use_notifications, Level};
use crate::{policy_for, use_api, use_auth, AuthState};

const RECENT_COUNT: usize = 5;

/// Overview of the signed-in user's projects and tasks.
#[component]
pub fn DashboardView(on_open_task: EventHandler<String>) -> Element {
    let mut auth = use_auth();
    let api = use_api();
    let mut notifications = use_notifications();
    let mut dashboard = use_signal(|| Option::<Dashboard>::None);

    let client = api.client.clone();
    let _loader = use_resource(move || {
        let client = client.clone();
        async move {
            let Some(client) = client else {
                dashboard.set(Some(Dashboard::default()));
                return;
            };
            let loaded = client.load_dashboard().await;
            for notice in &loaded.notices {
                notify(&mut notifications, Level::Error, notice.clone());
            }
            if loaded.signed_out {
                auth.set(AuthState::signed_in(None));
            }
            dashboard.set(Some(loaded));
        }
    });

    let state = auth();
    let Some(user) = state.user.clone() else {
        return rsx! {};
    };
    let Some(data) = dashboard() else {
        return rsx! {
            div { class: "page-center", div { class: "spinner" } }
        };
    };

    let policy = policy_for(&state, &data.projects, api.policy);
    let projects = visible_projects(&policy, &data.projects, &ProjectFilter::default());
    let tasks = visible_tasks(&policy, &data.tasks, &TaskFilter::default());
    let stats = task_stats(&tasks, today());
    let completion = completion_percentage(stats.completed, stats.total);
    let greeting = if user.is_admin() {
        "Manage your organization."
    } else {
        "View your assigned work."
    };

    rsx! {
        div {
            class: "page",
            header {
                class: "page-header",
                h1 { "Dashboard" }
                span { class: "role-pill", "{enum_to_display_text(user.role.as_str())}" }
            }
            p { class: "welcome", "Welcome back, {user.first_name}! {greeting}" }

            if let Some(analytics) = &data.analytics {
                section {
                    class: "stat-grid",
                    StatCard { label: "Projects", value: analytics.overview.total_projects.to_string() }
                    StatCard { label: "Tasks", value: analytics.overview.total_tasks.to_string() }
                    StatCard { label: "Completed", value: analytics.overview.completed_tasks.to_string() }
                    StatCard { label: "Overdue", value: analytics.overview.overdue_tasks.to_string() }
                }
            }

            section {
                class: "stat-grid",
                StatCard { label: "My visible tasks", value: stats.total.to_string() }
                StatCard { label: "In progress", value: stats.in_progress.to_string() }
                StatCard { label: "Overdue", value: stats.overdue.to_string() }
                StatCard { label: "Completion", value: format!("{completion}%") }
            }

            div {
                class: "two-columns",
                section {
                    class: "panel",
                    h2 { "Recent projects" }
                    if projects.is_empty() {
                        p { class: "empty", "No projects to show" }
                    }
                    for project in projects.iter().take(RECENT_COUNT) {
                        div {
                            key: "{project.id}",
                            class: "list-row",
                            div {
                                strong { "{project.title}" }
                                p { class: "muted", "{truncate_text(&project.description, 80)}" }
                                p { class: "muted", "Manager: {extract_label(project.manager_id.as_ref())}" }
                            }
                            div {
                                class: "row-meta",
                                Badge { class: project_status_class(project.status), value: project.status.as_str() }
                                span { class: "muted", "{format_date(&project.deadline)}" }
                            }
                        }
                    }
                }
                section {
                    class: "panel",
                    h2 { "Recent tasks" }
                    if tasks.is_empty() {
                        p { class: "empty", "No tasks to show" }
                    }
                    for task in tasks.iter().take(RECENT_COUNT) {
                        div {
                            key: "{task.id}",
                            class: "list-row clickable",
                            onclick: {
                                let id = task.id.clone();
                                move |_| on_open_task.call(id.clone())
                            },
                            div {
                                strong { "{task.title}" }
                                p { class: "muted", "{extract_label(task.project_id.as_ref())}" }
                                p { class: "muted", "{extract_label(task.assigned_to.as_ref())}" }
                            }
                            div {
                                class: "row-meta",
                                Badge { class: task_status_class(task.status), value: task.status.as_str() }
                                span { class: "muted", "{format_date(&task.due_date)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StatCard(label: &'static str, value: String) -> Element {
    rsx! {
        div {
            class: "stat-card",
            span { class: "stat-label", "{label}" }
            span { class: "stat-value", "{value}" }
        }
    }
}
