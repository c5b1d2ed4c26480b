use std::str::FromStr;

use api::{Generation, HttpClient};
use dioxus::prelude::*;
use resolver::board::is_overdue;
use resolver::display::{completion_percentage, enum_to_display_text, format_date, today, truncate_text};
use resolver::relation::{extract_label, extract_label_or};
use resolver::{
    kanban_columns, task_stats, visible_tasks, Page, Project, ProjectQuery, Task, TaskFilter,
    TaskPriority, TaskQuery, TaskStatus,
};

use super::projects::confirm;
use super::TaskFormModal;
use crate::badges::{task_priority_class, task_status_class, Badge};
use crate::icons::{FaList, FaMagnifyingGlass, FaPen, FaPlus, FaTableColumns, FaTrash};
use crate::notifications::{notify, use_notifications, Level, Notifications};
use crate::{policy_for, report_error, use_api, use_auth, AuthState, Icon};

const LIST_LIMIT: u32 = 100;

#[derive(Clone, Copy, PartialEq)]
enum Layout {
    List,
    Board,
}

#[derive(Clone, PartialEq)]
enum Editing {
    Closed,
    New,
    Existing(Task),
}

/// Signals a task row writes to when its controls are used.
#[derive(Clone, Copy, PartialEq)]
struct TaskActions {
    notifications: Signal<Notifications>,
    auth: Signal<AuthState>,
    reload: Signal<u32>,
    editing: Signal<Editing>,
}

/// Task list with filters, a kanban board and inline status changes.
#[component]
pub fn TasksView(on_open_task: EventHandler<String>) -> Element {
    let mut auth = use_auth();
    let api = use_api();
    let mut notifications = use_notifications();

    let mut filter = use_signal(TaskFilter::default);
    let mut tasks = use_signal(Vec::<Task>::new);
    let mut projects = use_signal(Vec::<Project>::new);
    let mut loading = use_signal(|| true);
    let reload = use_signal(|| 0u32);
    let mut editing = use_signal(|| Editing::Closed);
    let mut layout = use_signal(|| Layout::List);
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
            let task_query = TaskQuery {
                status: current.status,
                priority: current.priority,
                project_id: current.project_id.clone(),
                search: Some(current.search.trim().to_string()).filter(|s| !s.is_empty()),
                page: Page::limit(LIST_LIMIT),
                ..Default::default()
            };
            let project_query = ProjectQuery {
                page: Page::limit(LIST_LIMIT),
                ..Default::default()
            };
            let (task_result, project_result) =
                futures::join!(client.tasks(&task_query), client.projects(&project_query));
            let Some((task_result, project_result)) =
                generation.accept(ticket, (task_result, project_result))
            else {
                return;
            };
            match project_result {
                Ok(listing) => projects.set(listing.items),
                Err(e) => {
                    projects.set(Vec::new());
                    report_error(&e, "Failed to load projects", &mut notifications, &mut auth);
                }
            }
            match task_result {
                Ok(listing) => tasks.set(listing.items),
                Err(e) => {
                    tasks.set(Vec::new());
                    report_error(&e, "Failed to load tasks", &mut notifications, &mut auth);
                }
            }
            loading.set(false);
        }
    });

    let actions = TaskActions {
        notifications,
        auth,
        reload,
        editing,
    };

    let state = auth();
    let all_tasks = tasks();
    let all_projects = projects();
    let current = filter();
    let policy = policy_for(&state, &all_projects, api.policy);
    let shown = visible_tasks(&policy, &all_tasks, &current);
    let stats = task_stats(&shown, today());
    let completion = completion_percentage(stats.completed, stats.total);
    let active_filters = current.active_count();
    let filable: Vec<Project> = all_projects
        .iter()
        .filter(|p| policy.can_create_task(Some(*p)))
        .cloned()
        .collect();
    let can_create = policy.can_create_any_task();

    let to_view = |task: &Task| TaskView {
        task: task.clone(),
        can_edit: policy.can_edit_task(task),
        can_delete: policy.can_delete_task(task),
    };
    let rows = shown.iter().map(|task| to_view(*task)).collect::<Vec<_>>();
    let columns = kanban_columns(&shown)
        .into_iter()
        .map(|column| {
            let cards = column.tasks.iter().map(|task| to_view(*task)).collect::<Vec<_>>();
            (column.title, cards)
        })
        .collect::<Vec<_>>();

    rsx! {
        div {
            class: "page",
            header {
                class: "page-header",
                div {
                    h1 { "Tasks" }
                    p { class: "muted", "{stats.total} task(s), {completion}% complete" }
                }
                div {
                    class: "header-actions",
                    div {
                        class: "segmented",
                        button {
                            class: if layout() == Layout::List { "segment segment--active" } else { "segment" },
                            title: "List view",
                            onclick: move |_| layout.set(Layout::List),
                            Icon { icon: FaList, width: 14, height: 14 }
                        }
                        button {
                            class: if layout() == Layout::Board { "segment segment--active" } else { "segment" },
                            title: "Board view",
                            onclick: move |_| layout.set(Layout::Board),
                            Icon { icon: FaTableColumns, width: 14, height: 14 }
                        }
                    }
                    if can_create {
                        button {
                            class: "button button--primary",
                            onclick: move |_| editing.set(Editing::New),
                            Icon { icon: FaPlus, width: 14, height: 14 }
                            "New Task"
                        }
                    }
                }
            }

            section {
                class: "stat-grid",
                div { class: "stat-card", span { class: "stat-label", "Total" } span { class: "stat-value", "{stats.total}" } }
                div { class: "stat-card", span { class: "stat-label", "In progress" } span { class: "stat-value", "{stats.in_progress}" } }
                div { class: "stat-card", span { class: "stat-label", "Completed" } span { class: "stat-value", "{stats.completed}" } }
                div { class: "stat-card", span { class: "stat-label", "Overdue" } span { class: "stat-value", "{stats.overdue}" } }
            }

            section {
                class: "filters",
                div {
                    class: "input-with-icon",
                    Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
                    input {
                        r#type: "search",
                        placeholder: "Search tasks...",
                        value: current.search.clone(),
                        oninput: move |evt| filter.write().search = evt.value(),
                    }
                }
                select {
                    onchange: move |evt| filter.write().status = TaskStatus::from_str(&evt.value()).ok(),
                    option { value: "", selected: current.status.is_none(), "All statuses" }
                    for s in TaskStatus::ALL {
                        option { value: s.as_str(), selected: current.status == Some(s), "{enum_to_display_text(s.as_str())}" }
                    }
                }
                select {
                    onchange: move |evt| filter.write().priority = TaskPriority::from_str(&evt.value()).ok(),
                    option { value: "", selected: current.priority.is_none(), "All priorities" }
                    for p in TaskPriority::ALL {
                        option { value: p.as_str(), selected: current.priority == Some(p), "{enum_to_display_text(p.as_str())}" }
                    }
                }
                select {
                    onchange: move |evt| {
                        let value = evt.value();
                        filter.write().project_id = Some(value).filter(|id| !id.is_empty());
                    },
                    option { value: "", selected: current.project_id.is_none(), "All projects" }
                    for project in all_projects.iter() {
                        option {
                            key: "{project.id}",
                            value: "{project.id}",
                            selected: current.project_id.as_deref() == Some(project.id.as_str()),
                            "{project.title}"
                        }
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
            } else if rows.is_empty() {
                div {
                    class: "empty",
                    h3 { "No tasks found" }
                    if active_filters > 0 {
                        p { "Try adjusting your filters." }
                    }
                }
            } else if layout() == Layout::List {
                div {
                    class: "task-list",
                    for row in rows.iter() {
                        TaskRow {
                            key: "{row.task.id}",
                            row: row.clone(),
                            actions: actions,
                            on_open_task: on_open_task,
                        }
                    }
                }
            } else {
                div {
                    class: "kanban",
                    for (title, cards) in columns {
                        div {
                            key: "{title}",
                            class: "kanban-column",
                            div {
                                class: "kanban-column-header",
                                h3 { "{title}" }
                                span { class: "count", "{cards.len()}" }
                            }
                            for row in cards {
                                TaskRow {
                                    key: "{row.task.id}",
                                    row: row,
                                    actions: actions,
                                    on_open_task: on_open_task,
                                }
                            }
                        }
                    }
                }
            }

            {match editing() {
                Editing::Closed => rsx! {},
                Editing::New => rsx! {
                    TaskFormModal {
                        projects: filable.clone(),
                        on_close: move |_| editing.set(Editing::Closed),
                        on_saved: move |_| {
                            editing.set(Editing::Closed);
                            let mut reload = reload;
                            reload += 1;
                        },
                    }
                },
                Editing::Existing(task) => rsx! {
                    TaskFormModal {
                        existing: task,
                        projects: all_projects.clone(),
                        on_close: move |_| editing.set(Editing::Closed),
                        on_saved: move |_| {
                            editing.set(Editing::Closed);
                            let mut reload = reload;
                            reload += 1;
                        },
                    }
                },
            }}
        }
    }
}

/// A visible task with the controls the current user gets for it.
#[derive(Clone, PartialEq)]
struct TaskView {
    task: Task,
    can_edit: bool,
    can_delete: bool,
}

#[component]
fn TaskRow(row: TaskView, actions: TaskActions, on_open_task: EventHandler<String>) -> Element {
    let api = use_api();
    let task = row.task.clone();
    let overdue = is_overdue(&task, today());
    let open_id = task.id.clone();
    let assignee = extract_label_or(task.assigned_to.as_ref(), "Unassigned");

    rsx! {
        div {
            class: if overdue { "task-card task-card--overdue" } else { "task-card" },
            div {
                class: "task-card-main clickable",
                onclick: move |_| on_open_task.call(open_id.clone()),
                strong { "{task.title}" }
                if !task.description.is_empty() {
                    p { class: "muted", "{truncate_text(&task.description, 100)}" }
                }
                div {
                    class: "badge-row",
                    Badge { class: task_priority_class(task.priority), value: task.priority.as_str() }
                    if overdue {
                        span { class: "badge badge--red", "Overdue" }
                    }
                }
                div {
                    class: "card-footer",
                    span { "{extract_label(task.project_id.as_ref())}" }
                    span { "{assignee}" }
                    span { "Due {format_date(&task.due_date)}" }
                }
            }
            div {
                class: "task-card-actions",
                if row.can_edit {
                    select {
                        class: "status-select",
                        onchange: {
                            let client = api.client.clone();
                            let id = task.id.clone();
                            move |evt: FormEvent| {
                                if let Ok(status) = TaskStatus::from_str(&evt.value()) {
                                    change_status(client.clone(), id.clone(), status, actions);
                                }
                            }
                        },
                        for s in TaskStatus::ALL {
                            option { value: s.as_str(), selected: s == task.status, "{enum_to_display_text(s.as_str())}" }
                        }
                    }
                    button {
                        class: "icon-button",
                        title: "Edit",
                        onclick: {
                            let task = task.clone();
                            move |_| {
                                let mut editing = actions.editing;
                                editing.set(Editing::Existing(task.clone()));
                            }
                        },
                        Icon { icon: FaPen, width: 14, height: 14 }
                    }
                } else {
                    Badge { class: task_status_class(task.status), value: task.status.as_str() }
                }
                if row.can_delete {
                    button {
                        class: "icon-button icon-button--danger",
                        title: "Delete",
                        onclick: {
                            let client = api.client.clone();
                            let id = task.id.clone();
                            move |_| delete_task(client.clone(), id.clone(), actions)
                        },
                        Icon { icon: FaTrash, width: 14, height: 14 }
                    }
                }
            }
        }
    }
}

fn change_status(client: Option<HttpClient>, id: String, status: TaskStatus, actions: TaskActions) {
    let Some(client) = client else { return };
    let TaskActions {
        mut notifications,
        mut auth,
        mut reload,
        ..
    } = actions;
    spawn(async move {
        tracing::debug!(task = %id, status = status.as_str(), "Updating task status");
        match client.update_task_status(&id, status).await {
            Ok(_) => {
                notify(&mut notifications, Level::Success, "Task status updated");
                reload += 1;
            }
            Err(e) => report_error(&e, "Failed to update task status", &mut notifications, &mut auth),
        }
    });
}

fn delete_task(client: Option<HttpClient>, id: String, actions: TaskActions) {
    let Some(client) = client else { return };
    if !confirm("Are you sure you want to delete this task?") {
        return;
    }
    let TaskActions {
        mut notifications,
        mut auth,
        mut reload,
        ..
    } = actions;
    spawn(async move {
        match client.delete_task(&id).await {
            Ok(()) => {
                notify(&mut notifications, Level::Success, "Task deleted successfully");
                reload += 1;
            }
            Err(e) => report_error(&e, "Failed to delete task", &mut notifications, &mut auth),
        }
    });
}
