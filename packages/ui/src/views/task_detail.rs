use dioxus::prelude::*;
use resolver::board::is_overdue;
use resolver::display::{format_date, today};
use resolver::form::validate_comment;
use resolver::relation::{extract_label, extract_label_or};
use resolver::Task;

use crate::badges::{task_priority_class, task_status_class, Badge};
use crate::icons::FaArrowLeft;
use crate::notifications::{notify, use_notifications, Level};
use crate::{report_error, use_api, use_auth, Icon};

#[derive(Clone, PartialEq)]
enum Loaded {
    Pending,
    Missing,
    Found(Task),
}

/// A single task with its relations resolved and its comment thread.
#[component]
pub fn TaskDetailView(task_id: String, on_back: EventHandler<()>) -> Element {
    let mut auth = use_auth();
    let api = use_api();
    let mut notifications = use_notifications();

    let mut loaded = use_signal(|| Loaded::Pending);
    let mut reload = use_signal(|| 0u32);
    let mut comment = use_signal(String::new);
    let mut posting = use_signal(|| false);

    // Track the id in a signal so the loader re-runs when the route param changes
    let mut id = use_signal(|| task_id.clone());
    if *id.peek() != task_id {
        id.set(task_id.clone());
    }

    let client = api.client.clone();
    let _loader = use_resource(move || {
        let client = client.clone();
        let id = id();
        let _ = reload();
        async move {
            let Some(client) = client else {
                loaded.set(Loaded::Missing);
                return;
            };
            match client.task(&id).await {
                Ok(task) => loaded.set(Loaded::Found(task)),
                Err(e) => {
                    loaded.set(Loaded::Missing);
                    report_error(&e, "Failed to load task", &mut notifications, &mut auth);
                }
            }
        }
    });

    let handle_comment = move |evt: FormEvent| {
        evt.prevent_default();
        if posting() {
            return;
        }
        let Some(client) = api.client.clone() else { return };
        let text = match validate_comment(&comment()) {
            Ok(text) => text,
            Err(e) => return notify(&mut notifications, Level::Error, e.to_string()),
        };
        let id = id();
        posting.set(true);
        spawn(async move {
            match client.add_comment(&id, &text).await {
                Ok(_) => {
                    comment.set(String::new());
                    notify(&mut notifications, Level::Success, "Comment added");
                    reload += 1;
                }
                Err(e) => report_error(&e, "Failed to add comment", &mut notifications, &mut auth),
            }
            posting.set(false);
        });
    };

    let task = match loaded() {
        Loaded::Pending => {
            return rsx! {
                div { class: "page-center", div { class: "spinner" } }
            }
        }
        Loaded::Missing => {
            return rsx! {
                div {
                    class: "page empty",
                    h3 { "Task not found" }
                    button {
                        class: "button button--outline",
                        onclick: move |_| on_back.call(()),
                        "Back to tasks"
                    }
                }
            }
        }
        Loaded::Found(task) => task,
    };

    let overdue = is_overdue(&task, today());
    let assignee = extract_label_or(task.assigned_to.as_ref(), "Unassigned");
    let creator = extract_label_or(task.created_by.as_ref(), "Unknown");
    let project = extract_label(task.project_id.as_ref());
    let hours = task
        .estimated_hours
        .map(|h| format!("{h}h"))
        .unwrap_or_else(|| "-".to_string());

    rsx! {
        div {
            class: "page",
            button {
                class: "button button--ghost",
                onclick: move |_| on_back.call(()),
                Icon { icon: FaArrowLeft, width: 14, height: 14 }
                "Back to tasks"
            }
            header {
                class: "page-header",
                h1 { "{task.title}" }
                div {
                    class: "badge-row",
                    Badge { class: task_status_class(task.status), value: task.status.as_str() }
                    Badge { class: task_priority_class(task.priority), value: task.priority.as_str() }
                    if overdue {
                        span { class: "badge badge--red", "Overdue" }
                    }
                }
            }

            div {
                class: "two-columns",
                section {
                    class: "panel",
                    h2 { "Description" }
                    if task.description.is_empty() {
                        p { class: "muted", "No description provided" }
                    } else {
                        p { class: "prose", "{task.description}" }
                    }
                    if !task.tags.is_empty() {
                        div {
                            class: "tag-row",
                            for tag in task.tags.iter() {
                                span { class: "tag", "{tag}" }
                            }
                        }
                    }
                }
                section {
                    class: "panel details",
                    h2 { "Details" }
                    dl {
                        dt { "Project" }
                        dd { "{project}" }
                        dt { "Assigned to" }
                        dd { "{assignee}" }
                        dt { "Created by" }
                        dd { "{creator}" }
                        dt { "Due date" }
                        dd { class: if overdue { "overdue" } else { "" }, "{format_date(&task.due_date)}" }
                        dt { "Estimated" }
                        dd { "{hours}" }
                        if let Some(done) = &task.completed_at {
                            dt { "Completed" }
                            dd { "{format_date(done)}" }
                        }
                    }
                }
            }

            section {
                class: "panel",
                h2 { "Comments ({task.comments.len()})" }
                if task.comments.is_empty() {
                    p { class: "muted", "No comments yet" }
                }
                ul {
                    class: "comment-list",
                    for (index, entry) in task.comments.iter().enumerate() {
                        li {
                            key: "{index}",
                            div {
                                class: "comment-meta",
                                strong { "{extract_label(entry.user_id.as_ref())}" }
                                if let Some(at) = &entry.created_at {
                                    span { class: "muted", "{format_date(at)}" }
                                }
                            }
                            p { "{entry.comment}" }
                        }
                    }
                }
                form {
                    class: "comment-form",
                    onsubmit: handle_comment,
                    textarea {
                        rows: 3,
                        placeholder: "Add a comment...",
                        value: comment(),
                        oninput: move |evt| comment.set(evt.value()),
                    }
                    button {
                        r#type: "submit",
                        class: "button button--primary",
                        disabled: posting(),
                        if posting() { "Posting..." } else { "Add Comment" }
                    }
                }
            }
        }
    }
}
