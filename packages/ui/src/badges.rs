//! Small presentational pieces shared by the list and detail views.

use dioxus::prelude::*;
use resolver::display::{enum_to_display_text, initials};
use resolver::{ProjectPriority, ProjectStatus, TaskPriority, TaskStatus, User};

pub fn task_status_class(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "badge badge--gray",
        TaskStatus::InProgress => "badge badge--blue",
        TaskStatus::Review => "badge badge--purple",
        TaskStatus::Testing => "badge badge--amber",
        TaskStatus::Completed => "badge badge--green",
        TaskStatus::Blocked => "badge badge--red",
    }
}

pub fn task_priority_class(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "badge badge--gray",
        TaskPriority::Medium => "badge badge--blue",
        TaskPriority::High => "badge badge--amber",
        TaskPriority::Urgent => "badge badge--red",
    }
}

pub fn project_status_class(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planning => "badge badge--gray",
        ProjectStatus::InProgress => "badge badge--blue",
        ProjectStatus::Testing => "badge badge--purple",
        ProjectStatus::Completed => "badge badge--green",
        ProjectStatus::OnHold => "badge badge--amber",
        ProjectStatus::Cancelled => "badge badge--red",
    }
}

pub fn project_priority_class(priority: ProjectPriority) -> &'static str {
    match priority {
        ProjectPriority::Low => "badge badge--gray",
        ProjectPriority::Medium => "badge badge--blue",
        ProjectPriority::High => "badge badge--amber",
        ProjectPriority::Critical => "badge badge--red",
    }
}

/// A pill with the display text of an enum value.
#[component]
pub fn Badge(class: &'static str, value: &'static str) -> Element {
    rsx! {
        span { class: "{class}", "{enum_to_display_text(value)}" }
    }
}

#[component]
pub fn Avatar(user: User) -> Element {
    let letters = initials(&user.first_name, &user.last_name);
    rsx! {
        span {
            class: "avatar",
            title: "{user.display_name()}",
            "{letters}"
        }
    }
}
