use dioxus::prelude::*;
use ui::views::TaskDetailView;

use crate::Route;

/// Task detail page, keyed by the id in the route.
#[component]
pub fn TaskDetail(task_id: String) -> Element {
    let nav = use_navigator();
    rsx! {
        TaskDetailView {
            task_id: task_id,
            on_back: move |_| {
                nav.push(Route::Tasks {});
            },
        }
    }
}
