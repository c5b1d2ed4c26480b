use dioxus::prelude::*;
use ui::views::TasksView;

use crate::Route;

#[component]
pub fn Tasks() -> Element {
    let nav = use_navigator();
    rsx! {
        TasksView {
            on_open_task: move |task_id: String| {
                nav.push(Route::TaskDetail { task_id });
            },
        }
    }
}
