use dioxus::prelude::*;
use ui::views::DashboardView;

use crate::Route;

#[component]
pub fn Dashboard() -> Element {
    let nav = use_navigator();
    rsx! {
        DashboardView {
            on_open_task: move |task_id: String| {
                nav.push(Route::TaskDetail { task_id });
            },
        }
    }
}
