use dioxus::prelude::*;
use ui::views::{AppShellView, Section};

use crate::Route;

/// Navigation shell around every signed-in page.
#[component]
pub fn AppLayout() -> Element {
    let nav = use_navigator();
    let route = use_route::<Route>();
    let active = match route {
        Route::Dashboard {} => Some(Section::Dashboard),
        Route::Projects {} => Some(Section::Projects),
        Route::Tasks {} | Route::TaskDetail { .. } => Some(Section::Tasks),
        _ => None,
    };

    rsx! {
        AppShellView {
            active: active,
            on_navigate: move |section: Section| {
                let target = match section {
                    Section::Dashboard => Route::Dashboard {},
                    Section::Projects => Route::Projects {},
                    Section::Tasks => Route::Tasks {},
                };
                nav.push(target);
            },
            on_signed_out: move |_| {
                tracing::debug!("No signed-in user, redirecting to login");
                nav.replace(Route::Login {});
            },
            Outlet::<Route> {}
        }
    }
}
