use dioxus::prelude::*;
use resolver::display::enum_to_display_text;

use crate::badges::Avatar;
use crate::icons::{FaChartPie, FaFolderOpen, FaListCheck};
use crate::{use_auth, Icon, LogoutButton};

/// Top-level sections reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Projects,
    Tasks,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Dashboard, Section::Projects, Section::Tasks];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Projects => "Projects",
            Section::Tasks => "Tasks",
        }
    }
}

/// Shared layout for signed-in pages.
///
/// Platform packages provide navigation callbacks and an `Outlet` as children.
/// While no user is signed in the children are not rendered and `on_signed_out`
/// fires, so a platform can send the visitor to its login route.
#[component]
pub fn AppShellView(
    /// Section to highlight, if the current page belongs to one.
    active: Option<Section>,
    /// The router outlet for child routes.
    children: Element,
    on_navigate: EventHandler<Section>,
    on_signed_out: EventHandler<()>,
) -> Element {
    let auth = use_auth();

    use_effect(move || {
        let state = auth();
        if !state.loading && state.user.is_none() {
            on_signed_out.call(());
        }
    });

    let state = auth();
    if state.loading {
        return rsx! {
            div { class: "page-center", div { class: "spinner" } }
        };
    }
    let Some(user) = state.user else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "shell",
            nav {
                class: "navbar",
                span { class: "brand", "Taskboard" }
                div {
                    class: "nav-links",
                    for section in Section::ALL {
                        button {
                            key: "{section.label()}",
                            class: if active == Some(section) { "nav-link nav-link--active" } else { "nav-link" },
                            onclick: move |_| on_navigate.call(section),
                            {match section {
                                Section::Dashboard => rsx! { Icon { icon: FaChartPie, width: 14, height: 14 } },
                                Section::Projects => rsx! { Icon { icon: FaFolderOpen, width: 14, height: 14 } },
                                Section::Tasks => rsx! { Icon { icon: FaListCheck, width: 14, height: 14 } },
                            }}
                            "{section.label()}"
                        }
                    }
                }
                div {
                    class: "nav-user",
                    Avatar { user: user.clone() }
                    div {
                        class: "nav-user-text",
                        span { "{user.display_name()}" }
                        span { class: "muted", "{enum_to_display_text(user.role.as_str())}" }
                    }
                    LogoutButton {
                        class: "button button--outline",
                        on_logged_out: move |_| on_signed_out.call(()),
                    }
                }
            }
            main { class: "content", {children} }
        }
    }
}
