//! Transient notifications.
//!
//! Views push a [`Notice`] with [`notify`]; the [`NotificationStack`] renders the
//! current ones and each disappears on its own after [`NOTICE_TTL`].

use std::time::Duration;

use dioxus::prelude::*;

pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn class(&self) -> &'static str {
        match self {
            Level::Info => "notice notice--info",
            Level::Success => "notice notice--success",
            Level::Warning => "notice notice--warning",
            Level::Error => "notice notice--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: Level,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct Notifications {
    pub notices: Vec<Notice>,
    next_id: u64,
}

impl Notifications {
    fn push(&mut self, level: Level, message: String) -> u64 {
        self.next_id += 1;
        self.notices.push(Notice {
            id: self.next_id,
            level,
            message,
        });
        self.next_id
    }

    fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }
}

pub fn use_notifications() -> Signal<Notifications> {
    use_context::<Signal<Notifications>>()
}

/// Show `message` for a few seconds.
pub fn notify(notifications: &mut Signal<Notifications>, level: Level, message: impl Into<String>) {
    let message = message.into();
    match level {
        Level::Error | Level::Warning => tracing::warn!("{message}"),
        Level::Info | Level::Success => tracing::info!("{message}"),
    }
    let id = notifications.write().push(level, message);

    let mut notifications = *notifications;
    spawn(async move {
        sleep(NOTICE_TTL).await;
        notifications.write().dismiss(id);
    });
}

async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Provides the notification context and renders the stack above `children`.
#[component]
pub fn NotificationProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(Notifications::default()));

    rsx! {
        {children}
        NotificationStack {}
    }
}

#[component]
fn NotificationStack() -> Element {
    let mut notifications = use_notifications();
    let notices = notifications().notices.clone();

    rsx! {
        div {
            class: "notice-stack",
            for notice in notices {
                div {
                    key: "{notice.id}",
                    class: notice.level.class(),
                    onclick: move |_| notifications.write().dismiss(notice.id),
                    "{notice.message}"
                }
            }
        }
    }
}
