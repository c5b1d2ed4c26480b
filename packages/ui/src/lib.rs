//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod views;

mod auth;
pub use auth::{
    policy_for, report_error, sign_out, use_api, use_auth, ApiContext, AuthProvider, AuthState,
    LogoutButton,
};

pub mod badges;

pub mod notifications;
pub use notifications::{notify, use_notifications, Level, NotificationProvider};

mod storage;
pub use storage::LocalStorageTokenStore;
