//! Authentication context and hooks for the UI.

use api::{ApiConfig, ApiError, HttpClient, Session};
use dioxus::prelude::*;
use resolver::{AccessPolicy, PolicyOptions, Project, User};

use crate::notifications::{notify, Level, Notifications};
use crate::storage::LocalStorageTokenStore;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    /// True until the stored session has been checked on startup.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn signed_in(user: Option<User>) -> Self {
        Self {
            user,
            loading: false,
        }
    }
}

/// Everything the views need to talk to the API.
#[derive(Clone)]
pub struct ApiContext {
    pub client: Option<HttpClient>,
    pub policy: PolicyOptions,
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_api() -> ApiContext {
    use_context::<ApiContext>()
}

/// Access policy for the signed-in user over `projects`.
pub fn policy_for<'a>(
    auth: &'a AuthState,
    projects: &'a [Project],
    options: PolicyOptions,
) -> AccessPolicy<'a> {
    AccessPolicy::new(auth.user.as_ref(), projects).with_options(options)
}

fn build_client() -> Option<HttpClient> {
    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default API configuration: {e}");
        ApiConfig::default()
    });
    tracing::info!("API root: {}", config.api_root());
    match api::connect(&config, Session::new(LocalStorageTokenStore)) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::error!("Could not create API client: {e}");
            None
        }
    }
}

/// Provider component that owns the session.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(
    /// Let managers act with admin privileges.
    #[props(default)]
    elevate_managers: bool,
    children: Element,
) -> Element {
    let mut auth_state = use_signal(AuthState::default);
    let context = use_context_provider(|| ApiContext {
        client: build_client(),
        policy: PolicyOptions { elevate_managers },
    });

    // Restore a stored session on mount
    let _ = use_resource(move || {
        let client = context.client.clone();
        async move {
            let user = match client {
                Some(client) => client.restore().await,
                None => None,
            };
            auth_state.set(AuthState::signed_in(user));
        }
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Sign out locally and on the server, then hand control back to the caller.
pub async fn sign_out(client: Option<HttpClient>, mut auth_state: Signal<AuthState>) {
    if let Some(client) = client {
        client.logout().await;
    }
    auth_state.set(AuthState::signed_in(None));
}

/// Report a failed call. When the session is gone the user is signed out, which
/// sends every view back to the login page.
pub fn report_error(
    error: &ApiError,
    what: &str,
    notifications: &mut Signal<Notifications>,
    auth_state: &mut Signal<AuthState>,
) {
    if error.requires_login() {
        auth_state.set(AuthState::signed_in(None));
    }
    notify(notifications, Level::Error, format!("{what}: {}", error.user_message()));
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    on_logged_out: EventHandler<()>,
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let auth_state = use_auth();
    let api = use_api();

    let onclick = move |_| {
        let client = api.client.clone();
        async move {
            sign_out(client, auth_state).await;
            on_logged_out.call(());
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
