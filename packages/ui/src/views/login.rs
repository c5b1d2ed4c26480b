use api::LoginCredentials;
use dioxus::prelude::*;

use crate::icons::{FaEnvelope, FaEye, FaEyeSlash, FaLock, FaUserPlus};
use crate::notifications::{notify, use_notifications, Level};
use crate::{use_api, use_auth, AuthState, Icon};

/// Email/password sign-in form.
#[component]
pub fn LoginView(
    /// Called once a user is signed in, including when one already was.
    on_signed_in: EventHandler<()>,
) -> Element {
    let mut auth = use_auth();
    let api = use_api();
    let mut notifications = use_notifications();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut show_password = use_signal(|| false);
    let mut submitting = use_signal(|| false);

    use_effect(move || {
        let state = auth();
        if !state.loading && state.user.is_some() {
            on_signed_in.call(());
        }
    });

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let Some(client) = api.client.clone() else {
            notify(&mut notifications, Level::Error, "The API is not configured");
            return;
        };
        let credentials = LoginCredentials {
            email: email().trim().to_string(),
            password: password(),
        };
        if credentials.email.is_empty() || credentials.password.is_empty() {
            notify(&mut notifications, Level::Error, "Please fill in all required fields");
            return;
        }
        submitting.set(true);
        spawn(async move {
            match client.login(&credentials).await {
                Ok(user) => {
                    notify(&mut notifications, Level::Success, "Welcome back!");
                    auth.set(AuthState::signed_in(Some(user)));
                }
                Err(e) => {
                    notify(&mut notifications, Level::Error, e.user_message());
                }
            }
            submitting.set(false);
        });
    };

    if auth().loading {
        return rsx! {
            div { class: "page-center", div { class: "spinner" } }
        };
    }
    if auth().user.is_some() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "login-page",
            div {
                class: "login-brand",
                div { class: "login-logo", Icon { icon: FaUserPlus, width: 28, height: 28 } }
                h2 { "Sign in to your account" }
                p { "Enterprise Task Management System" }
            }
            form {
                class: "login-card",
                onsubmit: handle_submit,
                label { r#for: "email", "Email address" }
                div {
                    class: "input-with-icon",
                    Icon { icon: FaEnvelope, width: 16, height: 16 }
                    input {
                        id: "email",
                        r#type: "email",
                        autocomplete: "email",
                        required: true,
                        placeholder: "you@example.com",
                        value: email(),
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { r#for: "password", "Password" }
                div {
                    class: "input-with-icon",
                    Icon { icon: FaLock, width: 16, height: 16 }
                    input {
                        id: "password",
                        r#type: if show_password() { "text" } else { "password" },
                        autocomplete: "current-password",
                        required: true,
                        value: password(),
                        oninput: move |evt| password.set(evt.value()),
                    }
                    button {
                        r#type: "button",
                        class: "icon-button",
                        onclick: move |_| show_password.set(!show_password()),
                        if show_password() {
                            Icon { icon: FaEyeSlash, width: 16, height: 16 }
                        } else {
                            Icon { icon: FaEye, width: 16, height: 16 }
                        }
                    }
                }
                button {
                    r#type: "submit",
                    class: "button button--primary button--wide",
                    disabled: submitting(),
                    if submitting() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
