//! Email/password form for the Strapi credentials provider.

use api::auth::PROTECTED_PATH;
use dioxus::prelude::*;

use crate::auth::{navigate_to, use_auth};

/// Sign-in form posting to the credentials provider.
#[component]
pub fn CredentialsForm() -> Element {
    let auth = use_auth();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            error.set(None);

            let e = email().trim().to_string();
            let p = password();

            if e.is_empty() || p.is_empty() {
                error.set(Some("Email and password are required".to_string()));
                return;
            }

            loading.set(true);
            match api::login_credentials(e, p).await {
                Ok(result) if result.ok => {
                    let url = result.url.unwrap_or_else(|| PROTECTED_PATH.to_string());
                    navigate_to(&url);
                }
                Ok(result) => {
                    loading.set(false);
                    let code = result.error.unwrap_or(api::ErrorCode::Default);
                    error.set(Some(code.message().to_string()));
                }
                Err(e) => {
                    loading.set(false);
                    tracing::error!("Credentials sign-in failed: {}", e);
                    error.set(Some(api::ErrorCode::Default.message().to_string()));
                }
            }
        });
    };

    use_effect(move || {
        if let Some(path) = auth().signed_in_redirect() {
            navigate_to(path);
        }
    });

    rsx! {
        form {
            onsubmit: handle_login,
            class: "flex flex-col gap-3 w-full",

            if let Some(err) = error() {
                div {
                    class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
                    "{err}"
                }
            }

            label {
                class: "text-sm font-medium text-neutral-700",
                "Email"
                input {
                    class: "mt-1 w-full rounded border border-neutral-300 px-3 py-2",
                    r#type: "email",
                    name: "email",
                    autocomplete: "email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
            }

            label {
                class: "text-sm font-medium text-neutral-700",
                "Password"
                input {
                    class: "mt-1 w-full rounded border border-neutral-300 px-3 py-2",
                    r#type: "password",
                    name: "password",
                    autocomplete: "current-password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
            }

            button {
                class: "w-full rounded bg-neutral-900 px-3 py-2 text-white font-medium disabled:opacity-50",
                r#type: "submit",
                disabled: loading(),
                if loading() { "Signing in..." } else { "Sign in with Strapi Credentials" }
            }
        }
    }
}
