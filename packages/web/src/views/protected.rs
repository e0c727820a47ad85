//! Page every successful sign-in lands on.

use api::auth::SIGN_IN_PATH;
use api::ErrorCode;
use dioxus::prelude::*;
use ui::{use_auth, Navbar};

/// Protected page component.
#[component]
pub fn Protected() -> Element {
    let auth = use_auth();
    let state = auth();

    if state.loading {
        return rsx! {
            div { class: "p-8 text-neutral-500", "Loading..." }
        };
    }

    let Some(session) = state.session else {
        let message = ErrorCode::SessionRequired.message();
        return rsx! {
            div {
                class: "flex flex-col items-center justify-center min-h-screen p-8 gap-4",
                p { class: "text-neutral-600", "{message}" }
                a {
                    class: "text-sm text-neutral-900 underline",
                    href: SIGN_IN_PATH,
                    "Sign in"
                }
            }
        };
    };

    let name = session.display_name().to_string();
    let email = session.user.email.clone().unwrap_or_default();
    let strapi_user = session
        .user
        .strapi_user_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    let has_token = session.strapi_token.is_some();
    let blocked = session.is_blocked();
    let expires = session.expires.format("%Y-%m-%d %H:%M UTC").to_string();

    rsx! {
        Navbar {
            span { class: "font-semibold text-neutral-800", "Protected" }
        }

        div {
            class: "max-w-xl mx-auto p-8 flex flex-col gap-4",

            h1 {
                class: "text-neutral-800 font-bold text-[1.5rem]",
                "Welcome, {name}"
            }

            if blocked {
                div {
                    class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-sm",
                    "This account is blocked in Strapi."
                }
            }

            dl {
                class: "grid grid-cols-2 gap-2 text-sm text-neutral-700",
                dt { class: "font-medium", "Email" }
                dd { "{email}" }
                dt { class: "font-medium", "Strapi user" }
                dd { "{strapi_user}" }
                dt { class: "font-medium", "Strapi token" }
                dd { if has_token { "present" } else { "none" } }
                dt { class: "font-medium", "Session expires" }
                dd { "{expires}" }
            }
        }
    }
}
