//! Error page shown when a sign-in fails.

use api::auth::SIGN_IN_PATH;
use api::ErrorCode;
use dioxus::prelude::*;

/// Error page component, reading the code from `?error=`.
#[component]
pub fn ErrorPage(error: String) -> Element {
    let message = ErrorCode::from_query(&error).message();

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 bg-white",

            h1 {
                class: "mb-2 text-neutral-800 font-bold text-[1.75rem]",
                "Unable to sign in"
            }

            p {
                class: "mb-8 text-neutral-600 text-[0.9375rem]",
                "{message}"
            }

            a {
                class: "text-sm text-neutral-900 underline",
                href: SIGN_IN_PATH,
                "Back to sign in"
            }
        }
    }
}
