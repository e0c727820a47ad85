//! Sign-in page: demo notice, Strapi credentials form and OAuth buttons.

use dioxus::prelude::*;
use ui::{Alert, CredentialsForm, LoginButton};

/// Sign-in page component.
#[component]
pub fn SignIn() -> Element {
    let providers = use_resource(|| async move { api::get_providers().await });

    let oauth_providers: Vec<api::ProviderKind> = match &*providers.read() {
        Some(Ok(list)) => list
            .iter()
            .filter_map(|info| info.provider())
            .filter(|p| p.is_oauth())
            .collect(),
        Some(Err(_)) | None => Vec::new(),
    };

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 bg-white",

            div {
                class: "flex flex-col gap-6 w-full max-w-[360px]",

                h1 {
                    class: "text-neutral-800 font-bold text-[1.75rem] text-center",
                    "Sign in"
                }

                Alert {}

                CredentialsForm {}

                if !oauth_providers.is_empty() {
                    div {
                        class: "flex items-center gap-3 text-xs text-neutral-500",
                        div { class: "h-px flex-1 bg-neutral-200" }
                        "or"
                        div { class: "h-px flex-1 bg-neutral-200" }
                    }

                    div {
                        class: "flex flex-col gap-3",
                        for provider in oauth_providers {
                            LoginButton {
                                key: "{provider}",
                                provider,
                                class: "flex items-center justify-center gap-2 w-full rounded border border-neutral-300 px-3 py-2 hover:bg-neutral-50",
                            }
                        }
                    }
                }
            }
        }
    }
}
