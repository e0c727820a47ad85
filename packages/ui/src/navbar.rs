use dioxus::prelude::*;

use crate::auth::{use_auth, LogoutButton};

/// Top bar showing who is signed in.
#[component]
pub fn Navbar(children: Element) -> Element {
    let auth = use_auth();
    let session = auth().session;
    let name = session.as_ref().map(|s| s.display_name().to_string());
    let image = session.as_ref().and_then(|s| s.user.image.clone());

    rsx! {
        div {
            class: "flex items-center justify-between px-6 py-3 border-b border-neutral-200",
            {children}
            if let Some(name) = name {
                div {
                    class: "flex items-center gap-3 text-sm text-neutral-700",
                    if let Some(image) = image {
                        img {
                            class: "w-7 h-7 rounded-full",
                            src: "{image}",
                            alt: "Avatar",
                        }
                    }
                    span { "{name}" }
                    LogoutButton {
                        class: "px-3 py-1 rounded border border-neutral-300 hover:bg-neutral-100",
                    }
                }
            }
        }
    }
}
