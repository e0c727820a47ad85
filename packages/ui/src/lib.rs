//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::{FaDiscord, FaGoogle};
    pub use dioxus_free_icons::icons::fa_solid_icons::{FaLock, FaRightFromBracket};
}

mod alert;
pub use alert::{Alert, DEMO_PASSWORD, DEMO_USERNAME};

mod auth;
pub use auth::{navigate_to, use_auth, AuthProvider, AuthState, LoginButton, LogoutButton};

mod credentials_form;
pub use credentials_form::CredentialsForm;

mod navbar;
pub use navbar::Navbar;

/// Loads the Tailwind build the components are styled with.
#[component]
pub fn Styles() -> Element {
    rsx! {
        document::Script { src: "https://cdn.tailwindcss.com" }
    }
}
