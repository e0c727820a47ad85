//! Authentication context and hooks for the UI.

use api::auth::{PROTECTED_PATH, SIGN_IN_PATH};
use api::{ProviderKind, Session};
use dioxus::prelude::*;

use crate::icons::{FaDiscord, FaGoogle, FaLock, FaRightFromBracket};
use crate::Icon;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Where a sign-in page should send a user who already has a session.
    /// `None` while the session is still loading or when there is none.
    pub fn signed_in_redirect(&self) -> Option<&'static str> {
        (!self.loading && self.is_authenticated()).then_some(PROTECTED_PATH)
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Full page navigation, used for OAuth redirects and after sign-in so the
/// new session cookie is picked up.
pub fn navigate_to(url: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(url);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::debug!("Navigation to {} requested outside the browser", url);
    }
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);

    // Fetch the current session on mount
    let _ = use_resource(move || async move {
        match api::get_session().await {
            Ok(session) => auth_state.set(AuthState {
                session,
                loading: false,
            }),
            Err(e) => {
                tracing::error!("Failed to load session: {}", e);
                auth_state.set(AuthState {
                    session: None,
                    loading: false,
                });
            }
        }
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button to initiate login with an OAuth provider.
#[component]
pub fn LoginButton(
    provider: ProviderKind,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut loading = use_signal(|| false);

    let onclick = move |_| async move {
        loading.set(true);
        match api::get_login_url(provider.id().to_string()).await {
            Ok(url) => navigate_to(&url),
            Err(e) => {
                tracing::error!("Failed to get login URL: {}", e);
                loading.set(false);
            }
        }
    };

    let label = format!("Sign in with {}", provider.name());
    let icon = match provider {
        ProviderKind::Google => rsx! { Icon { icon: FaGoogle, width: 16, height: 16 } },
        ProviderKind::Discord => rsx! { Icon { icon: FaDiscord, width: 16, height: 16 } },
        _ => rsx! { Icon { icon: FaLock, width: 16, height: 16 } },
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick: onclick,
            {icon}
            if loading() {
                "Loading..."
            } else {
                "{label}"
            }
        }
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth_state = use_auth();

    let onclick = move |_| async move {
        match api::logout().await {
            Ok(()) => {
                auth_state.set(AuthState {
                    session: None,
                    loading: false,
                });
                navigate_to(SIGN_IN_PATH);
            }
            Err(e) => tracing::error!("Failed to sign out: {}", e),
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            Icon { icon: FaRightFromBracket, width: 12, height: 12 }
            " {label}"
        }
    }
}
