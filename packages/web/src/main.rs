use dioxus::prelude::*;

use ui::{AuthProvider, Styles};
use views::{ErrorPage, Protected, SignIn};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/auth/signin")]
    SignIn {},
    #[route("/auth/error?:error")]
    ErrorPage { error: String },
    #[route("/protected")]
    Protected {},
}

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .expect("Failed to start the Tokio runtime")
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use std::sync::Arc;

    use api::auth::{
        connect_session_database, session_store, AuthConfig, AuthContext, EXPIRED_SESSION_SWEEP,
    };
    use axum::routing::get;
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use tower_sessions::cookie::{Key, SameSite};
    use tower_sessions::session_store::ExpiredDeletion;
    use tower_sessions::{Expiry, SessionManagerLayer};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        base_url = %config.base_url,
        backend_url = %config.backend_url,
        "Loaded auth configuration"
    );

    let key = match config.secret.as_deref() {
        Some(secret) => Key::try_from(secret.as_bytes()).unwrap_or_else(|_| {
            tracing::warn!("AUTH_SECRET is shorter than 64 bytes, using a generated signing key");
            Key::generate()
        }),
        None => {
            tracing::warn!("AUTH_SECRET not set, sessions will not survive a restart");
            Key::generate()
        }
    };

    let max_age = tower_sessions::cookie::time::Duration::seconds(config.session_max_age_secs);

    // Create session store
    let store = match connect_session_database(&config.session_database_url).await {
        Ok(pool) => session_store(pool).await,
        Err(e) => Err(e),
    };
    let store = match store {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Sweep expired session records in the background
    let sweeper = store.clone();
    tokio::spawn(async move {
        if let Err(e) = sweeper.continuously_delete_expired(EXPIRED_SESSION_SWEEP).await {
            tracing::error!("Expired session cleanup stopped: {}", e);
        }
    });

    // Session layer configuration
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(config.use_secure_cookies())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(max_age))
        .with_signed(key);

    let ctx = match AuthContext::new(config) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            tracing::error!("Failed to initialise authentication: {}", e);
            std::process::exit(1);
        }
    };
    for provider in ctx.providers() {
        tracing::info!("Sign-in provider enabled: {}", provider.name);
    }

    let router = axum::Router::new()
        // OAuth callback first
        .route("/api/auth/callback/{provider}", get(oauth_callback))
        // Then serve the Dioxus application
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(axum::Extension(ctx))
        // Add session layer to all routes
        .layer(session_layer);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router.into_make_service()).await {
        tracing::error!("Server error: {}", e);
    }
}

/// Completes an OAuth sign-in and redirects to the protected page.
#[cfg(feature = "server")]
async fn oauth_callback(
    axum::extract::Path(provider): axum::extract::Path<String>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
    axum::Extension(ctx): axum::Extension<std::sync::Arc<api::auth::AuthContext>>,
    session: tower_sessions::Session,
) -> axum::response::Redirect {
    use api::auth::ErrorCode;
    use axum::response::Redirect;

    if let Some(error) = params.get("error") {
        tracing::warn!("{} sign-in refused by provider: {}", provider, error);
        return Redirect::to(&ctx.error_url(ErrorCode::AccessDenied));
    }
    let Some(code) = params.get("code") else {
        tracing::error!("{} callback missing code", provider);
        return Redirect::to(&ctx.error_url(ErrorCode::OAuthCallback));
    };
    let Some(state) = params.get("state") else {
        tracing::error!("{} callback missing state", provider);
        return Redirect::to(&ctx.error_url(ErrorCode::OAuthCallback));
    };

    match ctx.complete_oauth(&session, &provider, code, state).await {
        Ok(url) => Redirect::to(&url),
        Err(e) => {
            tracing::error!("{} OAuth error: {}", provider, e);
            Redirect::to(&ctx.error_url(e.code()))
        }
    }
}

#[component]
fn App() -> Element {
    rsx! {
        Styles {}

        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// Redirect `/` to the protected page
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Protected {});
    rsx! {}
}
