//! # API crate: shared fullstack server functions
//!
//! This crate holds the authentication core of the application and the Dioxus
//! server functions the frontend calls.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | partly `server` | Providers, configuration, Strapi credentials login, OAuth (Google, Discord, Auth0), session token and redirect policy |
//! | [`models`] | | Strapi wire types and the signed-in user records |
//!
//! ## Server functions exposed here
//!
//! Every public `async fn` in this file is a Dioxus server function, compiled
//! once with full server logic (behind `#[cfg(feature = "server")]`) and once
//! as a client stub.
//!
//! - `get_session`, `get_providers`, `get_login_url`, `login_credentials`, `logout`
//!
//! Server builds expect two layers on the router: the `tower-sessions`
//! session layer and an `axum::Extension<Arc<auth::AuthContext>>`.

use dioxus::prelude::*;

pub mod auth;
pub mod models;

pub use auth::{ErrorCode, ProviderInfo, ProviderKind, Session, SignInResult};

#[cfg(feature = "server")]
type AuthExtension = axum::Extension<std::sync::Arc<auth::AuthContext>>;

/// Get the current session, rolling its expiry forward.
#[cfg(feature = "server")]
#[get("/api/auth/session", session: tower_sessions::Session, ctx: AuthExtension)]
pub async fn get_session() -> Result<Option<Session>, ServerFnError> {
    let token: Option<auth::SessionToken> = session
        .get(auth::SESSION_TOKEN_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some(token) = token else {
        return Ok(None);
    };

    let Some(token) = ctx.refresh(token) else {
        session
            .remove::<auth::SessionToken>(auth::SESSION_TOKEN_KEY)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
        return Ok(None);
    };

    let client_session = Session::materialize(&token);
    session
        .insert(auth::SESSION_TOKEN_KEY, token)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(Some(client_session))
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/session")]
pub async fn get_session() -> Result<Option<Session>, ServerFnError> {
    Ok(None)
}

/// List the providers offered on the sign-in page.
#[cfg(feature = "server")]
#[get("/api/auth/providers", ctx: AuthExtension)]
pub async fn get_providers() -> Result<Vec<ProviderInfo>, ServerFnError> {
    Ok(ctx.providers())
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/providers")]
pub async fn get_providers() -> Result<Vec<ProviderInfo>, ServerFnError> {
    Ok(Vec::new())
}

/// Get the OAuth login URL for a provider.
#[cfg(feature = "server")]
#[get("/api/auth/signin/:provider", session: tower_sessions::Session, ctx: AuthExtension)]
pub async fn get_login_url(provider: String) -> Result<String, ServerFnError> {
    ctx.start_oauth(&session, &provider)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/signin/:provider")]
pub async fn get_login_url(provider: String) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log in with email and password through Strapi.
///
/// A denied login is not an error: it comes back as a failed [`SignInResult`].
#[cfg(feature = "server")]
#[post("/api/auth/credentials", session: tower_sessions::Session, ctx: AuthExtension)]
pub async fn login_credentials(email: String, password: String) -> Result<SignInResult, ServerFnError> {
    let credentials = models::Credentials::new(email.trim(), password);

    let token = match ctx.authorize_credentials(&credentials).await {
        Ok(Some(token)) => token,
        Ok(None) => return Ok(SignInResult::failure(ErrorCode::CredentialsSignin)),
        Err(e) => return Ok(SignInResult::failure(e.code())),
    };

    session
        .cycle_id()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    session
        .insert(auth::SESSION_TOKEN_KEY, token)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(SignInResult::success(ctx.redirect().resolve(None)))
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/credentials")]
pub async fn login_credentials(email: String, password: String) -> Result<SignInResult, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log out the current user by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/signout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    session
        .flush()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/signout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}
