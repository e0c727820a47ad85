//! Authentication module: providers, sessions and the sign-in redirect.

mod config;
mod error;
mod profile;
mod provider;
mod redirect;
mod session;

#[cfg(feature = "server")]
mod context;
#[cfg(feature = "server")]
mod oauth;
#[cfg(feature = "server")]
mod store;
#[cfg(feature = "server")]
mod strapi;

pub use config::{
    AuthConfig, ProviderCredentials, DEFAULT_SESSION_DATABASE_URL, DEFAULT_SESSION_MAX_AGE_SECS,
    MAX_SESSION_MAX_AGE_SECS,
};
pub use error::{ErrorCode, SignInResult};
pub use profile::{Auth0Profile, DiscordProfile, GoogleProfile};
pub use provider::{ProviderInfo, ProviderKind};
pub use redirect::{RedirectPolicy, ERROR_PATH, PROTECTED_PATH, SIGN_IN_PATH};
pub use session::{Session, SessionToken, SessionUser, PENDING_OAUTH_KEY, SESSION_TOKEN_KEY};

#[cfg(feature = "server")]
pub use context::AuthContext;
#[cfg(feature = "server")]
pub use error::AuthError;
#[cfg(feature = "server")]
pub use oauth::{OAuthClient, OAuthConfig, PendingAuthorization};
#[cfg(feature = "server")]
pub use store::{connect_session_database, session_store, EXPIRED_SESSION_SWEEP};
#[cfg(feature = "server")]
pub use strapi::StrapiClient;
