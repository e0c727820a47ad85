//! Data models for the application.

mod strapi;
mod user;

pub use strapi::{BackendAuthResponse, BackendUser, Credentials, LocalAuthRequest};
pub use user::{AuthenticatedUser, OAuthProfile, SignedInUser};
