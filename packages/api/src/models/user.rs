//! # User models produced by a successful sign-in
//!
//! Two sign-in pathways exist and each produces its own record:
//!
//! ## [`AuthenticatedUser`]
//!
//! Built by the Strapi credentials provider from a `/api/auth/local` response.
//! It carries the Strapi JWT (`strapi_token`) so the client can call the
//! Strapi API on the user's behalf, the numeric Strapi user id, and the
//! `blocked` flag as reported by Strapi.
//!
//! ## [`OAuthProfile`]
//!
//! Built from an OAuth provider's userinfo endpoint (Google, Discord, Auth0).
//! Provider ids are opaque strings and no Strapi fields exist.
//!
//! [`SignedInUser`] wraps either one and is what the session layer consumes.

use serde::{Deserialize, Serialize};

/// User returned by the Strapi credentials login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub strapi_token: String,
    pub blocked: bool,
}

/// Profile returned by an OAuth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthProfile {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// The freshly authenticated user handed to the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedInUser {
    Strapi(AuthenticatedUser),
    OAuth(OAuthProfile),
}

impl SignedInUser {
    /// Subject identifier stored in the session token.
    pub fn subject(&self) -> String {
        match self {
            SignedInUser::Strapi(user) => user.id.to_string(),
            SignedInUser::OAuth(profile) => profile.id.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SignedInUser::Strapi(user) => Some(&user.name),
            SignedInUser::OAuth(profile) => profile.name.as_deref(),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            SignedInUser::Strapi(user) => Some(&user.email),
            SignedInUser::OAuth(profile) => profile.email.as_deref(),
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            SignedInUser::Strapi(_) => None,
            SignedInUser::OAuth(profile) => profile.image.as_deref(),
        }
    }
}
