//! Wire types for Strapi's local authentication endpoint.

use serde::{Deserialize, Serialize};

use super::AuthenticatedUser;

/// Email and password typed into the sign-in form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request body for `POST /api/auth/local`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalAuthRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LocalAuthRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            identifier: &credentials.email,
            password: &credentials.password,
        }
    }
}

/// Response body of `POST /api/auth/local`.
///
/// Only the presence of `user` is checked. Strapi error bodies
/// (`{"data": null, "error": {...}}`) deserialize with `user: None`.
///
/// A `user` without a numeric `id`, or a body that is not a JSON object, fails
/// to deserialize and the login fails with a generic error instead of
/// signing in a half-formed user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendAuthResponse {
    #[serde(default)]
    pub user: Option<BackendUser>,
    #[serde(default)]
    pub jwt: String,
}

/// The `user` object inside a Strapi auth response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendUser {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub blocked: bool,
}

impl BackendAuthResponse {
    /// Map the response into an [`AuthenticatedUser`], or `None` when Strapi
    /// did not return a user.
    pub fn into_user(self) -> Option<AuthenticatedUser> {
        let user = self.user?;
        Some(AuthenticatedUser {
            id: user.id,
            name: user.username,
            email: user.email,
            strapi_token: self.jwt,
            blocked: user.blocked,
        })
    }
}
