//! # Strapi credentials provider
//!
//! [`StrapiClient::authorize`] forwards an email/password pair to Strapi's
//! `POST /api/auth/local` and maps the reply:
//!
//! | Strapi reply | Result |
//! |--------------|--------|
//! | JSON body with a `user` object | `Ok(Some(AuthenticatedUser))` |
//! | JSON body without `user` | `Ok(None)`, the login is denied |
//! | transport error, non-JSON body | `Err(AuthError::Authorize)` |
//! | `user` without a numeric `id`, non-object body | `Err(AuthError::Authorize)` |
//! | non-2xx status, `check_status` on | `Err(AuthError::Authorize)` |
//!
//! With `check_status` off the status code is ignored and only the body
//! decides, matching older deployments. Errors never carry the underlying
//! cause; it is logged here and dropped.

use reqwest::Client;

use super::{AuthConfig, AuthError};
use crate::models::{AuthenticatedUser, BackendAuthResponse, Credentials, LocalAuthRequest};

/// Path of Strapi's local authentication endpoint.
const LOCAL_AUTH_PATH: &str = "/api/auth/local";

/// Client for the Strapi authentication API.
#[derive(Debug, Clone)]
pub struct StrapiClient {
    http: Client,
    backend_url: String,
    check_status: bool,
}

impl StrapiClient {
    pub fn new(http: Client, backend_url: impl Into<String>, check_status: bool) -> Self {
        Self {
            http,
            backend_url: backend_url.into(),
            check_status,
        }
    }

    pub fn from_config(http: Client, config: &AuthConfig) -> Self {
        Self::new(http, config.backend_url.clone(), config.check_status)
    }

    fn local_auth_url(&self) -> String {
        format!("{}{}", self.backend_url, LOCAL_AUTH_PATH)
    }

    /// Check credentials against Strapi.
    pub async fn authorize(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<AuthenticatedUser>, AuthError> {
        let response = self.login(credentials).await.map_err(|e| {
            tracing::error!("Authorize error: {}", e);
            AuthError::Authorize
        })?;

        match response.into_user() {
            Some(user) => {
                tracing::info!(user_id = user.id, "Strapi login succeeded");
                Ok(Some(user))
            }
            None => {
                tracing::warn!("No user found in Strapi response");
                Ok(None)
            }
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<BackendAuthResponse, String> {
        let response = self
            .http
            .post(self.local_auth_url())
            .json(&LocalAuthRequest::from(credentials))
            .send()
            .await
            .map_err(|e| format!("request to Strapi failed: {}", e))?;

        let status = response.status();
        if self.check_status && !status.is_success() {
            return Err(format!("Failed to fetch user, response status: {}", status));
        }

        response
            .json::<BackendAuthResponse>()
            .await
            .map_err(|e| format!("invalid Strapi response ({}): {}", status, e))
    }
}
