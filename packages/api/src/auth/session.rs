//! # Session token and client session
//!
//! A sign-in produces a [`SessionToken`] that is stored server-side in the
//! `tower-sessions` store under [`SESSION_TOKEN_KEY`]; the browser only holds
//! the signed session cookie. Two hooks move data between the layers:
//!
//! - [`SessionToken::refresh`] runs at sign-in with the freshly authenticated
//!   user and on every later session read without one. With a Strapi user it
//!   copies the Strapi JWT, user id and `blocked` flag into the token.
//! - [`Session::materialize`] builds the client-visible [`Session`] from the
//!   token: name, email, picture, Strapi JWT, Strapi user id and `blocked`.
//!
//! Both are plain field copies and idempotent.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ProviderKind;
use crate::models::SignedInUser;

/// Key for storing the [`SessionToken`] in the session.
pub const SESSION_TOKEN_KEY: &str = "session_token";

/// Key for the pending OAuth authorization (CSRF state + PKCE verifier).
pub const PENDING_OAUTH_KEY: &str = "oauth_pending";

/// Token persisted between requests for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub sub: String,
    pub provider: ProviderKind,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub strapi_token: Option<String>,
    pub strapi_user_id: Option<u64>,
    pub blocked: Option<bool>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Create the token for a sign-in that just completed.
    pub fn issue(
        user: &SignedInUser,
        provider: ProviderKind,
        now: DateTime<Utc>,
        max_age_secs: i64,
    ) -> Self {
        let mut token = Self {
            sub: user.subject(),
            provider,
            name: user.name().map(str::to_string),
            email: user.email().map(str::to_string),
            picture: user.image().map(str::to_string),
            strapi_token: None,
            strapi_user_id: None,
            blocked: None,
            issued_at: now,
            expires_at: now,
        };
        token.refresh(Some(user), now, max_age_secs);
        token
    }

    /// Token refresh hook.
    ///
    /// `user` is only present right after sign-in. Later calls leave the
    /// identity fields alone and just roll the expiry forward.
    pub fn refresh(&mut self, user: Option<&SignedInUser>, now: DateTime<Utc>, max_age_secs: i64) {
        match user {
            Some(SignedInUser::Strapi(user)) => {
                self.strapi_token = Some(user.strapi_token.clone());
                self.strapi_user_id = Some(user.id);
                self.blocked = Some(user.blocked);
            }
            Some(SignedInUser::OAuth(_)) => {
                self.strapi_token = None;
                self.strapi_user_id = None;
                self.blocked = None;
            }
            None => {}
        }
        self.expires_at = Duration::try_seconds(max_age_secs)
            .and_then(|age| now.checked_add_signed(age))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// User part of the client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub strapi_user_id: Option<u64>,
    pub blocked: Option<bool>,
}

/// Session object exposed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    pub strapi_token: Option<String>,
    pub expires: DateTime<Utc>,
}

impl Session {
    /// Session materialization hook.
    pub fn materialize(token: &SessionToken) -> Self {
        Self {
            user: SessionUser {
                name: token.name.clone(),
                email: token.email.clone(),
                image: token.picture.clone(),
                strapi_user_id: token.strapi_user_id,
                blocked: token.blocked,
            },
            strapi_token: token.strapi_token.clone(),
            expires: token.expires_at,
        }
    }

    /// Name shown in the UI, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.user
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.user.email.as_deref())
            .unwrap_or("Anonymous")
    }

    pub fn is_blocked(&self) -> bool {
        self.user.blocked.unwrap_or(false)
    }
}
