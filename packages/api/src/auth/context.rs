//! Shared authentication state handed to every request handler.

use std::collections::HashMap;

use chrono::Utc;
use reqwest::Client;
use tower_sessions::Session;

use super::{
    AuthConfig, AuthError, ErrorCode, OAuthClient, OAuthConfig, PendingAuthorization,
    ProviderInfo, ProviderKind, RedirectPolicy, SessionToken, StrapiClient, PENDING_OAUTH_KEY,
    SESSION_TOKEN_KEY,
};
use crate::models::{Credentials, SignedInUser};

/// Everything a request needs to sign a user in.
///
/// Built once at startup from [`AuthConfig`] and shared as
/// `axum::Extension<Arc<AuthContext>>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    config: AuthConfig,
    strapi: StrapiClient,
    oauth: HashMap<ProviderKind, OAuthClient>,
    redirect: RedirectPolicy,
}

impl AuthContext {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::Configuration(e.to_string()))?;

        let mut oauth = HashMap::new();
        for provider in ProviderKind::ALL.into_iter().filter(|p| p.is_oauth()) {
            match OAuthConfig::for_provider(provider, &config)? {
                Some(oauth_config) => {
                    oauth.insert(provider, OAuthClient::new(oauth_config, http.clone()));
                }
                None => tracing::debug!("{} provider not configured", provider.name()),
            }
        }

        Ok(Self {
            strapi: StrapiClient::from_config(http, &config),
            redirect: RedirectPolicy::new(config.base_url.clone()),
            oauth,
            config,
        })
    }

    pub fn redirect(&self) -> &RedirectPolicy {
        &self.redirect
    }

    /// OAuth handler for `provider`, if it is configured.
    pub fn oauth(&self, provider: ProviderKind) -> Result<&OAuthClient, AuthError> {
        self.oauth
            .get(&provider)
            .ok_or_else(|| AuthError::UnknownProvider(provider.id().to_string()))
    }

    /// Providers offered to the client, in display order.
    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.config
            .enabled_providers()
            .into_iter()
            .map(|p| p.info(&self.config.base_url))
            .collect()
    }

    /// Begin an OAuth sign-in: store the pending state in `session` and
    /// return the provider's authorization URL.
    pub async fn start_oauth(&self, session: &Session, provider: &str) -> Result<String, AuthError> {
        let kind = oauth_kind(provider)?;
        let (url, pending) = self.oauth(kind)?.authorize_url();
        session.insert(PENDING_OAUTH_KEY, pending).await?;
        Ok(url)
    }

    /// Finish an OAuth sign-in from the provider callback.
    ///
    /// The pending state is taken out of the session first, so a callback can
    /// only be completed once. On success the session id is cycled, the token
    /// is stored under [`SESSION_TOKEN_KEY`] and the redirect target returned.
    pub async fn complete_oauth(
        &self,
        session: &Session,
        provider: &str,
        code: &str,
        state: &str,
    ) -> Result<String, AuthError> {
        let kind = oauth_kind(provider)?;

        let pending: PendingAuthorization = session
            .remove(PENDING_OAUTH_KEY)
            .await?
            .ok_or(AuthError::InvalidState)?;

        let profile = self.oauth(kind)?.exchange_code(code, state, pending).await?;
        let token = self.issue(&SignedInUser::OAuth(profile), kind);

        session.cycle_id().await?;
        session.insert(SESSION_TOKEN_KEY, token).await?;

        Ok(self.redirect.resolve(None))
    }

    /// Credentials provider `authorize` step.
    ///
    /// `Ok(None)` means the login was denied.
    pub async fn authorize_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionToken>, AuthError> {
        let Some(user) = self.strapi.authorize(credentials).await? else {
            return Ok(None);
        };
        Ok(Some(self.issue(
            &SignedInUser::Strapi(user),
            ProviderKind::Credentials,
        )))
    }

    /// Issue a fresh session token for a completed sign-in.
    pub fn issue(&self, user: &SignedInUser, provider: ProviderKind) -> SessionToken {
        tracing::info!(provider = provider.id(), "login with {}", provider.name());
        SessionToken::issue(user, provider, Utc::now(), self.config.session_max_age_secs)
    }

    /// Roll an existing token forward, or `None` when it has expired.
    pub fn refresh(&self, mut token: SessionToken) -> Option<SessionToken> {
        let now = Utc::now();
        if token.is_expired(now) {
            return None;
        }
        token.refresh(None, now, self.config.session_max_age_secs);
        Some(token)
    }

    pub fn error_url(&self, code: ErrorCode) -> String {
        self.config.error_url(code)
    }
}

fn oauth_kind(provider: &str) -> Result<ProviderKind, AuthError> {
    ProviderKind::from_id(provider)
        .filter(|p| p.is_oauth())
        .ok_or_else(|| AuthError::UnknownProvider(provider.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use mockito::{Matcher, Mock, Server, ServerGuard};
    use tower_sessions::MemoryStore;

    fn context(backend_url: &str) -> AuthContext {
        let config = AuthConfig {
            backend_url: backend_url.to_string(),
            ..AuthConfig::default()
        };
        AuthContext::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_credentials_login_issues_token() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/local")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"user":{"id":7,"username":"ak","email":"a@b.com","blocked":true},"jwt":"tok"}"#,
            )
            .create_async()
            .await;

        let ctx = context(&server.url());
        let token = ctx
            .authorize_credentials(&Credentials::new("a@b.com", "123456"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(token.provider, ProviderKind::Credentials);
        assert_eq!(token.strapi_user_id, Some(7));
        assert_eq!(token.strapi_token.as_deref(), Some("tok"));
        assert_eq!(token.blocked, Some(true));
        assert!(ctx.refresh(token).is_some());
    }

    #[tokio::test]
    async fn test_denied_login_issues_nothing() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/local")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let ctx = context(&server.url());
        let result = ctx
            .authorize_credentials(&Credentials::new("a@b.com", "wrong"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_providers_only_lists_configured() {
        let config = AuthConfig {
            discord: super::super::ProviderCredentials {
                client_id: "d".to_string(),
                client_secret: "s".to_string(),
                issuer: None,
            },
            ..AuthConfig::default()
        };
        let ctx = AuthContext::new(config).unwrap();
        let ids: Vec<String> = ctx.providers().into_iter().map(|p| p.id).collect();

        assert_eq!(ids, vec!["discord", "strapi-credentials"]);
        assert!(ctx.oauth(ProviderKind::Google).is_err());
        assert!(ctx.oauth(ProviderKind::Discord).is_ok());
    }

    #[test]
    fn test_expired_token_is_dropped() {
        let ctx = context("http://localhost:1337");
        let user = SignedInUser::OAuth(crate::models::OAuthProfile {
            id: "1".to_string(),
            name: None,
            email: None,
            image: None,
        });
        let token = SessionToken::issue(&user, ProviderKind::Google, Utc::now(), -1);
        assert!(ctx.refresh(token).is_none());
    }

    #[test]
    fn test_redirect_goes_to_protected() {
        let ctx = context("http://localhost:1337");
        assert_eq!(ctx.redirect().resolve(None), "http://localhost:8080/protected");
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    /// Context with Auth0 pointed at `server` and Discord configured.
    fn oauth_context(server: &ServerGuard) -> AuthContext {
        let config = AuthConfig {
            auth0: super::super::ProviderCredentials {
                client_id: "a-id".to_string(),
                client_secret: "a-secret".to_string(),
                issuer: Some(server.url()),
            },
            discord: super::super::ProviderCredentials {
                client_id: "d-id".to_string(),
                client_secret: "d-secret".to_string(),
                issuer: None,
            },
            ..AuthConfig::default()
        };
        AuthContext::new(config).unwrap()
    }

    async fn mock_auth0(server: &mut ServerGuard) -> (Mock, Mock) {
        let token = server
            .mock("POST", "/oauth/token")
            .match_body(Matcher::UrlEncoded("code".into(), "the-code".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"at-1","token_type":"Bearer","expires_in":3600}"#)
            .expect(1)
            .create_async()
            .await;
        let userinfo = server
            .mock("GET", "/userinfo")
            .match_header("authorization", "Bearer at-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sub":"auth0|1","nickname":"ada","email":"ada@example.com"}"#)
            .expect(1)
            .create_async()
            .await;
        (token, userinfo)
    }

    async fn pending_state(session: &Session) -> String {
        let pending: PendingAuthorization = session.get(PENDING_OAUTH_KEY).await.unwrap().unwrap();
        pending.csrf_state
    }

    #[tokio::test]
    async fn test_oauth_callback_stores_token_and_cycles_id() {
        let mut server = Server::new_async().await;
        let (token_mock, userinfo_mock) = mock_auth0(&mut server).await;
        let ctx = oauth_context(&server);
        let session = session();

        let url = ctx.start_oauth(&session, "auth0").await.unwrap();
        assert!(url.starts_with(&format!("{}/authorize?", server.url())));
        session.save().await.unwrap();
        let anonymous_id = session.id().unwrap();
        let state = pending_state(&session).await;

        let target = ctx
            .complete_oauth(&session, "auth0", "the-code", &state)
            .await
            .unwrap();
        session.save().await.unwrap();

        token_mock.assert_async().await;
        userinfo_mock.assert_async().await;
        assert_eq!(target, "http://localhost:8080/protected");
        assert_ne!(session.id(), Some(anonymous_id));

        let token: SessionToken = session.get(SESSION_TOKEN_KEY).await.unwrap().unwrap();
        assert_eq!(token.provider, ProviderKind::Auth0);
        assert_eq!(token.sub, "auth0|1");
        assert_eq!(token.email.as_deref(), Some("ada@example.com"));
        assert!(token.strapi_token.is_none());
        assert!(session
            .get::<PendingAuthorization>(PENDING_OAUTH_KEY)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_oauth_callback_cannot_be_replayed() {
        let mut server = Server::new_async().await;
        let (token_mock, _userinfo_mock) = mock_auth0(&mut server).await;
        let ctx = oauth_context(&server);
        let session = session();

        ctx.start_oauth(&session, "auth0").await.unwrap();
        let state = pending_state(&session).await;
        ctx.complete_oauth(&session, "auth0", "the-code", &state)
            .await
            .unwrap();

        let err = ctx
            .complete_oauth(&session, "auth0", "the-code", &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidState));
        token_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_oauth_callback_for_other_provider_is_rejected() {
        let mut server = Server::new_async().await;
        let (token_mock, _userinfo_mock) = mock_auth0(&mut server).await;
        let ctx = oauth_context(&server);
        let session = session();

        ctx.start_oauth(&session, "auth0").await.unwrap();
        let state = pending_state(&session).await;

        let err = ctx
            .complete_oauth(&session, "discord", "the-code", &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidState));
        assert!(session
            .get::<SessionToken>(SESSION_TOKEN_KEY)
            .await
            .unwrap()
            .is_none());

        // The pending state was consumed by the failed attempt.
        let err = ctx
            .complete_oauth(&session, "auth0", "the-code", &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidState));
        assert!(!token_mock.matched_async().await);
    }

    #[tokio::test]
    async fn test_oauth_rejects_unknown_providers() {
        let server = Server::new_async().await;
        let ctx = oauth_context(&server);
        let session = session();

        for provider in ["github", "strapi-credentials", "google"] {
            let err = ctx.start_oauth(&session, provider).await.unwrap_err();
            assert!(matches!(err, AuthError::UnknownProvider(_)), "{}", provider);
        }
        let err = ctx
            .complete_oauth(&session, "github", "code", "state")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownProvider(_)));
    }
}
