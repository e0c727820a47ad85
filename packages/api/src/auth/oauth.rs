//! # OAuth 2.0 providers (Google, Discord, Auth0)
//!
//! All three use the Authorization Code flow with PKCE and only differ in
//! endpoints, scopes and the shape of their userinfo response.
//!
//! ## Types
//!
//! - [`OAuthConfig`]: typed `oauth2` endpoints and credentials for one provider,
//!   built from [`AuthConfig`].
//! - [`PendingAuthorization`]: CSRF state and PKCE verifier kept in the session
//!   between the redirect to the provider and the callback.
//! - [`OAuthClient`]: the per-provider handler.
//!
//! ## Flow
//!
//! 1. **[`authorize_url`](OAuthClient::authorize_url)**: builds the provider URL
//!    with a random PKCE challenge and CSRF state. The caller stores the returned
//!    [`PendingAuthorization`] in the session under
//!    [`PENDING_OAUTH_KEY`](super::PENDING_OAUTH_KEY).
//!
//! 2. **[`exchange_code`](OAuthClient::exchange_code)**: called from the
//!    `/api/auth/callback/{provider}` route. It checks the returned state against
//!    the pending one, exchanges the code + verifier for an access token and
//!    fetches the userinfo endpoint, returning an [`OAuthProfile`].

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{
    AuthConfig, AuthError, Auth0Profile, DiscordProfile, GoogleProfile, ProviderCredentials,
    ProviderKind,
};
use crate::models::OAuthProfile;

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub provider: ProviderKind,
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub userinfo_url: String,
    pub redirect_url: RedirectUrl,
    pub scopes: Vec<&'static str>,
}

impl OAuthConfig {
    /// Build the configuration for `provider`, or `None` when it has no client id.
    pub fn for_provider(
        provider: ProviderKind,
        config: &AuthConfig,
    ) -> Result<Option<Self>, AuthError> {
        let Some(credentials) = config.provider_credentials(provider) else {
            return Ok(None);
        };
        if !credentials.is_configured() {
            return Ok(None);
        }

        let redirect = format!("{}/api/auth/callback/{}", config.base_url, provider.id());
        let (auth, token, userinfo, scopes) = endpoints(provider, credentials)?;

        Ok(Some(Self {
            provider,
            client_id: ClientId::new(credentials.client_id.clone()),
            client_secret: ClientSecret::new(credentials.client_secret.clone()),
            auth_url: AuthUrl::new(auth).map_err(|e| AuthError::Configuration(e.to_string()))?,
            token_url: TokenUrl::new(token).map_err(|e| AuthError::Configuration(e.to_string()))?,
            userinfo_url: userinfo,
            redirect_url: RedirectUrl::new(redirect)
                .map_err(|e| AuthError::Configuration(e.to_string()))?,
            scopes,
        }))
    }
}

/// Authorization, token and userinfo endpoints plus scopes for `provider`.
fn endpoints(
    provider: ProviderKind,
    credentials: &ProviderCredentials,
) -> Result<(String, String, String, Vec<&'static str>), AuthError> {
    Ok(match provider {
        ProviderKind::Google => (
            "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            "https://oauth2.googleapis.com/token".to_string(),
            "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            vec!["openid", "email", "profile"],
        ),
        ProviderKind::Discord => (
            "https://discord.com/api/oauth2/authorize".to_string(),
            "https://discord.com/api/oauth2/token".to_string(),
            "https://discord.com/api/users/@me".to_string(),
            vec!["identify", "email"],
        ),
        ProviderKind::Auth0 => {
            let issuer = credentials
                .issuer
                .as_deref()
                .map(normalize_issuer)
                .ok_or_else(|| AuthError::Configuration("AUTH0_ISSUER not set".to_string()))?;
            (
                format!("{}/authorize", issuer),
                format!("{}/oauth/token", issuer),
                format!("{}/userinfo", issuer),
                vec!["openid", "email", "profile"],
            )
        }
        ProviderKind::Credentials => {
            return Err(AuthError::UnknownProvider(provider.id().to_string()))
        }
    })
}

fn normalize_issuer(issuer: &str) -> String {
    let issuer = issuer.trim().trim_end_matches('/');
    if issuer.starts_with("http://") || issuer.starts_with("https://") {
        issuer.to_string()
    } else {
        format!("https://{}", issuer)
    }
}

/// State kept between the redirect to the provider and its callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub provider: ProviderKind,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// OAuth handler for one provider.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: Client,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig, http: Client) -> Self {
        Self { config, http }
    }

    fn create_client(&self) -> ConfiguredClient {
        BasicClient::new(self.config.client_id.clone())
            .set_client_secret(self.config.client_secret.clone())
            .set_auth_uri(self.config.auth_url.clone())
            .set_token_uri(self.config.token_url.clone())
            .set_redirect_uri(self.config.redirect_url.clone())
    }

    /// Generate the authorization URL with PKCE.
    pub fn authorize_url(&self) -> (String, PendingAuthorization) {
        let client = self.create_client();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in &self.config.scopes {
            request = request.add_scope(Scope::new(scope.to_string()));
        }
        let (auth_url, csrf_state) = request.set_pkce_challenge(pkce_challenge).url();

        let pending = PendingAuthorization {
            provider: self.config.provider,
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };
        (auth_url.to_string(), pending)
    }

    /// Exchange the authorization code and fetch the user's profile.
    pub async fn exchange_code(
        &self,
        code: &str,
        state: &str,
        pending: PendingAuthorization,
    ) -> Result<OAuthProfile, AuthError> {
        if pending.provider != self.config.provider || pending.csrf_state != state {
            return Err(AuthError::InvalidState);
        }

        // Token endpoints must not be followed through redirects.
        let token_http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::OAuth(e.to_string()))?;

        let token_result = self
            .create_client()
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier))
            .request_async(&token_http)
            .await
            .map_err(|e| AuthError::OAuth(format!("Token exchange failed: {}", e)))?;

        let access_token = token_result.access_token().secret();

        let response = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::OAuth(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::OAuth(e.to_string()))?;

        let profile = match self.config.provider {
            ProviderKind::Google => response.json::<GoogleProfile>().await.map(OAuthProfile::from),
            ProviderKind::Discord => response.json::<DiscordProfile>().await.map(OAuthProfile::from),
            ProviderKind::Auth0 => response.json::<Auth0Profile>().await.map(OAuthProfile::from),
            ProviderKind::Credentials => {
                return Err(AuthError::UnknownProvider(self.config.provider.id().to_string()))
            }
        }
        .map_err(|e| AuthError::OAuth(e.to_string()))?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config_with(vars: &[(&str, &str)]) -> AuthConfig {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AuthConfig::from_lookup(move |key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[test]
    fn test_unconfigured_provider_is_skipped() {
        let config = AuthConfig::default();
        assert!(OAuthConfig::for_provider(ProviderKind::Google, &config)
            .unwrap()
            .is_none());
        assert!(OAuthConfig::for_provider(ProviderKind::Credentials, &config)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_auth0_endpoints_from_issuer() {
        let config = config_with(&[
            ("AUTH0_CLIENT_ID", "id"),
            ("AUTH0_CLIENT_SECRET", "secret"),
            ("AUTH0_ISSUER", "tenant.auth0.com/"),
        ]);
        let oauth = OAuthConfig::for_provider(ProviderKind::Auth0, &config)
            .unwrap()
            .unwrap();

        assert_eq!(oauth.auth_url.as_str(), "https://tenant.auth0.com/authorize");
        assert_eq!(oauth.token_url.as_str(), "https://tenant.auth0.com/oauth/token");
        assert_eq!(oauth.userinfo_url, "https://tenant.auth0.com/userinfo");
        assert_eq!(
            oauth.redirect_url.as_str(),
            "http://localhost:8080/api/auth/callback/auth0"
        );
    }

    #[test]
    fn test_auth0_requires_issuer() {
        let config = config_with(&[("AUTH0_CLIENT_ID", "id")]);
        assert!(matches!(
            OAuthConfig::for_provider(ProviderKind::Auth0, &config),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_authorize_url_carries_pkce_and_state() {
        let config = config_with(&[
            ("DISCORD_CLIENT_ID", "discord-id"),
            ("DISCORD_CLIENT_SECRET", "discord-secret"),
        ]);
        let oauth = OAuthConfig::for_provider(ProviderKind::Discord, &config)
            .unwrap()
            .unwrap();
        let client = OAuthClient::new(oauth, Client::new());

        let (url, pending) = client.authorize_url();

        assert!(url.starts_with("https://discord.com/api/oauth2/authorize?"));
        assert!(url.contains("client_id=discord-id"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains(&format!("state={}", pending.csrf_state)));
        assert!(url.contains("scope=identify+email"));
        assert!(!url.contains("discord-secret"));
        assert_eq!(pending.provider, ProviderKind::Discord);
    }

    #[tokio::test]
    async fn test_state_mismatch_is_rejected() {
        let config = config_with(&[("GOOGLE_CLIENT_ID", "g"), ("GOOGLE_CLIENT_SECRET", "s")]);
        let oauth = OAuthConfig::for_provider(ProviderKind::Google, &config)
            .unwrap()
            .unwrap();
        let client = OAuthClient::new(oauth, Client::new());
        let (_, pending) = client.authorize_url();

        let err = client
            .exchange_code("code", "forged-state", pending)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidState));
    }

    #[tokio::test]
    async fn test_exchange_fetches_profile() {
        let mut server = Server::new_async().await;
        let token_mock = server
            .mock("POST", "/oauth/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("code".into(), "the-code".into()),
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"at-1","token_type":"Bearer","expires_in":3600}"#)
            .create_async()
            .await;
        let userinfo_mock = server
            .mock("GET", "/userinfo")
            .match_header("authorization", "Bearer at-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sub":"auth0|1","nickname":"ada","email":"ada@example.com","picture":null}"#)
            .create_async()
            .await;

        let issuer = server.url();
        let config = config_with(&[
            ("AUTH0_CLIENT_ID", "id"),
            ("AUTH0_CLIENT_SECRET", "secret"),
            ("AUTH0_ISSUER", issuer.as_str()),
        ]);
        let oauth = OAuthConfig::for_provider(ProviderKind::Auth0, &config)
            .unwrap()
            .unwrap();
        let client = OAuthClient::new(oauth, Client::new());
        let (_, pending) = client.authorize_url();
        let state = pending.csrf_state.clone();

        let profile = client.exchange_code("the-code", &state, pending).await.unwrap();

        token_mock.assert_async().await;
        userinfo_mock.assert_async().await;
        assert_eq!(
            profile,
            OAuthProfile {
                id: "auth0|1".to_string(),
                name: Some("ada".to_string()),
                email: Some("ada@example.com".to_string()),
                image: None,
            }
        );
    }
}
