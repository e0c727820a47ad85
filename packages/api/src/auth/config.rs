//! # Authentication configuration
//!
//! [`AuthConfig`] is built once at startup and shared with every handler
//! through [`AuthContext`](super::AuthContext). Values come from the process
//! environment (and a `.env` file via `dotenvy` on the server):
//!
//! | Variable | Default |
//! |----------|---------|
//! | `AUTH_URL` / `NEXTAUTH_URL` | `http://localhost:8080` |
//! | `AUTH_SECRET` / `NEXTAUTH_SECRET` | unset, a random signing key is generated |
//! | `BACKEND_URL` | `http://localhost:1337` |
//! | `STRAPI_CHECK_STATUS` | `true` |
//! | `SESSION_MAX_AGE_SECS` | `2592000` (30 days), at most a century |
//! | `SESSION_DATABASE_URL` | `sqlite::memory:` |
//! | `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` | empty |
//! | `DISCORD_CLIENT_ID`, `DISCORD_CLIENT_SECRET` | empty |
//! | `AUTH0_CLIENT_ID`, `AUTH0_CLIENT_SECRET`, `AUTH0_ISSUER` | empty |
//!
//! Provider credentials are passed through as given. An OAuth provider with an
//! empty client id is simply not offered.

use super::{ProviderKind, ERROR_PATH};

/// Thirty days, the default lifetime of a session.
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Upper bound for `SESSION_MAX_AGE_SECS`. Expiry timestamps stay
/// representable for both `chrono` and the session cookie.
pub const MAX_SESSION_MAX_AGE_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Session records live in an in-memory SQLite database unless configured.
pub const DEFAULT_SESSION_DATABASE_URL: &str = "sqlite::memory:";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_BACKEND_URL: &str = "http://localhost:1337";

/// Client id / secret pair for one OAuth provider.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// Only used by Auth0.
    pub issuer: Option<String>,
}

impl ProviderCredentials {
    pub fn is_configured(&self) -> bool {
        !self.client_id.trim().is_empty()
    }
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Process-wide authentication settings.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Public URL of this deployment, without a trailing slash.
    pub base_url: String,
    /// Strapi base URL, without a trailing slash.
    pub backend_url: String,
    pub secret: Option<String>,
    /// Treat non-2xx Strapi responses as authorization failures.
    pub check_status: bool,
    pub session_max_age_secs: i64,
    /// `sqlx` SQLite URL of the session store.
    pub session_database_url: String,
    pub google: ProviderCredentials,
    pub discord: ProviderCredentials,
    pub auth0: ProviderCredentials,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("base_url", &self.base_url)
            .field("backend_url", &self.backend_url)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("check_status", &self.check_status)
            .field("session_max_age_secs", &self.session_max_age_secs)
            .field("session_database_url", &self.session_database_url)
            .field("google", &self.google)
            .field("discord", &self.discord)
            .field("auth0", &self.auth0)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            secret: None,
            check_status: true,
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            session_database_url: DEFAULT_SESSION_DATABASE_URL.to_string(),
            google: ProviderCredentials::default(),
            discord: ProviderCredentials::default(),
            auth0: ProviderCredentials::default(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from the environment, reading `.env` first.
    #[cfg(feature = "server")]
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let base_url = get("AUTH_URL")
            .or_else(|| get("NEXTAUTH_URL"))
            .map(|url| trim_url(&url))
            .unwrap_or(defaults.base_url);
        let backend_url = get("BACKEND_URL")
            .map(|url| trim_url(&url))
            .unwrap_or(defaults.backend_url);
        let secret = get("AUTH_SECRET").or_else(|| get("NEXTAUTH_SECRET"));

        let check_status = match get("STRAPI_CHECK_STATUS") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| format!("STRAPI_CHECK_STATUS is not a boolean: {}", value))?,
            None => defaults.check_status,
        };

        let session_max_age_secs = match get("SESSION_MAX_AGE_SECS") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| (1..=MAX_SESSION_MAX_AGE_SECS).contains(secs))
                .ok_or_else(|| {
                    format!(
                        "SESSION_MAX_AGE_SECS must be between 1 and {}: {}",
                        MAX_SESSION_MAX_AGE_SECS, value
                    )
                })?,
            None => defaults.session_max_age_secs,
        };
        let session_database_url = get("SESSION_DATABASE_URL")
            .map(|url| url.trim().to_string())
            .unwrap_or(defaults.session_database_url);

        let credentials = |prefix: &str| ProviderCredentials {
            client_id: lookup(&format!("{}_CLIENT_ID", prefix)).unwrap_or_default(),
            client_secret: lookup(&format!("{}_CLIENT_SECRET", prefix)).unwrap_or_default(),
            issuer: get(&format!("{}_ISSUER", prefix)),
        };

        Ok(Self {
            base_url,
            backend_url,
            secret,
            check_status,
            session_max_age_secs,
            session_database_url,
            google: credentials("GOOGLE"),
            discord: credentials("DISCORD"),
            auth0: credentials("AUTH0"),
        })
    }

    /// Credentials for an OAuth provider; `None` for the credentials provider.
    pub fn provider_credentials(&self, provider: ProviderKind) -> Option<&ProviderCredentials> {
        match provider {
            ProviderKind::Google => Some(&self.google),
            ProviderKind::Discord => Some(&self.discord),
            ProviderKind::Auth0 => Some(&self.auth0),
            ProviderKind::Credentials => None,
        }
    }

    /// Providers offered on the sign-in page, in display order.
    pub fn enabled_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|p| match self.provider_credentials(*p) {
                Some(credentials) => credentials.is_configured(),
                None => true,
            })
            .collect()
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn use_secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Absolute URL of the error page for `code`.
    pub fn error_url(&self, code: super::ErrorCode) -> String {
        format!("{}{}?error={}", self.base_url, ERROR_PATH, code.as_str())
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AuthConfig::default());
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.backend_url, "http://localhost:1337");
        assert!(config.check_status);
        assert_eq!(config.enabled_providers(), vec![ProviderKind::Credentials]);
    }

    #[test]
    fn test_reads_provider_credentials() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("NEXTAUTH_URL", "https://app.example.com/"),
            ("BACKEND_URL", "https://cms.example.com/"),
            ("GOOGLE_CLIENT_ID", "g-id"),
            ("GOOGLE_CLIENT_SECRET", "g-secret"),
            ("AUTH0_CLIENT_ID", "a-id"),
            ("AUTH0_CLIENT_SECRET", "a-secret"),
            ("AUTH0_ISSUER", "tenant.eu.auth0.com"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://app.example.com");
        assert_eq!(config.backend_url, "https://cms.example.com");
        assert!(config.use_secure_cookies());
        assert_eq!(config.google.client_secret, "g-secret");
        assert_eq!(config.auth0.issuer.as_deref(), Some("tenant.eu.auth0.com"));
        assert_eq!(
            config.enabled_providers(),
            vec![ProviderKind::Google, ProviderKind::Auth0, ProviderKind::Credentials]
        );
    }

    #[test]
    fn test_auth_url_wins_over_nextauth_url() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("AUTH_URL", "http://a.test"),
            ("NEXTAUTH_URL", "http://b.test"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://a.test");
    }

    #[test]
    fn test_status_check_toggle() {
        let config =
            AuthConfig::from_lookup(lookup(&[("STRAPI_CHECK_STATUS", "false")])).unwrap();
        assert!(!config.check_status);

        let err = AuthConfig::from_lookup(lookup(&[("STRAPI_CHECK_STATUS", "maybe")]));
        assert!(err.is_err());
    }

    #[test]
    fn test_invalid_max_age() {
        assert!(AuthConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", "soon")])).is_err());
        assert!(AuthConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", "0")])).is_err());

        let config =
            AuthConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", "3600")])).unwrap();
        assert_eq!(config.session_max_age_secs, 3600);
    }

    #[test]
    fn test_max_age_upper_bound() {
        let huge = i64::MAX.to_string();
        assert!(AuthConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", &huge)])).is_err());

        let above = (MAX_SESSION_MAX_AGE_SECS + 1).to_string();
        assert!(AuthConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", &above)])).is_err());

        let limit = MAX_SESSION_MAX_AGE_SECS.to_string();
        let config = AuthConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", &limit)])).unwrap();
        assert_eq!(config.session_max_age_secs, MAX_SESSION_MAX_AGE_SECS);
        assert!(chrono::Duration::try_seconds(config.session_max_age_secs)
            .and_then(|age| chrono::Utc::now().checked_add_signed(age))
            .is_some());
    }

    #[test]
    fn test_session_database_url() {
        let config = AuthConfig::default();
        assert_eq!(config.session_database_url, "sqlite::memory:");

        let config = AuthConfig::from_lookup(lookup(&[(
            "SESSION_DATABASE_URL",
            "sqlite://sessions.db?mode=rwc",
        )]))
        .unwrap();
        assert_eq!(config.session_database_url, "sqlite://sessions.db?mode=rwc");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("AUTH_SECRET", "top-secret-value"),
            ("DISCORD_CLIENT_ID", "d-id"),
            ("DISCORD_CLIENT_SECRET", "d-secret"),
        ]))
        .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("top-secret-value"));
        assert!(!printed.contains("d-secret"));
        assert!(printed.contains("d-id"));
    }

    #[test]
    fn test_error_url() {
        let config = AuthConfig::default();
        assert_eq!(
            config.error_url(super::super::ErrorCode::OAuthCallback),
            "http://localhost:8080/auth/error?error=OAuthCallback"
        );
    }
}
