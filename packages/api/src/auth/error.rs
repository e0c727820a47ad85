//! Authentication errors and the codes shown on the error page.

use serde::{Deserialize, Serialize};

/// Error code passed to the error page as `?error=<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Configuration,
    AccessDenied,
    OAuthSignin,
    OAuthCallback,
    CredentialsSignin,
    Authorize,
    SessionRequired,
    Default,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Configuration => "Configuration",
            ErrorCode::AccessDenied => "AccessDenied",
            ErrorCode::OAuthSignin => "OAuthSignin",
            ErrorCode::OAuthCallback => "OAuthCallback",
            ErrorCode::CredentialsSignin => "CredentialsSignin",
            ErrorCode::Authorize => "Authorize",
            ErrorCode::SessionRequired => "SessionRequired",
            ErrorCode::Default => "Default",
        }
    }

    /// Parse a query value. Unknown codes map to [`ErrorCode::Default`].
    pub fn from_query(value: &str) -> Self {
        match value {
            "Configuration" => ErrorCode::Configuration,
            "AccessDenied" => ErrorCode::AccessDenied,
            "OAuthSignin" => ErrorCode::OAuthSignin,
            "OAuthCallback" => ErrorCode::OAuthCallback,
            "CredentialsSignin" => ErrorCode::CredentialsSignin,
            "Authorize" => ErrorCode::Authorize,
            "SessionRequired" => ErrorCode::SessionRequired,
            _ => ErrorCode::Default,
        }
    }

    /// Message shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Configuration => "There is a problem with the server configuration.",
            ErrorCode::AccessDenied => "You do not have permission to sign in.",
            ErrorCode::OAuthSignin | ErrorCode::OAuthCallback => {
                "Try signing in with a different account."
            }
            ErrorCode::CredentialsSignin => {
                "Sign in failed. Check the details you provided are correct."
            }
            ErrorCode::Authorize => "Sign in is unavailable right now. Please try again later.",
            ErrorCode::SessionRequired => "Please sign in to access this page.",
            ErrorCode::Default => "Unable to sign in.",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a sign-in attempt, as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInResult {
    pub ok: bool,
    pub error: Option<ErrorCode>,
    /// Where the client should navigate next.
    pub url: Option<String>,
}

impl SignInResult {
    pub fn success(url: String) -> Self {
        Self {
            ok: true,
            error: None,
            url: Some(url),
        }
    }

    pub fn failure(code: ErrorCode) -> Self {
        Self {
            ok: false,
            error: Some(code),
            url: None,
        }
    }
}

/// Server-side authentication failures.
///
/// `Authorize` carries no detail. The cause is logged where it happens and
/// never returned to the caller.
#[cfg(feature = "server")]
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorize error")]
    Authorize,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("invalid or expired OAuth state")]
    InvalidState,
    #[error("OAuth exchange failed: {0}")]
    OAuth(String),
    #[error("session error: {0}")]
    Session(String),
}

#[cfg(feature = "server")]
impl AuthError {
    /// Code used when this error sends the user to the error page.
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::Authorize => ErrorCode::Authorize,
            AuthError::Configuration(_) => ErrorCode::Configuration,
            AuthError::UnknownProvider(_) => ErrorCode::OAuthSignin,
            AuthError::InvalidState | AuthError::OAuth(_) => ErrorCode::OAuthCallback,
            AuthError::Session(_) => ErrorCode::Default,
        }
    }
}

#[cfg(feature = "server")]
impl From<tower_sessions::session::Error> for AuthError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AuthError::Session(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_query() {
        for code in [
            ErrorCode::Configuration,
            ErrorCode::AccessDenied,
            ErrorCode::OAuthSignin,
            ErrorCode::OAuthCallback,
            ErrorCode::CredentialsSignin,
            ErrorCode::Authorize,
            ErrorCode::SessionRequired,
        ] {
            assert_eq!(ErrorCode::from_query(code.as_str()), code);
        }
        assert_eq!(ErrorCode::from_query("Nonsense"), ErrorCode::Default);
    }

    #[test]
    fn test_sign_in_result_json() {
        let value = serde_json::to_value(SignInResult::failure(ErrorCode::CredentialsSignin)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "ok": false, "error": "CredentialsSignin", "url": null })
        );
    }

    #[cfg(feature = "server")]
    #[test]
    fn test_authorize_error_has_no_detail() {
        assert_eq!(AuthError::Authorize.to_string(), "Authorize error");
        assert_eq!(AuthError::Authorize.code(), ErrorCode::Authorize);
    }
}
