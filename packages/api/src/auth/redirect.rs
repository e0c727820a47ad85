//! Application page paths and the post sign-in redirect.

/// Path every successful sign-in lands on.
pub const PROTECTED_PATH: &str = "/protected";

/// Sign-in page with the credentials form and the OAuth buttons.
pub const SIGN_IN_PATH: &str = "/auth/signin";

/// Error page, takes the code as `?error=`.
pub const ERROR_PATH: &str = "/auth/error";

/// Sends every completed sign-in to [`PROTECTED_PATH`] on this deployment,
/// whatever page the user started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPolicy {
    base_url: String,
}

impl RedirectPolicy {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Target URL after sign-in. The requested callback URL is ignored.
    pub fn resolve(&self, _requested: Option<&str>) -> String {
        format!("{}{}", self.base_url, PROTECTED_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_protected() {
        let policy = RedirectPolicy::new("http://localhost:8080");
        assert_eq!(policy.resolve(None), "http://localhost:8080/protected");
        assert_eq!(
            policy.resolve(Some("http://localhost:8080/auth/signin")),
            "http://localhost:8080/protected"
        );
        assert_eq!(
            policy.resolve(Some("https://evil.example.com/phish")),
            "http://localhost:8080/protected"
        );
    }

    #[test]
    fn test_appends_to_any_base() {
        for base in ["https://app.example.com", "http://127.0.0.1:3000", "https://x.io/sub"] {
            let policy = RedirectPolicy::new(base);
            assert_eq!(policy.resolve(None), format!("{}/protected", base));
        }
    }
}
