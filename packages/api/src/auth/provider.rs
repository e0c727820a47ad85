//! Sign-in providers known to the application.

use serde::{Deserialize, Serialize};

/// Every sign-in pathway the application offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    Google,
    Discord,
    Auth0,
    #[serde(rename = "strapi-credentials")]
    Credentials,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Google,
        ProviderKind::Discord,
        ProviderKind::Auth0,
        ProviderKind::Credentials,
    ];

    /// Identifier used in routes (`/api/auth/callback/{id}`).
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::Discord => "discord",
            ProviderKind::Auth0 => "auth0",
            ProviderKind::Credentials => "strapi-credentials",
        }
    }

    /// Human readable name shown on the sign-in page.
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Google => "Google",
            ProviderKind::Discord => "Discord",
            ProviderKind::Auth0 => "Auth0",
            ProviderKind::Credentials => "Strapi Credentials",
        }
    }

    /// `"oauth"` or `"credentials"`.
    pub fn kind(self) -> &'static str {
        match self {
            ProviderKind::Credentials => "credentials",
            _ => "oauth",
        }
    }

    pub fn is_oauth(self) -> bool {
        self != ProviderKind::Credentials
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Describe this provider for a deployment served from `base_url`.
    pub fn info(self, base_url: &str) -> ProviderInfo {
        ProviderInfo {
            id: self.id().to_string(),
            name: self.name().to_string(),
            r#type: self.kind().to_string(),
            signin_url: format!("{}/api/auth/signin/{}", base_url, self.id()),
            callback_url: format!("{}/api/auth/callback/{}", base_url, self.id()),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Provider description safe to send to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub r#type: String,
    #[serde(rename = "signinUrl")]
    pub signin_url: String,
    #[serde(rename = "callbackUrl")]
    pub callback_url: String,
}

impl ProviderInfo {
    pub fn provider(&self) -> Option<ProviderKind> {
        ProviderKind::from_id(&self.id)
    }
}
