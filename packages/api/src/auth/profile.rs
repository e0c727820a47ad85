//! Userinfo payloads of the OAuth providers and their mapping to [`OAuthProfile`].

use serde::Deserialize;

use crate::models::OAuthProfile;

/// Google user info from `googleapis.com/oauth2/v2/userinfo`.
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl From<GoogleProfile> for OAuthProfile {
    fn from(p: GoogleProfile) -> Self {
        OAuthProfile {
            id: p.id,
            name: p.name,
            email: p.email,
            image: p.picture,
        }
    }
}

/// Discord user from `discord.com/api/users/@me`.
#[derive(Debug, Deserialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
}

const DISCORD_CDN: &str = "https://cdn.discordapp.com";

impl DiscordProfile {
    /// Avatar URL, or one of Discord's default avatars when none is set.
    pub fn image_url(&self) -> String {
        match &self.avatar {
            Some(hash) => {
                let format = if hash.starts_with("a_") { "gif" } else { "png" };
                format!("{}/avatars/{}/{}.{}", DISCORD_CDN, self.id, hash, format)
            }
            None => format!("{}/embed/avatars/{}.png", DISCORD_CDN, self.default_avatar_index()),
        }
    }

    // Users on the new username system have discriminator "0".
    fn default_avatar_index(&self) -> u64 {
        match self.discriminator.as_deref() {
            Some(d) if d != "0" => d.parse::<u64>().map(|n| n % 5).unwrap_or(0),
            _ => self.id.parse::<u64>().map(|id| (id >> 22) % 6).unwrap_or(0),
        }
    }
}

impl From<DiscordProfile> for OAuthProfile {
    fn from(p: DiscordProfile) -> Self {
        let image = Some(p.image_url());
        OAuthProfile {
            name: Some(p.global_name.clone().unwrap_or_else(|| p.username.clone())),
            id: p.id,
            email: p.email,
            image,
        }
    }
}

/// Auth0 user from `{issuer}/userinfo`.
#[derive(Debug, Deserialize)]
pub struct Auth0Profile {
    pub sub: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl From<Auth0Profile> for OAuthProfile {
    fn from(p: Auth0Profile) -> Self {
        OAuthProfile {
            id: p.sub,
            name: p.nickname,
            email: p.email,
            image: p.picture,
        }
    }
}
