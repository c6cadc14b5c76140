//! Wire models for profile records as returned by the Discord HTTP API
//! (or an API-compatible proxy). All fields beyond the ID are optional;
//! unknown fields are ignored.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Discriminator between the two profile record shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Guild,
}

impl std::str::FromStr for EntityKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "user" => Ok(EntityKind::User),
            "guild" | "server" => Ok(EntityKind::Guild),
            _ => Err(anyhow!("Invalid kind '{s}'. Valid options: user, guild")),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::User => write!(f, "user"),
            EntityKind::Guild => write!(f, "guild"),
        }
    }
}

/// A user profile record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub username: String,
    /// Display name; falls back to username when absent.
    pub global_name: Option<String>,
    /// "0" for users migrated off the legacy discriminator system.
    pub discriminator: Option<String>,
    /// Image hash; an `a_` prefix marks an animated variant.
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub accent_color: Option<u32>,
    #[serde(default)]
    pub public_flags: u64,
    #[serde(default)]
    pub bot: bool,
    /// Recent-activity entries, when the upstream proxy supplies them.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// One recent-activity entry on a user profile.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    pub description: Option<String>,
    /// Freeform recency/streak line, e.g. "1d ago · 5x Streak".
    pub meta: Option<String>,
}

/// A guild (server) profile record, fetched with `with_counts=true`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GuildProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub icon: Option<String>,
    pub banner: Option<String>,
    pub splash: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub approximate_member_count: Option<u64>,
    pub approximate_presence_count: Option<u64>,
    pub premium_subscription_count: Option<u64>,
    pub owner_id: Option<String>,
    pub preferred_locale: Option<String>,
    pub verification_level: Option<u8>,
    pub mfa_level: Option<u8>,
    pub premium_tier: Option<u8>,
    pub nsfw_level: Option<u8>,
    pub vanity_url_code: Option<String>,
}

/// A fetched profile record of either kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Profile {
    User(UserProfile),
    Guild(GuildProfile),
}

impl Profile {
    pub fn kind(&self) -> EntityKind {
        match self {
            Profile::User(_) => EntityKind::User,
            Profile::Guild(_) => EntityKind::Guild,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Profile::User(u) => &u.id,
            Profile::Guild(g) => &g.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_and_displays() {
        assert_eq!("user".parse::<EntityKind>().unwrap(), EntityKind::User);
        assert_eq!("GUILD".parse::<EntityKind>().unwrap(), EntityKind::Guild);
        assert_eq!("server".parse::<EntityKind>().unwrap(), EntityKind::Guild);
        assert!("channel".parse::<EntityKind>().is_err());
        assert_eq!(EntityKind::Guild.to_string(), "guild");
    }

    #[test]
    fn user_deserializes_with_missing_fields() {
        let u: UserProfile =
            serde_json::from_str(r#"{"id":"611204110955446301","username":"not.unnamed"}"#)
                .unwrap();
        assert_eq!(u.display_name(), "not.unnamed");
        assert_eq!(u.public_flags, 0);
        assert!(u.avatar.is_none());
        assert!(u.activities.is_empty());
    }

    #[test]
    fn guild_deserializes_counts() {
        let g: GuildProfile = serde_json::from_str(
            r#"{"id":"1","name":"g","approximate_member_count":1234,
                "features":["COMMUNITY"],"verification_level":2}"#,
        )
        .unwrap();
        assert_eq!(g.approximate_member_count, Some(1234));
        assert_eq!(g.features, vec!["COMMUNITY"]);
        assert_eq!(g.verification_level, Some(2));
        assert!(g.vanity_url_code.is_none());
    }
}
