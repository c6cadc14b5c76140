//! Resource resolution: CDN image URLs, badge bitmask decoding, and
//! deterministic fallbacks for entities without uploaded art.

use crate::models::{GuildProfile, UserProfile};
use crate::snowflake;
use crate::util_text::{accent_color_css, title_case_token};

pub const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Image hash prefix marking that an animated (GIF) variant exists.
const ANIMATED_MARKER: &str = "a_";

/// A resolved CDN image: the static form always exists, the animated form
/// only when the image hash carries the animated marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CdnImage {
    pub still: String,
    pub animated: Option<String>,
}

impl CdnImage {
    fn from_hash(path: &str, hash: &str, size: u16) -> Self {
        let base = format!("{CDN_BASE}/{path}/{hash}");
        let animated = hash
            .starts_with(ANIMATED_MARKER)
            .then(|| format!("{base}.gif?size={size}"));
        Self {
            still: format!("{base}.webp?size={size}"),
            animated,
        }
    }
}

/// Resolved avatar or guild icon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconSource {
    Image(CdnImage),
    /// Stock embed avatar, index into the fixed default set.
    DefaultIndex(u8),
    /// Letter glyph on a deterministic gradient (guilds without an icon).
    Glyph { letter: char, gradient: usize },
}

/// Resolved banner area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BannerSource {
    Image(CdnImage),
    /// Solid accent color, CSS hex form.
    Color(String),
    /// Index into [`GRADIENTS`].
    Gradient(usize),
}

/// Fixed fallback gradient palette. Any palette is acceptable as long as the
/// selection is stable per ID.
pub const GRADIENTS: [(&str, &str); 6] = [
    ("#5865f2", "#3b428f"),
    ("#e38e2b", "#8f5210"),
    ("#3ba55d", "#1f5c33"),
    ("#ed4245", "#8f2022"),
    ("#9b59b6", "#5b2c6f"),
    ("#49a8b8", "#205963"),
];

/// Stable gradient index for an entity: numeric ID modulo palette size.
/// Unparseable IDs collapse to slot 0.
pub fn gradient_index(id: &str) -> usize {
    match snowflake::parse(id) {
        Some(n) => (n % GRADIENTS.len() as u64) as usize,
        None => 0,
    }
}

/// One entry in the ordered public-badge table.
#[derive(Debug, PartialEq, Eq)]
pub struct BadgeSpec {
    pub flag: u64,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Public user badges in display order. Output order follows this table,
/// not bit value.
pub const BADGES: [BadgeSpec; 12] = [
    BadgeSpec { flag: 1 << 0, label: "Discord Staff", icon: "https://cdn.discordapp.com/badge-icons/5e74e9b61934fc1f67c65515d1f7e60d.png" },
    BadgeSpec { flag: 1 << 1, label: "Partnered Server Owner", icon: "https://cdn.discordapp.com/badge-icons/3f9748e53446a137a052f3454e2de41e.png" },
    BadgeSpec { flag: 1 << 2, label: "HypeSquad Events", icon: "https://cdn.discordapp.com/badge-icons/bf01d1073931f921909045f3a39fd264.png" },
    BadgeSpec { flag: 1 << 3, label: "Bug Hunter", icon: "https://cdn.discordapp.com/badge-icons/2717692c7dca7289b35297368a940dd0.png" },
    BadgeSpec { flag: 1 << 6, label: "HypeSquad Bravery", icon: "https://cdn.discordapp.com/badge-icons/8a88d63823d8a71cd5e390baa45efa02.png" },
    BadgeSpec { flag: 1 << 7, label: "HypeSquad Brilliance", icon: "https://cdn.discordapp.com/badge-icons/011940fd013da3f7fb926e4a1cd2e618.png" },
    BadgeSpec { flag: 1 << 8, label: "HypeSquad Balance", icon: "https://cdn.discordapp.com/badge-icons/3aa41de486fa12454c3761e8e223442e.png" },
    BadgeSpec { flag: 1 << 9, label: "Early Supporter", icon: "https://cdn.discordapp.com/badge-icons/7060786766c9c840eb3019e725d2b358.png" },
    BadgeSpec { flag: 1 << 14, label: "Bug Hunter Gold", icon: "https://cdn.discordapp.com/badge-icons/848f79194d4be5ff5f81505cbd0ce1e6.png" },
    BadgeSpec { flag: 1 << 17, label: "Early Verified Bot Developer", icon: "https://cdn.discordapp.com/badge-icons/6df5892e0f35b866ef80b7f4464cc46b.png" },
    BadgeSpec { flag: 1 << 18, label: "Moderator Programs Alumni", icon: "https://cdn.discordapp.com/badge-icons/fee1624003e2fee35cb398e125dc479b.png" },
    BadgeSpec { flag: 1 << 22, label: "Active Developer", icon: "https://cdn.discordapp.com/badge-icons/6bdc42827a38498929a4920da12695d9.png" },
];

/// Decode a public-flags bitmask into the matching badge entries, table order.
pub fn badges_for(flags: u64) -> Vec<&'static BadgeSpec> {
    BADGES.iter().filter(|b| flags & b.flag != 0).collect()
}

/// Known guild feature tokens with human descriptions. Tokens outside the
/// table fall back to a generated generic description.
const GUILD_FEATURE_INFO: [(&str, &str); 12] = [
    ("COMMUNITY", "Community server with welcome screen and discovery eligibility"),
    ("VERIFIED", "Officially verified server"),
    ("PARTNERED", "Discord partner program member"),
    ("DISCOVERABLE", "Listed in server discovery"),
    ("ANIMATED_ICON", "Can upload an animated server icon"),
    ("ANIMATED_BANNER", "Can upload an animated server banner"),
    ("BANNER", "Can upload a server banner image"),
    ("INVITE_SPLASH", "Custom background on invite pages"),
    ("VANITY_URL", "Custom discord.gg invite code"),
    ("WELCOME_SCREEN_ENABLED", "Shows a welcome screen to new members"),
    ("NEWS", "Can publish announcement channels"),
    ("AUTO_MODERATION", "Automatic content moderation rules"),
];

/// Display name and description for a guild feature token.
pub fn feature_info(token: &str) -> (String, String) {
    let name = title_case_token(token);
    let info = GUILD_FEATURE_INFO
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, d)| (*d).to_string())
        .unwrap_or_else(|| format!("Server capability: {name}"));
    (name, info)
}

/// Resolve a user's avatar, falling back to the stock embed avatar derived
/// from the numeric discriminator.
pub fn user_avatar(user: &UserProfile) -> IconSource {
    match &user.avatar {
        Some(hash) => IconSource::Image(CdnImage::from_hash(
            &format!("avatars/{}", user.id),
            hash,
            256,
        )),
        None => {
            let disc = user
                .discriminator
                .as_deref()
                .and_then(|d| d.parse::<u16>().ok())
                .unwrap_or(0);
            IconSource::DefaultIndex((disc % 5) as u8)
        }
    }
}

/// URL of a stock embed avatar.
pub fn default_avatar_url(index: u8) -> String {
    format!("{CDN_BASE}/embed/avatars/{index}.png")
}

/// Resolve a user's banner: image hash, else accent color, else gradient.
pub fn user_banner(user: &UserProfile) -> BannerSource {
    match &user.banner {
        Some(hash) => BannerSource::Image(CdnImage::from_hash(
            &format!("banners/{}", user.id),
            hash,
            480,
        )),
        None => match accent_color_css(user.accent_color) {
            Some(color) => BannerSource::Color(color),
            None => BannerSource::Gradient(gradient_index(&user.id)),
        },
    }
}

/// Resolve a guild icon, falling back to a letter glyph on a stable gradient.
pub fn guild_icon(guild: &GuildProfile) -> IconSource {
    match &guild.icon {
        Some(hash) => IconSource::Image(CdnImage::from_hash(
            &format!("icons/{}", guild.id),
            hash,
            256,
        )),
        None => IconSource::Glyph {
            letter: guild
                .name
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or('?'),
            gradient: gradient_index(&guild.id),
        },
    }
}

/// Resolve a guild banner: banner hash, else invite splash, else gradient.
pub fn guild_banner(guild: &GuildProfile) -> BannerSource {
    if let Some(hash) = &guild.banner {
        return BannerSource::Image(CdnImage::from_hash(
            &format!("banners/{}", guild.id),
            hash,
            480,
        ));
    }
    if let Some(hash) = &guild.splash {
        return BannerSource::Image(CdnImage::from_hash(
            &format!("splashes/{}", guild.id),
            hash,
            480,
        ));
    }
    BannerSource::Gradient(gradient_index(&guild.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            username: "tester".into(),
            ..Default::default()
        }
    }

    #[test]
    fn animated_hash_yields_both_urls() {
        let mut u = user("611204110955446301");
        u.avatar = Some("a_ed042603a7540b0b5cc4cf15939fab36".into());
        match user_avatar(&u) {
            IconSource::Image(img) => {
                assert_eq!(
                    img.still,
                    "https://cdn.discordapp.com/avatars/611204110955446301/a_ed042603a7540b0b5cc4cf15939fab36.webp?size=256"
                );
                assert_eq!(
                    img.animated.as_deref(),
                    Some("https://cdn.discordapp.com/avatars/611204110955446301/a_ed042603a7540b0b5cc4cf15939fab36.gif?size=256")
                );
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn static_hash_yields_still_only() {
        let mut u = user("1");
        u.avatar = Some("fe41777157caa0d313ff34558c1bfe3c".into());
        match user_avatar(&u) {
            IconSource::Image(img) => assert!(img.animated.is_none()),
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn missing_avatar_uses_discriminator_index() {
        let mut u = user("42");
        u.discriminator = Some("9531".into());
        assert_eq!(user_avatar(&u), IconSource::DefaultIndex((9531 % 5) as u8));

        // Migrated users ("0") and absent discriminators land on index 0
        u.discriminator = Some("0".into());
        assert_eq!(user_avatar(&u), IconSource::DefaultIndex(0));
        u.discriminator = None;
        assert_eq!(user_avatar(&u), IconSource::DefaultIndex(0));
    }

    #[test]
    fn banner_fallback_chain() {
        let mut u = user("12");
        u.accent_color = Some(0xe38e2b);
        assert_eq!(user_banner(&u), BannerSource::Color("#e38e2b".into()));

        u.accent_color = None;
        assert_eq!(user_banner(&u), BannerSource::Gradient(12 % GRADIENTS.len()));

        u.banner = Some("58f215ca99acd3b6b8bce25cc1515e1c".into());
        assert!(matches!(user_banner(&u), BannerSource::Image(_)));
    }

    #[test]
    fn gradient_is_stable_per_id() {
        assert_eq!(gradient_index("100"), gradient_index("100"));
        assert_eq!(gradient_index("100"), (100 % GRADIENTS.len() as u64) as usize);
        assert_eq!(gradient_index("not numeric"), 0);
    }

    #[test]
    fn badge_decoding_follows_table_order() {
        // Balance (1<<8) has a lower table position than Early Supporter (1<<9)
        let flags = (1 << 9) | (1 << 8) | (1 << 22);
        let badges = badges_for(flags);
        let labels: Vec<_> = badges.iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            vec!["HypeSquad Balance", "Early Supporter", "Active Developer"]
        );
    }

    #[test]
    fn zero_flags_decode_to_empty() {
        assert!(badges_for(0).is_empty());
    }

    #[test]
    fn guild_fallbacks() {
        let g = GuildProfile {
            id: "7".into(),
            name: "rust corner".into(),
            ..Default::default()
        };
        assert_eq!(
            guild_icon(&g),
            IconSource::Glyph { letter: 'R', gradient: gradient_index("7") }
        );
        assert_eq!(guild_banner(&g), BannerSource::Gradient(gradient_index("7")));

        let mut with_splash = g.clone();
        with_splash.splash = Some("abc123".into());
        assert!(matches!(guild_banner(&with_splash), BannerSource::Image(_)));
    }

    #[test]
    fn feature_info_lookup() {
        let (name, info) = feature_info("VANITY_URL");
        assert_eq!(name, "Vanity Url");
        assert!(info.contains("invite code"));

        let (name, info) = feature_info("SOME_NEW_THING");
        assert_eq!(name, "Some New Thing");
        assert!(info.contains("Some New Thing"));
    }
}
