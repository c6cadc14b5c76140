//! Typed view model for the card area, built by pure functions from profile
//! records. Both renderers (terminal and markup) consume [`CardView`]; neither
//! touches the network or storage.

use crate::api::FetchError;
use crate::assets::{self, BadgeSpec, BannerSource, IconSource};
use crate::models::{Activity, EntityKind, GuildProfile, Profile, UserProfile};
use crate::snowflake;
use crate::util_text::{group_thousands, PLACEHOLDER};

/// Everything the card pane can show.
#[derive(Debug)]
pub enum CardView {
    Idle,
    Loading,
    User(Box<UserCard>),
    Guild(Box<GuildCard>),
    Error(ErrorCard),
}

impl CardView {
    pub fn is_loading(&self) -> bool {
        matches!(self, CardView::Loading)
    }
}

#[derive(Debug)]
pub struct UserCard {
    pub id: String,
    pub display_name: String,
    pub username: String,
    pub bot: bool,
    pub created: String,
    pub avatar: IconSource,
    pub banner: BannerSource,
    pub badges: Vec<&'static BadgeSpec>,
    pub activities: Vec<Activity>,
}

#[derive(Debug)]
pub struct GuildCard {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created: String,
    pub icon: IconSource,
    pub banner: BannerSource,
    /// (display name, description) per feature token, record order.
    pub features: Vec<(String, String)>,
    pub counts: CountStrip,
    pub meta: Vec<(&'static str, String)>,
}

/// Aggregate-count strip; each entry is present only when the record
/// carried the corresponding count.
#[derive(Debug, Default)]
pub struct CountStrip {
    pub members: Option<String>,
    pub online: Option<String>,
    pub boosts: Option<String>,
}

#[derive(Debug)]
pub struct ErrorCard {
    pub message: String,
    /// Raw response body for the detail disclosure, when one exists.
    pub detail: Option<String>,
}

/// Build the user card view.
pub fn user_card(user: &UserProfile) -> UserCard {
    UserCard {
        id: user.id.clone(),
        display_name: user.display_name().to_string(),
        username: user.username.clone(),
        bot: user.bot,
        created: snowflake::created_label(&user.id),
        avatar: assets::user_avatar(user),
        banner: assets::user_banner(user),
        badges: assets::badges_for(user.public_flags),
        activities: user.activities.clone(),
    }
}

/// Build the guild card view, including the metadata grid rows.
pub fn guild_card(guild: &GuildProfile) -> GuildCard {
    let meta = vec![
        ("Owner ID", guild.owner_id.clone().unwrap_or_else(|| PLACEHOLDER.into())),
        ("Locale", guild.preferred_locale.clone().unwrap_or_else(|| PLACEHOLDER.into())),
        (
            "Verification",
            crate::util_text::verification_level_label(guild.verification_level).to_string(),
        ),
        ("2FA for mods", crate::util_text::mfa_label(guild.mfa_level).to_string()),
        (
            "Boost tier",
            crate::util_text::premium_tier_label(guild.premium_tier).to_string(),
        ),
        (
            "Content rating",
            crate::util_text::nsfw_level_label(guild.nsfw_level).to_string(),
        ),
        (
            "Vanity URL",
            guild
                .vanity_url_code
                .as_deref()
                .map(|c| format!("discord.gg/{c}"))
                .unwrap_or_else(|| PLACEHOLDER.into()),
        ),
    ];

    GuildCard {
        id: guild.id.clone(),
        name: guild.name.clone(),
        description: guild.description.clone(),
        created: snowflake::created_label(&guild.id),
        icon: assets::guild_icon(guild),
        banner: assets::guild_banner(guild),
        features: guild
            .features
            .iter()
            .map(|t| assets::feature_info(t))
            .collect(),
        counts: CountStrip {
            members: guild.approximate_member_count.map(group_thousands),
            online: guild.approximate_presence_count.map(group_thousands),
            boosts: guild.premium_subscription_count.map(group_thousands),
        },
        meta,
    }
}

/// Build a card view from a fetched record.
pub fn profile_card(profile: &Profile) -> CardView {
    match profile {
        Profile::User(u) => CardView::User(Box::new(user_card(u))),
        Profile::Guild(g) => CardView::Guild(Box::new(guild_card(g))),
    }
}

/// Validation failure card (no network call was made).
pub fn validation_card(kind: EntityKind) -> ErrorCard {
    ErrorCard {
        message: format!("Enter a numeric Discord {kind} ID (5–30 digits)."),
        detail: None,
    }
}

/// Map a classified fetch failure to its card.
pub fn error_card(kind: EntityKind, err: &FetchError) -> ErrorCard {
    let message = match err {
        FetchError::NotFound { .. } => match kind {
            EntityKind::User => "User not found (404).".to_string(),
            EntityKind::Guild => "Server not found (404).".to_string(),
        },
        FetchError::AccessDenied { .. } => concat!(
            "That server exists, but the bot is not in it. ",
            "Invite the bot first: https://discord.com/oauth2/authorize",
        )
        .to_string(),
        FetchError::RateLimited { .. } => "Rate limited (429).".to_string(),
        FetchError::Upstream { status, .. } => format!("HTTP {status}"),
        FetchError::Network(_) => "Network error.".to_string(),
    };
    ErrorCard {
        message,
        detail: err.body().map(str::to_string),
    }
}
