//! Markup renderer: pure functions from [`CardView`] to HTML strings, used by
//! copy-as-HTML and the one-shot `--print` mode.
//!
//! Every piece of untrusted text goes through [`escape_markup`] before
//! interpolation, including record IDs and CDN URLs, which embed image
//! hashes taken verbatim from the wire record. The only unescaped
//! interpolations are fully static templates (badge icon URLs, stock
//! avatar URLs, gradient CSS).

use crate::assets::{default_avatar_url, BannerSource, CdnImage, IconSource, GRADIENTS};
use crate::card::{CardView, ErrorCard, GuildCard, UserCard};

/// Replace the five HTML-significant characters with their entities.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render any card state to markup.
pub fn render(view: &CardView) -> String {
    match view {
        CardView::Idle => r#"<div class="card card--idle"></div>"#.to_string(),
        CardView::Loading => skeleton(),
        CardView::User(card) => user_card(card),
        CardView::Guild(card) => guild_card(card),
        CardView::Error(card) => error_card(card),
    }
}

/// Loading placeholder shown while a lookup is in flight.
pub fn skeleton() -> String {
    concat!(
        r#"<div class="card skeleton">"#,
        r#"<div class="skel-banner"></div>"#,
        r#"<div class="skel-avatar"></div>"#,
        r#"<div class="skel-line"></div>"#,
        r#"<div class="skel-line skel-small"></div>"#,
        r#"</div>"#,
    )
    .to_string()
}

fn gradient_css(index: usize) -> String {
    let (from, to) = GRADIENTS[index % GRADIENTS.len()];
    format!("background:linear-gradient(135deg,{from},{to})")
}

/// Animated variants are exposed as data attributes; the presentation layer
/// decides whether and when to swap them in.
fn img_attrs(img: &CdnImage) -> String {
    let still = escape_markup(&img.still);
    match &img.animated {
        Some(gif) => format!(
            r#"src="{still}" data-static="{still}" data-gif="{}""#,
            escape_markup(gif)
        ),
        None => format!(r#"src="{still}" data-static="{still}""#),
    }
}

fn banner_div(banner: &BannerSource) -> String {
    match banner {
        BannerSource::Image(img) => {
            let still = escape_markup(&img.still);
            match &img.animated {
                Some(gif) => format!(
                    r#"<div class="banner" style="background-image:url('{still}')" data-static="{still}" data-gif="{}"></div>"#,
                    escape_markup(gif)
                ),
                None => format!(
                    r#"<div class="banner" style="background-image:url('{still}')"></div>"#
                ),
            }
        }
        BannerSource::Color(color) => {
            format!(r#"<div class="banner" style="background:{color}"></div>"#)
        }
        BannerSource::Gradient(i) => {
            format!(r#"<div class="banner" style="{}"></div>"#, gradient_css(*i))
        }
    }
}

fn icon_img(icon: &IconSource, alt: &str) -> String {
    let alt = escape_markup(alt);
    match icon {
        IconSource::Image(img) => {
            format!(r#"<img class="avatar" {} alt="{alt}">"#, img_attrs(img))
        }
        IconSource::DefaultIndex(i) => format!(
            r#"<img class="avatar" src="{}" alt="{alt}">"#,
            default_avatar_url(*i)
        ),
        IconSource::Glyph { letter, gradient } => format!(
            r#"<div class="avatar avatar--glyph" style="{}">{}</div>"#,
            gradient_css(*gradient),
            escape_markup(&letter.to_string()),
        ),
    }
}

fn user_card(card: &UserCard) -> String {
    let badges = if card.badges.is_empty() {
        r#"<span class="no-badges">No public badges</span>"#.to_string()
    } else {
        card.badges
            .iter()
            .map(|b| {
                format!(
                    r#"<img class="badge-icon" src="{}" title="{}">"#,
                    b.icon,
                    escape_markup(b.label)
                )
            })
            .collect()
    };

    let activities = if card.activities.is_empty() {
        String::new()
    } else {
        let items: String = card
            .activities
            .iter()
            .map(|a| {
                let desc = a
                    .description
                    .as_deref()
                    .map(|d| format!(r#"<div class="activity-desc">{}</div>"#, escape_markup(d)))
                    .unwrap_or_default();
                let meta = a
                    .meta
                    .as_deref()
                    .map(|m| format!(r#"<div class="activity-meta">{}</div>"#, escape_markup(m)))
                    .unwrap_or_default();
                format!(
                    r#"<div class="activity-item"><div class="activity-title">{}</div>{desc}{meta}</div>"#,
                    escape_markup(&a.title)
                )
            })
            .collect();
        format!(r#"<div class="activity-list">{items}</div>"#)
    };

    let bot_tag = if card.bot {
        r#"<span class="tag-bot">BOT</span>"#
    } else {
        ""
    };

    format!(
        concat!(
            r#"<div class="card user-card">"#,
            "{banner}",
            r#"<div class="avatar-wrapper">{avatar}</div>"#,
            r#"<div class="username">{name}{bot_tag}</div>"#,
            r#"<div class="badges">{badges}</div>"#,
            r#"<div class="created">Created: {created}</div>"#,
            r#"<div class="id">ID: {id}</div>"#,
            "{activities}",
            "</div>",
        ),
        banner = banner_div(&card.banner),
        avatar = icon_img(&card.avatar, &format!("Avatar of {}", card.display_name)),
        name = escape_markup(&card.display_name),
        bot_tag = bot_tag,
        badges = badges,
        created = escape_markup(&card.created),
        id = escape_markup(&card.id),
        activities = activities,
    )
}

fn guild_card(card: &GuildCard) -> String {
    let description = card
        .description
        .as_deref()
        .map(|d| format!(r#"<div class="description">{}</div>"#, escape_markup(d)))
        .unwrap_or_default();

    let counts = {
        let mut cells = String::new();
        for (label, value) in [
            ("Members", &card.counts.members),
            ("Online", &card.counts.online),
            ("Boosts", &card.counts.boosts),
        ] {
            if let Some(v) = value {
                cells.push_str(&format!(
                    r#"<div class="count"><b>{v}</b> {label}</div>"#
                ));
            }
        }
        if cells.is_empty() {
            String::new()
        } else {
            format!(r#"<div class="count-strip">{cells}</div>"#)
        }
    };

    let meta: String = card
        .meta
        .iter()
        .map(|(k, v)| {
            format!(
                r#"<div class="meta-row"><span class="meta-key">{k}</span><span class="meta-val">{}</span></div>"#,
                escape_markup(v)
            )
        })
        .collect();

    let features: String = card
        .features
        .iter()
        .map(|(name, info)| {
            format!(
                r#"<span class="feature-pill" title="{}">{}</span>"#,
                escape_markup(info),
                escape_markup(name)
            )
        })
        .collect();

    format!(
        concat!(
            r#"<div class="card guild-card">"#,
            "{banner}",
            r#"<div class="avatar-wrapper">{icon}</div>"#,
            r#"<div class="guild-name">{name}</div>"#,
            "{description}",
            "{counts}",
            r#"<div class="meta-grid">{meta}</div>"#,
            r#"<div class="features">{features}</div>"#,
            r#"<div class="created">Created: {created}</div>"#,
            r#"<div class="id">ID: {id}</div>"#,
            "</div>",
        ),
        banner = banner_div(&card.banner),
        icon = icon_img(&card.icon, &format!("Icon of {}", card.name)),
        name = escape_markup(&card.name),
        description = description,
        counts = counts,
        meta = meta,
        features = features,
        created = escape_markup(&card.created),
        id = escape_markup(&card.id),
    )
}

fn error_card(card: &ErrorCard) -> String {
    let detail = card
        .detail
        .as_deref()
        .map(|d| {
            format!(
                concat!(
                    r#"<details class="err-details"><summary>Details</summary>"#,
                    r#"<pre class="err-pre">{}</pre></details>"#,
                ),
                escape_markup(d)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="card error-card"><div class="error">{}</div>{detail}</div>"#,
        escape_markup(&card.message)
    )
}
