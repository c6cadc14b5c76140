//! Small pure text formatters used by the card renderers.

/// Placeholder shown for absent values in the metadata grid.
pub const PLACEHOLDER: &str = "—";

/// Format an integer with thousands separators: 1234567 -> "1,234,567".
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Convert an UPPER_SNAKE_CASE flag token into Title Case words for display.
/// "WELCOME_SCREEN_ENABLED" -> "Welcome Screen Enabled"
pub fn title_case_token(token: &str) -> String {
    token
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const VERIFICATION_LEVELS: [&str; 5] = ["None", "Low", "Medium", "High", "Highest"];
const NSFW_LEVELS: [&str; 4] = ["Default", "Explicit", "Safe", "Age Restricted"];
const PREMIUM_TIERS: [&str; 4] = ["None", "Tier 1", "Tier 2", "Tier 3"];

fn ordinal_label(table: &'static [&'static str], ordinal: Option<u8>) -> &'static str {
    match ordinal {
        None => PLACEHOLDER,
        Some(n) => table.get(n as usize).copied().unwrap_or("Unknown"),
    }
}

/// Guild verification level label. Null -> placeholder, out of range -> "Unknown".
pub fn verification_level_label(level: Option<u8>) -> &'static str {
    ordinal_label(&VERIFICATION_LEVELS, level)
}

/// Guild content-rating (NSFW) level label.
pub fn nsfw_level_label(level: Option<u8>) -> &'static str {
    ordinal_label(&NSFW_LEVELS, level)
}

/// Guild boost tier label.
pub fn premium_tier_label(tier: Option<u8>) -> &'static str {
    ordinal_label(&PREMIUM_TIERS, tier)
}

/// 2FA moderation requirement label (MFA level 0 or 1).
pub fn mfa_label(level: Option<u8>) -> &'static str {
    match level {
        None => PLACEHOLDER,
        Some(0) => "Not required",
        Some(1) => "Required",
        Some(_) => "Unknown",
    }
}

/// Normalize a packed accent color into CSS hex form: 0xe38e2b -> "#e38e2b".
pub fn accent_color_css(color: Option<u32>) -> Option<String> {
    color.map(|c| format!("#{:06x}", c & 0x00ff_ffff))
}
