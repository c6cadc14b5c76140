//! Configuration: CLI args > environment variables > saved preferences > defaults.

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::models::EntityKind;
use crate::prefs::{normalize_token, Prefs};
use crate::theme::Theme;

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Auto-submit fires once the trimmed input reaches this many characters.
pub const AUTO_SUBMIT_MIN_DIGITS: usize = 15;

/// snowcard - Discord profile card explorer
///
/// Look up a user or guild snowflake ID and render its profile card in the
/// terminal. Configuration priority: CLI args > Environment variables >
/// saved preferences > Defaults
#[derive(Parser, Debug)]
#[command(name = "snowcard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discord profile card explorer", long_about = None)]
pub struct CliArgs {
    /// Snowflake ID to prefill and look up on startup
    pub id: Option<String>,

    /// Entity kind for the initial lookup: user or guild
    #[arg(short, long, env = "SNOWCARD_KIND", value_parser = clap::value_parser!(EntityKind))]
    pub kind: Option<EntityKind>,

    /// API base URL (Discord API or a compatible proxy)
    #[arg(long, env = "DISCORD_API_BASE")]
    pub api_base: Option<String>,

    /// Bot token for authenticated lookups (sent as "Authorization: Bot ...")
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    pub token: Option<String>,

    /// Color theme: dark, light, amber-crt, green-phosphor
    #[arg(long, env = "SNOWCARD_THEME")]
    pub theme: Option<String>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Debounce interval for auto-submit in milliseconds (100-5000)
    #[arg(long, env = "DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Disable spinner and shake animations
    #[arg(long, env = "SNOWCARD_REDUCE_MOTION")]
    pub reduce_motion: bool,

    /// Serve lookups from the built-in sample table, no network
    #[arg(long)]
    pub offline: bool,

    /// Fetch once, print the card markup to stdout, and exit (requires ID)
    #[arg(long)]
    pub print: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub initial_id: Option<String>,
    pub kind: EntityKind,
    pub api_base: String,
    pub token: Option<String>,
    pub theme: Theme,
    pub request_timeout_ms: u64,
    pub debounce_ms: u64,
    pub reduce_motion: bool,
    pub offline: bool,
    pub print: bool,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Merge parsed CLI args (which already absorbed env vars) with saved
/// preferences and defaults.
pub fn resolve(args: CliArgs, prefs: &Prefs) -> Result<Config> {
    let api_base = args
        .api_base
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    validate_url(&api_base, "DISCORD_API_BASE")?;

    let token = args
        .token
        .as_deref()
        .and_then(normalize_token)
        .or_else(|| prefs.token.clone());

    let theme = match args.theme.as_deref().or(prefs.theme.as_deref()) {
        Some(name) => Theme::from_str(name).map_err(|e| anyhow!(e))?,
        None => Theme::default(),
    };

    let request_timeout_ms = validate_in_range(
        args.request_timeout_ms.unwrap_or(8000),
        1000,
        60000,
        "REQUEST_TIMEOUT_MS",
    )?;

    let debounce_ms =
        validate_in_range(args.debounce_ms.unwrap_or(650), 100, 5000, "DEBOUNCE_MS")?;

    if args.print && args.id.is_none() {
        return Err(anyhow!("--print requires an ID argument"));
    }

    Ok(Config {
        initial_id: args.id,
        kind: args.kind.unwrap_or(EntityKind::User),
        api_base,
        token,
        theme,
        request_timeout_ms,
        debounce_ms,
        reduce_motion: args.reduce_motion || prefs.reduce_motion.unwrap_or(false),
        offline: args.offline,
        print: args.print,
    })
}

/// Parse the process arguments and resolve against saved preferences.
pub fn load(prefs: &Prefs) -> Result<Config> {
    resolve(CliArgs::parse(), prefs)
}
