//! Persisted preferences: theme, reduced motion, and the optional bot token.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Prefs {
    /// Theme name; absent means dark.
    pub theme: Option<String>,
    /// Disable skeleton spinner and shake cue.
    pub reduce_motion: Option<bool>,
    /// Bot token, stored without the "Bot " prefix.
    pub token: Option<String>,
}

/// Preferences file location: $SNOWCARD_PREFS, else ~/.config/snowcard/prefs.toml.
pub fn default_path() -> PathBuf {
    if let Ok(p) = std::env::var("SNOWCARD_PREFS") {
        return PathBuf::from(p);
    }
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(".config").join("snowcard").join("prefs.toml"))
        .unwrap_or_else(|_| PathBuf::from("snowcard-prefs.toml"))
}

/// Load preferences; a missing or unreadable file yields defaults.
pub fn load(path: &Path) -> Prefs {
    match std::fs::read_to_string(path) {
        Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
            log::warn!("[prefs] ignoring malformed prefs file {}: {e}", path.display());
            Prefs::default()
        }),
        Err(_) => Prefs::default(),
    }
}

pub fn save(path: &Path, prefs: &Prefs) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(prefs).context("serializing prefs")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

/// Normalize a bearer token: trim whitespace and strip an optional leading
/// "Bot " prefix. Empty input yields None.
pub fn normalize_token(raw: &str) -> Option<String> {
    let t = raw.trim();
    let t = t.strip_prefix("Bot ").unwrap_or(t).trim();
    (!t.is_empty()).then(|| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_normalization() {
        assert_eq!(normalize_token("abc.def").as_deref(), Some("abc.def"));
        assert_eq!(normalize_token("Bot abc.def").as_deref(), Some("abc.def"));
        assert_eq!(normalize_token("  Bot   abc.def  ").as_deref(), Some("abc.def"));
        assert_eq!(normalize_token(""), None);
        assert_eq!(normalize_token("Bot "), None);
        // Only a leading marker is stripped
        assert_eq!(normalize_token("Botabc").as_deref(), Some("Botabc"));
    }

    #[test]
    fn round_trip() {
        let dir = std::env::temp_dir().join(format!("snowcard-prefs-{}", std::process::id()));
        let path = dir.join("prefs.toml");

        let prefs = Prefs {
            theme: Some("light".into()),
            reduce_motion: Some(true),
            token: Some("abc.def".into()),
        };
        save(&path, &prefs).unwrap();
        let loaded = load(&path);
        assert_eq!(loaded.theme.as_deref(), Some("light"));
        assert_eq!(loaded.reduce_motion, Some(true));
        assert_eq!(loaded.token.as_deref(), Some("abc.def"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_and_malformed_files_yield_defaults() {
        let loaded = load(Path::new("/definitely/not/here.toml"));
        assert!(loaded.theme.is_none());

        let dir = std::env::temp_dir().join(format!("snowcard-prefs-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("prefs.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        let loaded = load(&path);
        assert!(loaded.token.is_none());
        std::fs::remove_dir_all(&dir).ok();
    }
}
