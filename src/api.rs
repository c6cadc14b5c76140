//! Fetch client: cache-first profile lookups against the Discord HTTP API
//! (or an API-compatible proxy), with typed failure classification.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Activity, EntityKind, GuildProfile, Profile, UserProfile};

/// Discord error code embedded in a guild 404 body when the requesting
/// principal is not a member of that guild.
const UNKNOWN_GUILD_CODE: i64 = 10004;

/// Classified lookup failure. Cancellation is not represented here: an
/// aborted request never produces a value at all.
#[derive(Clone, Debug, Error)]
pub enum FetchError {
    #[error("not found (404)")]
    NotFound { body: String },
    /// Guild 404 carrying the unknown-guild code: the credential can reach
    /// the API but has no access to this guild.
    #[error("access denied (404)")]
    AccessDenied { body: String },
    #[error("rate limited (429)")]
    RateLimited { body: String },
    #[error("HTTP {status}")]
    Upstream { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Raw response body, where one was obtained.
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchError::NotFound { body }
            | FetchError::AccessDenied { body }
            | FetchError::RateLimited { body }
            | FetchError::Upstream { body, .. } => (!body.is_empty()).then_some(body.as_str()),
            FetchError::Network(_) => None,
        }
    }
}

/// Map a non-2xx status plus raw body into a typed error.
/// Only guild 404s are inspected for the unknown-guild code.
pub fn classify_status(kind: EntityKind, status: u16, body: String) -> FetchError {
    match status {
        404 => {
            if kind == EntityKind::Guild && embedded_code(&body) == Some(UNKNOWN_GUILD_CODE) {
                FetchError::AccessDenied { body }
            } else {
                FetchError::NotFound { body }
            }
        }
        429 => FetchError::RateLimited { body },
        status => FetchError::Upstream { status, body },
    }
}

fn embedded_code(body: &str) -> Option<i64> {
    serde_json::from_str::<Value>(body).ok()?.get("code")?.as_i64()
}

/// Profile lookup backend. Implementations must be cheap to call from a
/// spawned task; tests substitute their own.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Profile, FetchError>;
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: EntityKind,
    id: String,
    /// Partial token fingerprint, so a token change does not serve records
    /// fetched under different credentials.
    token_fp: Option<String>,
}

/// In-memory, append-only response cache over any backend. A hit is served
/// without calling the inner fetcher at all; entries never expire within a
/// session; failures are not cached.
pub struct CachingFetcher<F> {
    inner: F,
    token_fp: Option<String>,
    cache: Mutex<HashMap<CacheKey, Profile>>,
}

impl<F: ProfileFetcher> CachingFetcher<F> {
    pub fn new(inner: F, token: Option<&str>) -> Self {
        Self {
            inner,
            token_fp: token.map(fingerprint),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache_key(&self, kind: EntityKind, id: &str) -> CacheKey {
        CacheKey {
            kind,
            id: id.to_string(),
            token_fp: self.token_fp.clone(),
        }
    }
}

#[async_trait]
impl<F: ProfileFetcher> ProfileFetcher for CachingFetcher<F> {
    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Profile, FetchError> {
        let key = self.cache_key(kind, id);
        if let Some(hit) = self.cache.lock().expect("cache lock").get(&key) {
            log::debug!("[api] cache hit {kind}/{id}");
            return Ok(hit.clone());
        }
        let profile = self.inner.fetch(kind, id).await?;
        self.cache
            .lock()
            .expect("cache lock")
            .insert(key, profile.clone());
        Ok(profile)
    }
}

/// HTTP fetch client. Stateless per request; wrap in [`CachingFetcher`] for
/// the session cache.
pub struct HttpFetcher {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl HttpFetcher {
    pub fn new(api_base: &str, token: Option<String>, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url_for(&self, kind: EntityKind, id: &str) -> String {
        match kind {
            EntityKind::User => format!("{}/users/{id}", self.api_base),
            EntityKind::Guild => format!("{}/guilds/{id}?with_counts=true", self.api_base),
        }
    }
}

/// Short stable fingerprint of a bearer token for cache keying. Not a secret
/// hash; it only has to distinguish tokens within one session.
fn fingerprint(token: &str) -> String {
    let tail: String = token
        .chars()
        .rev()
        .take(8)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    format!("{}:{tail}", token.len())
}

/// Tolerant parse: a 2xx body that is not valid JSON for the expected shape
/// yields an empty record rather than an error.
fn parse_profile(kind: EntityKind, body: &str) -> Profile {
    match kind {
        EntityKind::User => {
            Profile::User(serde_json::from_str::<UserProfile>(body).unwrap_or_default())
        }
        EntityKind::Guild => {
            Profile::Guild(serde_json::from_str::<GuildProfile>(body).unwrap_or_default())
        }
    }
}

#[async_trait]
impl ProfileFetcher for HttpFetcher {
    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Profile, FetchError> {
        let mut request = self.client.get(self.url_for(kind, id));
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bot {token}"));
        }

        log::info!("[api] GET {kind}/{id}");
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status().as_u16();

        // Body is read as text first so error bodies survive verbatim for
        // the detail disclosure.
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(classify_status(kind, status, body));
        }

        Ok(parse_profile(kind, &body))
    }
}

/// Offline backend serving a fixed sample table, for demos and air-gapped
/// use. Lookups outside the table behave like an API 404.
pub struct SampleFetcher {
    users: HashMap<String, UserProfile>,
    guilds: HashMap<String, GuildProfile>,
}

impl Default for SampleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleFetcher {
    pub fn new() -> Self {
        let mut users = HashMap::new();
        users.insert(
            "611204110955446301".to_string(),
            UserProfile {
                id: "611204110955446301".into(),
                username: "not.unnamed".into(),
                global_name: Some("Unnamed".into()),
                discriminator: Some("0".into()),
                avatar: Some("a_ed042603a7540b0b5cc4cf15939fab36".into()),
                banner: Some("58f215ca99acd3b6b8bce25cc1515e1c".into()),
                accent_color: Some(0xe38e2b),
                public_flags: (1 << 2) | (1 << 9) | (1 << 22),
                bot: false,
                activities: vec![Activity {
                    title: "Those Eyes".into(),
                    description: Some("New West".into()),
                    meta: Some("3d ago".into()),
                }],
            },
        );
        users.insert(
            "1248988886605103222".to_string(),
            UserProfile {
                id: "1248988886605103222".into(),
                username: "mythicdude_40528".into(),
                discriminator: Some("0".into()),
                avatar: Some("fe41777157caa0d313ff34558c1bfe3c".into()),
                accent_color: Some(0x519ed1),
                activities: vec![
                    Activity {
                        title: "Roblox".into(),
                        description: None,
                        meta: Some("Now · 7x Streak".into()),
                    },
                    Activity {
                        title: "Geometry Dash".into(),
                        description: None,
                        meta: Some("1d ago · 5x Streak".into()),
                    },
                ],
                ..Default::default()
            },
        );

        let mut guilds = HashMap::new();
        guilds.insert(
            "302094807046684672".to_string(),
            GuildProfile {
                id: "302094807046684672".into(),
                name: "Sample Hangout".into(),
                description: Some("A place to hang out and test things.".into()),
                features: vec![
                    "COMMUNITY".into(),
                    "ANIMATED_ICON".into(),
                    "VANITY_URL".into(),
                ],
                approximate_member_count: Some(120_334),
                approximate_presence_count: Some(18_207),
                premium_subscription_count: Some(44),
                owner_id: Some("611204110955446301".into()),
                preferred_locale: Some("en-US".into()),
                verification_level: Some(2),
                mfa_level: Some(1),
                premium_tier: Some(2),
                nsfw_level: Some(0),
                vanity_url_code: Some("sample".into()),
                ..Default::default()
            },
        );

        Self { users, guilds }
    }
}

#[async_trait]
impl ProfileFetcher for SampleFetcher {
    async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Profile, FetchError> {
        let found = match kind {
            EntityKind::User => self.users.get(id).cloned().map(Profile::User),
            EntityKind::Guild => self.guilds.get(id).cloned().map(Profile::Guild),
        };
        found.ok_or_else(|| {
            let (message, code) = match kind {
                EntityKind::User => ("Unknown User", 10013),
                EntityKind::Guild => ("Unknown Guild", UNKNOWN_GUILD_CODE),
            };
            classify_status(
                kind,
                404,
                format!(r#"{{"message": "{message}", "code": {code}}}"#),
            )
        })
    }
}

/// Shared fetcher handle passed to the lookup controller.
pub type SharedFetcher = Arc<dyn ProfileFetcher>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ProfileFetcher for CountingBackend {
        async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Profile, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Network("down".into()));
            }
            Ok(match kind {
                EntityKind::User => Profile::User(UserProfile {
                    id: id.to_string(),
                    username: format!("user-{id}"),
                    ..Default::default()
                }),
                EntityKind::Guild => Profile::Guild(GuildProfile {
                    id: id.to_string(),
                    name: format!("guild-{id}"),
                    ..Default::default()
                }),
            })
        }
    }

    #[tokio::test]
    async fn cache_hit_short_circuits_the_backend() {
        let cached = CachingFetcher::new(
            CountingBackend { calls: AtomicUsize::new(0), fail: false },
            Some("abc.def"),
        );

        let first = cached.fetch(EntityKind::User, "611204110955446301").await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);

        // Same (kind, id): served from memory, zero backend calls
        let second = cached.fetch(EntityKind::User, "611204110955446301").await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.id(), second.id());

        // Kind is part of the key
        cached.fetch(EntityKind::Guild, "611204110955446301").await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);

        // And so is the ID
        cached.fetch(EntityKind::User, "99999999999999999").await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachingFetcher::new(
            CountingBackend { calls: AtomicUsize::new(0), fail: true },
            None,
        );
        cached.fetch(EntityKind::User, "12345").await.unwrap_err();
        cached.fetch(EntityKind::User, "12345").await.unwrap_err();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn classify_basic_statuses() {
        assert!(matches!(
            classify_status(EntityKind::User, 404, String::new()),
            FetchError::NotFound { .. }
        ));
        assert!(matches!(
            classify_status(EntityKind::User, 429, String::new()),
            FetchError::RateLimited { .. }
        ));
        match classify_status(EntityKind::Guild, 502, "bad gateway".into()) {
            FetchError::Upstream { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn guild_404_with_unknown_guild_code_is_access_denied() {
        let err = classify_status(
            EntityKind::Guild,
            404,
            r#"{"message": "Unknown Guild", "code": 10004}"#.into(),
        );
        assert!(matches!(err, FetchError::AccessDenied { .. }));

        // Same body on a user lookup stays a plain 404
        let err = classify_status(EntityKind::User, 404, r#"{"code": 10004}"#.into());
        assert!(matches!(err, FetchError::NotFound { .. }));

        // Guild 404 with a different code stays a plain 404
        let err = classify_status(EntityKind::Guild, 404, r#"{"code": 0}"#.into());
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[test]
    fn malformed_error_body_is_tolerated() {
        let err = classify_status(EntityKind::Guild, 404, "<html>nope</html>".into());
        assert!(matches!(err, FetchError::NotFound { .. }));
        assert_eq!(err.body(), Some("<html>nope</html>"));
    }

    #[test]
    fn tolerant_success_parse() {
        let p = parse_profile(EntityKind::User, "this is not json");
        match p {
            Profile::User(u) => assert!(u.id.is_empty()),
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn token_fingerprint_distinguishes_tokens() {
        assert_ne!(fingerprint("Abcdef.12345678"), fingerprint("Abcdef.87654321"));
        assert_eq!(fingerprint("tok"), fingerprint("tok"));
    }

    #[tokio::test]
    async fn sample_fetcher_hits_and_misses() {
        let s = SampleFetcher::new();
        let p = s.fetch(EntityKind::User, "611204110955446301").await.unwrap();
        assert_eq!(p.id(), "611204110955446301");

        let miss = s.fetch(EntityKind::Guild, "1").await.unwrap_err();
        assert!(matches!(miss, FetchError::AccessDenied { .. }));

        let miss = s.fetch(EntityKind::User, "1").await.unwrap_err();
        assert!(matches!(miss, FetchError::NotFound { .. }));
    }
}
