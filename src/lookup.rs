//! Lookup controller: owns the request lifecycle for the single card slot.
//!
//! One lookup may be in flight at a time. Submitting a new lookup aborts the
//! previous fetch task and bumps a monotonic token; completions carry the
//! token they were issued under, and the event loop drops any completion
//! whose token is no longer current. An aborted task never delivers an
//! event, so cancellation is invisible by construction.

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::{FetchError, SharedFetcher};
use crate::models::{EntityKind, Profile};
use crate::snowflake;

/// Events delivered to the main loop from lookup tasks.
#[derive(Debug)]
pub enum AppEvent {
    LookupDone {
        token: u64,
        kind: EntityKind,
        id: String,
        result: Result<Profile, FetchError>,
    },
}

/// Result of a submit call.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// ID failed the digit/length shape check; no network call was made.
    Invalid,
    /// Lookup started (or will complete from cache) under this token.
    Started(u64),
}

pub struct LookupController {
    fetcher: SharedFetcher,
    events: UnboundedSender<AppEvent>,
    seq: u64,
    inflight: Option<JoinHandle<()>>,
}

impl LookupController {
    pub fn new(fetcher: SharedFetcher, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            fetcher,
            events,
            seq: 0,
            inflight: None,
        }
    }

    /// Validate and start a lookup. The previous in-flight request, if any,
    /// is cancelled regardless of validation outcome only when validation
    /// passes; an invalid submit leaves the current lookup untouched.
    pub fn submit(&mut self, kind: EntityKind, raw_id: &str) -> SubmitOutcome {
        let id = raw_id.trim();
        if !snowflake::is_valid_id(id) {
            return SubmitOutcome::Invalid;
        }

        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }

        self.seq += 1;
        let token = self.seq;
        let fetcher = self.fetcher.clone();
        let events = self.events.clone();
        let id = id.to_string();

        self.inflight = Some(tokio::spawn(async move {
            let result = fetcher.fetch(kind, &id).await;
            // Receiver gone means the app is shutting down.
            let _ = events.send(AppEvent::LookupDone {
                token,
                kind,
                id,
                result,
            });
        }));

        SubmitOutcome::Started(token)
    }

    /// True when `token` belongs to the most recently submitted lookup.
    /// Stale completions must be discarded without rendering.
    pub fn is_current(&self, token: u64) -> bool {
        token == self.seq
    }

    pub fn current_token(&self) -> u64 {
        self.seq
    }

    /// Abort whatever is in flight (shutdown path).
    pub fn abort(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}

impl Drop for LookupController {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProfileFetcher;
    use crate::models::UserProfile;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc::unbounded_channel;

    struct MockFetcher {
        calls: AtomicUsize,
        delay_ms: u64,
    }

    #[async_trait]
    impl ProfileFetcher for MockFetcher {
        async fn fetch(&self, _kind: EntityKind, id: &str) -> Result<Profile, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            Ok(Profile::User(UserProfile {
                id: id.to_string(),
                username: format!("user-{id}"),
                ..Default::default()
            }))
        }
    }

    #[tokio::test]
    async fn invalid_id_never_reaches_the_fetcher() {
        let fetcher = Arc::new(MockFetcher { calls: AtomicUsize::new(0), delay_ms: 0 });
        let (tx, mut rx) = unbounded_channel();
        let mut ctl = LookupController::new(fetcher.clone(), tx);

        assert_eq!(ctl.submit(EntityKind::User, "abc"), SubmitOutcome::Invalid);
        assert_eq!(ctl.submit(EntityKind::User, "1234"), SubmitOutcome::Invalid);
        assert_eq!(
            ctl.submit(EntityKind::User, &"9".repeat(31)),
            SubmitOutcome::Invalid
        );

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn input_is_trimmed_before_validation() {
        let fetcher = Arc::new(MockFetcher { calls: AtomicUsize::new(0), delay_ms: 0 });
        let (tx, mut rx) = unbounded_channel();
        let mut ctl = LookupController::new(fetcher, tx);

        let outcome = ctl.submit(EntityKind::User, "  611204110955446301  ");
        assert_eq!(outcome, SubmitOutcome::Started(1));

        let ev = rx.recv().await.unwrap();
        let AppEvent::LookupDone { id, .. } = ev;
        assert_eq!(id, "611204110955446301");
    }

    #[tokio::test]
    async fn stale_completion_is_not_current() {
        let slow = Arc::new(MockFetcher { calls: AtomicUsize::new(0), delay_ms: 50 });
        let (tx, mut rx) = unbounded_channel();
        let mut ctl = LookupController::new(slow, tx);

        let SubmitOutcome::Started(first) = ctl.submit(EntityKind::User, "1111111111") else {
            panic!("first submit rejected");
        };
        let SubmitOutcome::Started(second) = ctl.submit(EntityKind::User, "2222222222") else {
            panic!("second submit rejected");
        };

        assert!(!ctl.is_current(first));
        assert!(ctl.is_current(second));

        // Only the second task survives; the first was aborted mid-sleep and
        // must never deliver an event.
        let ev = rx.recv().await.unwrap();
        let AppEvent::LookupDone { token, id, .. } = ev;
        assert_eq!(token, second);
        assert_eq!(id, "2222222222");

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn tokens_increase_monotonically() {
        let fetcher = Arc::new(MockFetcher { calls: AtomicUsize::new(0), delay_ms: 0 });
        let (tx, _rx) = unbounded_channel();
        let mut ctl = LookupController::new(fetcher, tx);

        let mut last = 0;
        for _ in 0..5 {
            let SubmitOutcome::Started(t) = ctl.submit(EntityKind::Guild, "123456789") else {
                panic!("submit rejected");
            };
            assert!(t > last);
            last = t;
        }
        assert_eq!(ctl.current_token(), last);
    }
}
