//! End-to-end lookup lifecycle: validation short-circuit, stale-result
//! suppression, and the offline sample backend, exercised through the
//! public controller and app surfaces.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use tokio::sync::mpsc::unbounded_channel;

use snowcard::api::{CachingFetcher, FetchError, ProfileFetcher, SampleFetcher};
use snowcard::app::App;
use snowcard::card::CardView;
use snowcard::config::{self, CliArgs};
use snowcard::lookup::{LookupController, SubmitOutcome};
use snowcard::models::{EntityKind, Profile, UserProfile};
use snowcard::prefs::Prefs;

struct CountingFetcher {
    calls: Arc<AtomicUsize>,
    delay_ms: u64,
}

#[async_trait]
impl ProfileFetcher for CountingFetcher {
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

fn default_config() -> config::Config {
    config::resolve(CliArgs::try_parse_from(["snowcard"]).unwrap(), &Prefs::default()).unwrap()
}

#[tokio::test]
async fn invalid_input_never_touches_the_network() {
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = Arc::new(CountingFetcher { calls: calls.clone(), delay_ms: 0 });
    let (tx, mut rx) = unbounded_channel();
    let mut ctl = LookupController::new(fetcher, tx);

    for bad in ["", "abc", "12 34", "1234", &"9".repeat(31)] {
        assert_eq!(ctl.submit(EntityKind::User, bad), SubmitOutcome::Invalid, "{bad:?}");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn repeat_lookup_is_served_from_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = Arc::new(CachingFetcher::new(
        CountingFetcher { calls: calls.clone(), delay_ms: 0 },
        None,
    ));
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(&default_config(), fetcher, tx);

    for c in "611204110955446301".chars() {
        app.input_char(c);
    }
    app.submit();
    app.on_event(rx.recv().await.unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Same ID again: resolved from the cache, zero backend calls
    app.submit();
    app.on_event(rx.recv().await.unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    match app.card() {
        CardView::User(u) => assert_eq!(u.username, "user-611204110955446301"),
        other => panic!("expected user card, got {other:?}"),
    }

    // Kind change misses the cache
    app.toggle_kind();
    app.submit();
    app.on_event(rx.recv().await.unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn rapid_resubmit_only_renders_the_latest() {
    let fetcher = Arc::new(CountingFetcher { calls: Arc::new(AtomicUsize::new(0)), delay_ms: 40 });
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(&default_config(), fetcher, tx);

    for c in "1111111111".chars() {
        app.input_char(c);
    }
    app.submit();
    app.input_clear();
    for c in "2222222222".chars() {
        app.input_char(c);
    }
    app.submit();

    // The first task was aborted; only the second completion arrives.
    let ev = rx.recv().await.unwrap();
    app.on_event(ev);
    match app.card() {
        CardView::User(u) => assert_eq!(u.username, "user-2222222222"),
        other => panic!("expected user card, got {other:?}"),
    }

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(rx.try_recv().is_err(), "aborted lookup must stay silent");
}

#[tokio::test]
async fn offline_backend_round_trip() {
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(&default_config(), Arc::new(SampleFetcher::new()), tx);

    for c in "611204110955446301".chars() {
        app.input_char(c);
    }
    app.submit();
    assert!(app.card().is_loading());

    let ev = rx.recv().await.unwrap();
    app.on_event(ev);
    match app.card() {
        CardView::User(u) => {
            assert_eq!(u.display_name, "Unnamed");
            assert_eq!(u.username, "not.unnamed");
            assert_eq!(u.created, "14 August 2019");
            assert!(!u.badges.is_empty());
        }
        other => panic!("expected user card, got {other:?}"),
    }
}

#[tokio::test]
async fn guild_miss_maps_to_access_denied_card() {
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(&default_config(), Arc::new(SampleFetcher::new()), tx);

    app.toggle_kind();
    for c in "99999999999999999".chars() {
        app.input_char(c);
    }
    app.submit();

    let ev = rx.recv().await.unwrap();
    app.on_event(ev);
    match app.card() {
        CardView::Error(e) => {
            assert!(e.message.contains("bot is not in it"), "{}", e.message);
            assert!(e.message.contains("https://discord.com/oauth2/authorize"));
            assert!(e.detail.as_deref().unwrap().contains("10004"));
        }
        other => panic!("expected error card, got {other:?}"),
    }
}

#[tokio::test]
async fn user_miss_is_a_plain_not_found() {
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(&default_config(), Arc::new(SampleFetcher::new()), tx);

    for c in "99999999999999999".chars() {
        app.input_char(c);
    }
    app.submit();

    let ev = rx.recv().await.unwrap();
    app.on_event(ev);
    match app.card() {
        CardView::Error(e) => assert_eq!(e.message, "User not found (404)."),
        other => panic!("expected error card, got {other:?}"),
    }
}
