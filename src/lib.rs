//! snowcard: look up a Discord user or guild by snowflake ID and render its
//! profile card, in the terminal or as markup on stdout.

pub mod api;
pub mod app;
pub mod assets;
pub mod card;
pub mod clipboard;
pub mod config;
pub mod lookup;
pub mod markup;
pub mod models;
pub mod prefs;
pub mod snowflake;
pub mod theme;
pub mod ui;
pub mod util_text;

pub use api::{CachingFetcher, FetchError, HttpFetcher, ProfileFetcher, SampleFetcher, SharedFetcher};
pub use card::CardView;
pub use lookup::{AppEvent, LookupController, SubmitOutcome};
pub use models::{EntityKind, GuildProfile, Profile, UserProfile};
