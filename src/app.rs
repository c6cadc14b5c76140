//! Application state: the input surface, the current card, and the chrome
//! (theme, toast, shake cue, debounce bookkeeping). Key handling lives in
//! `main.rs`; network lifecycle lives in `lookup.rs`.

use std::time::{Duration, Instant};

use crate::api::SharedFetcher;
use crate::card::{self, CardView};
use crate::config::{Config, AUTO_SUBMIT_MIN_DIGITS};
use crate::lookup::{AppEvent, LookupController, SubmitOutcome};
use crate::models::EntityKind;
use crate::theme::{ColorScheme, Theme};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing in the ID field.
    EditId,
    /// Typing in the token field.
    EditToken,
}

const TOAST_TTL: Duration = Duration::from_millis(2500);
const SHAKE_DURATION: Duration = Duration::from_millis(650);
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct App {
    quit: bool,
    controller: LookupController,
    events_tx: UnboundedSender<AppEvent>,

    input: String,
    token_input: String,
    kind: EntityKind,
    input_mode: InputMode,
    card: CardView,

    theme: Theme,
    reduce_motion: bool,
    has_token: bool,
    /// Set when the user saved or cleared the token; main swaps the fetcher.
    pending_token_change: Option<Option<String>>,

    toast: Option<(String, Instant)>,
    shake_until: Option<Instant>,

    // Debounced auto-submit
    debounce: Duration,
    last_edit: Option<Instant>,
    auto_submitted: bool,

    // Card chrome
    sel_feature: usize,
    scroll: u16,
    spinner_frame: usize,
}

impl App {
    pub fn new(cfg: &Config, fetcher: SharedFetcher, events_tx: UnboundedSender<AppEvent>) -> Self {
        Self {
            quit: false,
            controller: LookupController::new(fetcher, events_tx.clone()),
            events_tx,
            input: cfg.initial_id.clone().unwrap_or_default(),
            token_input: String::new(),
            kind: cfg.kind,
            input_mode: InputMode::EditId,
            card: CardView::Idle,
            theme: cfg.theme,
            reduce_motion: cfg.reduce_motion,
            has_token: cfg.token.is_some(),
            pending_token_change: None,
            toast: None,
            shake_until: None,
            debounce: Duration::from_millis(cfg.debounce_ms),
            last_edit: None,
            auto_submitted: false,
            sel_feature: 0,
            scroll: 0,
            spinner_frame: 0,
        }
    }

    // ----- getters -----
    pub fn quit_flag(&self) -> bool {
        self.quit
    }
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn token_input(&self) -> &str {
        &self.token_input
    }
    pub fn kind(&self) -> EntityKind {
        self.kind
    }
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
    pub fn card(&self) -> &CardView {
        &self.card
    }
    pub fn theme(&self) -> ColorScheme {
        self.theme.colors()
    }
    pub fn theme_name(&self) -> Theme {
        self.theme
    }
    pub fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }
    pub fn has_token(&self) -> bool {
        self.has_token
    }
    pub fn sel_feature(&self) -> usize {
        self.sel_feature
    }
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn quit(&mut self) {
        self.quit = true;
        self.controller.abort();
    }

    // ----- lookup lifecycle -----

    /// Submit the current input for the current kind.
    pub fn submit(&mut self) {
        self.auto_submitted = true;
        match self.controller.submit(self.kind, &self.input) {
            SubmitOutcome::Invalid => {
                self.card = CardView::Error(card::validation_card(self.kind));
                self.trigger_shake();
            }
            SubmitOutcome::Started(token) => {
                log::debug!("[app] lookup #{token} {} {}", self.kind, self.input.trim());
                self.card = CardView::Loading;
                self.sel_feature = 0;
                self.scroll = 0;
            }
        }
    }

    /// Apply a lookup completion. Stale tokens are dropped with no visual
    /// effect; the visible card always reflects the latest submitted lookup.
    pub fn on_event(&mut self, ev: AppEvent) {
        let AppEvent::LookupDone { token, kind, id, result } = ev;
        if !self.controller.is_current(token) {
            log::debug!("[app] dropping stale lookup #{token} ({kind} {id})");
            return;
        }
        match result {
            Ok(profile) => {
                self.card = card::profile_card(&profile);
            }
            Err(err) => {
                log::info!("[app] lookup #{token} failed: {err}");
                self.card = CardView::Error(card::error_card(kind, &err));
                self.trigger_shake();
            }
        }
    }

    /// Fire the debounced auto-submit once the input is long enough to be a
    /// complete ID and the debounce interval has elapsed since the last
    /// edit. Length is the only gate; a malformed input still submits and
    /// renders the validation card.
    pub fn maybe_auto_submit(&mut self) {
        if self.auto_submitted || self.input_mode != InputMode::EditId {
            return;
        }
        if self.input.trim().chars().count() < AUTO_SUBMIT_MIN_DIGITS {
            return;
        }
        if let Some(t) = self.last_edit {
            if t.elapsed() >= self.debounce {
                self.submit();
            }
        }
    }

    // ----- input editing -----

    pub fn start_edit(&mut self) {
        self.input_mode = InputMode::EditId;
    }
    pub fn stop_edit(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
        self.last_edit = Some(Instant::now());
        self.auto_submitted = false;
    }

    pub fn input_backspace(&mut self) {
        self.input.pop();
        self.last_edit = Some(Instant::now());
        self.auto_submitted = false;
    }

    pub fn input_clear(&mut self) {
        self.input.clear();
        self.last_edit = None;
        self.auto_submitted = false;
    }

    pub fn toggle_kind(&mut self) {
        self.kind = match self.kind {
            EntityKind::User => EntityKind::Guild,
            EntityKind::Guild => EntityKind::User,
        };
        // A kind change makes the next auto-submit meaningful again.
        self.auto_submitted = false;
    }

    // ----- token entry -----

    pub fn start_token_edit(&mut self) {
        self.input_mode = InputMode::EditToken;
        self.token_input.clear();
    }

    pub fn token_char(&mut self, c: char) {
        self.token_input.push(c);
    }

    pub fn token_backspace(&mut self) {
        self.token_input.pop();
    }

    /// Save the entered token. Returns to normal mode; main applies the
    /// change to the fetch client.
    pub fn token_save(&mut self) {
        let normalized = crate::prefs::normalize_token(&self.token_input);
        self.has_token = normalized.is_some();
        self.pending_token_change = Some(normalized);
        self.token_input.clear();
        self.input_mode = InputMode::Normal;
        self.show_toast(if self.has_token { "Token saved" } else { "Token cleared" });
    }

    pub fn token_clear(&mut self) {
        self.has_token = false;
        self.pending_token_change = Some(None);
        self.show_toast("Token cleared");
    }

    pub fn take_pending_token_change(&mut self) -> Option<Option<String>> {
        self.pending_token_change.take()
    }

    /// Swap the fetch client (token change). The old controller aborts its
    /// in-flight task on drop; its completions can no longer arrive.
    pub fn set_fetcher(&mut self, fetcher: SharedFetcher) {
        self.controller = LookupController::new(fetcher, self.events_tx.clone());
    }

    // ----- chrome -----

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.show_toast(format!("Theme: {}", self.theme));
    }

    pub fn toggle_reduce_motion(&mut self) {
        self.reduce_motion = !self.reduce_motion;
        let msg = if self.reduce_motion {
            "Reduced motion on"
        } else {
            "Reduced motion off"
        };
        self.show_toast(msg);
    }

    pub fn show_toast(&mut self, msg: impl Into<String>) {
        self.toast = Some((msg.into(), Instant::now()));
    }

    pub fn toast(&self) -> Option<&str> {
        match &self.toast {
            Some((msg, at)) if at.elapsed() < TOAST_TTL => Some(msg),
            _ => None,
        }
    }

    fn trigger_shake(&mut self) {
        if !self.reduce_motion {
            self.shake_until = Some(Instant::now() + SHAKE_DURATION);
        }
    }

    /// Horizontal jitter for the card block while the shake cue is active.
    pub fn shake_offset(&self) -> u16 {
        match self.shake_until {
            Some(until) => {
                let now = Instant::now();
                if now >= until {
                    0
                } else {
                    let remaining = until.duration_since(now).as_millis();
                    if (remaining / 60) % 2 == 0 {
                        1
                    } else {
                        0
                    }
                }
            }
            None => 0,
        }
    }

    pub fn tick_spinner(&mut self) {
        if !self.reduce_motion && self.card.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        if self.reduce_motion {
            "…"
        } else {
            SPINNER_FRAMES[self.spinner_frame]
        }
    }

    // ----- card navigation -----

    fn feature_count(&self) -> usize {
        match &self.card {
            CardView::Guild(g) => g.features.len(),
            _ => 0,
        }
    }

    pub fn feature_up(&mut self) {
        self.sel_feature = self.sel_feature.saturating_sub(1);
    }

    pub fn feature_down(&mut self) {
        let count = self.feature_count();
        if count > 0 {
            self.sel_feature = (self.sel_feature + 1).min(count - 1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    /// Content for the copy shortcut: the rendered card markup.
    pub fn copy_markup(&self) -> String {
        crate::markup::render(&self.card)
    }
}
