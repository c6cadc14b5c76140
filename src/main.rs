use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::unbounded_channel;

use snowcard::api::{CachingFetcher, HttpFetcher, SampleFetcher, SharedFetcher};
use snowcard::app::{App, InputMode};
use snowcard::card::{self, CardView};
use snowcard::clipboard::copy_to_clipboard;
use snowcard::config::{self, Config};
use snowcard::prefs::{self, Prefs};
use snowcard::{markup, snowflake, ui};

/// Target frame interval (~30 fps when idle).
const FRAME_BUDGET: Duration = Duration::from_millis(33);

fn make_fetcher(cfg: &Config, token: Option<String>) -> Result<SharedFetcher> {
    Ok(if cfg.offline {
        Arc::new(SampleFetcher::new())
    } else {
        let http = HttpFetcher::new(&cfg.api_base, token.clone(), cfg.request_timeout_ms)?;
        Arc::new(CachingFetcher::new(http, token.as_deref()))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let prefs_path = prefs::default_path();
    let saved = prefs::load(&prefs_path);
    let cfg = config::load(&saved)?;

    let fetcher = make_fetcher(&cfg, cfg.token.clone())?;

    if cfg.print {
        return run_print(&cfg, fetcher).await;
    }

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, &cfg, fetcher).await;
    restore_terminal(&mut terminal)?;

    let final_prefs = result?;
    if let Err(e) = prefs::save(&prefs_path, &final_prefs) {
        log::warn!("[prefs] not saved: {e:#}");
    }
    Ok(())
}

/// One-shot mode: look up the ID, print the card markup, exit. Exit status
/// is nonzero when the card is an error.
async fn run_print(cfg: &Config, fetcher: SharedFetcher) -> Result<()> {
    // --print requires an ID; config::resolve enforced that.
    let id = cfg.initial_id.as_deref().unwrap_or_default().trim().to_string();
    let view = if !snowflake::is_valid_id(&id) {
        CardView::Error(card::validation_card(cfg.kind))
    } else {
        match fetcher.fetch(cfg.kind, &id).await {
            Ok(profile) => card::profile_card(&profile),
            Err(err) => CardView::Error(card::error_card(cfg.kind, &err)),
        }
    };
    println!("{}", markup::render(&view));
    if matches!(view, CardView::Error(_)) {
        std::process::exit(1);
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cfg: &Config,
    fetcher: SharedFetcher,
) -> Result<Prefs> {
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(cfg, fetcher, tx);
    let mut token = cfg.token.clone();

    if cfg.initial_id.is_some() {
        app.submit();
    }

    loop {
        app.tick_spinner();
        terminal.draw(|f| ui::draw(f, &app))?;

        let frame_start = Instant::now();
        loop {
            let wait = FRAME_BUDGET.saturating_sub(frame_start.elapsed());
            if !event::poll(wait)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(&mut app, key.code, key.modifiers);
            }
            if app.quit_flag() {
                break;
            }
        }

        // Lookup completions; stale tokens are dropped inside on_event.
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        app.maybe_auto_submit();

        // Token changes rebuild the fetch client so the next lookup runs
        // under the new credential (and a fresh cache).
        if let Some(change) = app.take_pending_token_change() {
            token = change;
            app.set_fetcher(make_fetcher(cfg, token.clone())?);
        }

        if app.quit_flag() {
            break;
        }
    }

    Ok(Prefs {
        theme: Some(app.theme_name().to_string()),
        reduce_motion: Some(app.reduce_motion()),
        token,
    })
}

fn handle_key(app: &mut App, code: KeyCode, mods: KeyModifiers) {
    if code == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.input_mode() {
        InputMode::EditId => match code {
            KeyCode::Esc => app.stop_edit(),
            KeyCode::Enter => app.submit(),
            KeyCode::Tab => app.toggle_kind(),
            KeyCode::Backspace => app.input_backspace(),
            KeyCode::Char('u') if mods.contains(KeyModifiers::CONTROL) => app.input_clear(),
            KeyCode::Char(c) if !mods.contains(KeyModifiers::CONTROL) => app.input_char(c),
            _ => {}
        },
        InputMode::EditToken => match code {
            KeyCode::Esc => app.stop_edit(),
            KeyCode::Enter => app.token_save(),
            KeyCode::Backspace => app.token_backspace(),
            KeyCode::Char(c) if !mods.contains(KeyModifiers::CONTROL) => app.token_char(c),
            _ => {}
        },
        InputMode::Normal => match code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('/') => app.start_edit(),
            KeyCode::Tab => app.toggle_kind(),
            KeyCode::Enter => app.submit(),
            KeyCode::Char('t') => app.cycle_theme(),
            KeyCode::Char('r') => app.toggle_reduce_motion(),
            KeyCode::Char('b') => app.start_token_edit(),
            KeyCode::Char('x') if mods.contains(KeyModifiers::CONTROL) => app.token_clear(),
            KeyCode::Char('c') => {
                let markup = app.copy_markup();
                if copy_to_clipboard(&markup) {
                    app.show_toast("Card markup copied");
                } else {
                    app.show_toast("Clipboard unavailable");
                }
            }
            KeyCode::Char('y') => {
                let id = app.input().trim().to_string();
                if id.is_empty() {
                    app.show_toast("Nothing to copy");
                } else if copy_to_clipboard(&id) {
                    app.show_toast("ID copied");
                } else {
                    app.show_toast("Clipboard unavailable");
                }
            }
            KeyCode::Char('j') | KeyCode::Right => app.feature_down(),
            KeyCode::Char('k') | KeyCode::Left => app.feature_up(),
            KeyCode::Down => app.scroll_down(),
            KeyCode::Up => app.scroll_up(),
            _ => {}
        },
    }
}
