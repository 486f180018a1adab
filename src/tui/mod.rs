//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (engine loading, card transition pending): draws every
//!   ~80ms so the skeleton pulses and the transition commits on time.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! ## Effects
//!
//! `core::update` returns an `Effect`; this module performs it:
//!
//! - `ScheduleTransition(d)`: commit the pending card change after `d`
//! - `DeckCompleted`: open the completion notice
//! - `LoadEngine(generation)`: load the highlighter on a background task
//! - `Reload`: throw away all presentation state and start fresh

mod component;
pub mod components;
pub mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::decks;
use crate::core::state::App;
use crate::highlight::{EngineLoader, SyntectLoader};
use crate::tui::component::EventHandler;
use crate::tui::components::{CardViewState, CompletionNotice, NoticeEvent};
use crate::tui::event::{Command, TuiEvent, command_for, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::ScreenLayout;

const ANIMATION_TICK: Duration = Duration::from_millis(80);
const IDLE_TICK: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core study logic).
/// Rebuilt from scratch on `Effect::Reload`.
#[derive(Default)]
pub struct TuiState {
    pub card: CardViewState,
    /// Completion notice overlay (None = hidden)
    pub notice: Option<CompletionNotice>,
    /// Clickable regions from the last frame
    pub(crate) layout: ScreenLayout,
    // Animation state
    pub pulse_value: f32,
    /// When the pending card transition should commit.
    pub transition_due: Option<Instant>,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, Hide)?;
        info!("Terminal modes enabled (mouse capture, hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, Show);
    }
}

/// What effects need beyond `App` and `TuiState`.
struct Runtime {
    loader: Arc<dyn EngineLoader>,
    tx: mpsc::Sender<Action>,
    prewarm: bool,
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let deck = decks::load(config.deck).map_err(std::io::Error::other)?;
    info!("Loaded deck '{}' ({} cards)", deck.title(), deck.len());

    let mut app = App::from_config(deck, &config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let runtime = Runtime {
        loader: Arc::new(SyntectLoader::new(config.theme.clone())),
        tx,
        prewarm: config.prewarm_highlighter,
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e))
        .ok();

    if runtime.prewarm {
        dispatch(&mut app, &mut tui, &runtime, Action::RequestEngine);
    }

    // Animation timer
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.engine.is_loading() || app.is_transitioning();
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;

            // A skeleton went up: start loading the engine it's waiting for.
            if app.is_flipped() && tui.card.code.wants_engine && !app.engine.is_loading() {
                dispatch(&mut app, &mut tui, &runtime, Action::RequestEngine);
                needs_redraw = true;
            }
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle,
        // never past a pending transition.
        let mut timeout = if animating { ANIMATION_TICK } else { IDLE_TICK };
        if let Some(due) = tui.transition_due {
            timeout = timeout.min(due.saturating_duration_since(Instant::now()));
        }
        let first_event = poll_event_timeout(timeout)?;

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        let pending = std::iter::from_fn(|| poll_event_immediate().ok().flatten());
        for event in first_event.into_iter().chain(pending) {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // ForceQuit (Ctrl+C) always quits, even with the notice open
            if matches!(event, TuiEvent::ForceQuit) {
                should_quit |= dispatch(&mut app, &mut tui, &runtime, Action::Quit);
                continue;
            }

            // The completion notice swallows everything until dismissed
            if let Some(notice) = &tui.notice {
                if notice.handle_event(&event) == Some(NoticeEvent::Dismiss) {
                    debug!("Completion notice dismissed");
                    tui.notice = None;
                }
                continue;
            }

            // Scroll events go to the card view
            if matches!(
                event,
                TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown
                    | TuiEvent::ScrollToTop
            ) {
                tui.card.handle_event(&event);
                continue;
            }

            if let TuiEvent::MouseClick(column, row) = event {
                if let Some(action) = ui::hit_test(&tui.layout, column, row) {
                    should_quit |= dispatch(&mut app, &mut tui, &runtime, action);
                }
                continue;
            }

            match command_for(&event) {
                Some(Command::Core(action)) => {
                    should_quit |= dispatch(&mut app, &mut tui, &runtime, action);
                }
                Some(Command::Retry) => {
                    if ui::fallback_visible(&app, &tui) {
                        tui.card.code.retry();
                        should_quit |= dispatch(&mut app, &mut tui, &runtime, Action::Reload);
                    }
                }
                None => {}
            }
        }

        if should_quit {
            break;
        }

        // Commit the scheduled card transition once its delay has passed
        if let Some(due) = tui.transition_due
            && Instant::now() >= due
        {
            tui.transition_due = None;
            dispatch(&mut app, &mut tui, &runtime, Action::CommitTransition);
            needs_redraw = true;
        }

        // Handle background task actions (engine loads)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            dispatch(&mut app, &mut tui, &runtime, action);
        }
    }

    ratatui::restore();
    Ok(())
}

/// Apply an action and perform its effect. Returns true when the app should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, runtime: &Runtime, action: Action) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::ScheduleTransition(delay) => {
            tui.transition_due = Some(Instant::now() + delay);
            false
        }
        Effect::DeckCompleted => {
            tui.transition_due = None;
            tui.notice = Some(CompletionNotice::new(app.deck.title(), app.completions));
            false
        }
        Effect::LoadEngine(generation) => {
            spawn_engine_load(Arc::clone(&runtime.loader), generation, runtime.tx.clone());
            false
        }
        Effect::Reload => {
            *tui = TuiState::new();
            if runtime.prewarm {
                return dispatch(app, tui, runtime, Action::RequestEngine);
            }
            false
        }
    }
}

fn spawn_engine_load(loader: Arc<dyn EngineLoader>, generation: u64, tx: mpsc::Sender<Action>) {
    info!(
        "Spawning engine load: {} (generation {})",
        loader.name(),
        generation
    );
    tokio::spawn(async move {
        let result = loader.load().await;
        if tx.send(Action::EngineLoaded { generation, result }).is_err() {
            warn!(
                "Failed to send engine load result (generation {}): receiver dropped",
                generation
            );
        }
    });
}
