//! # Actions
//!
//! Everything that can happen in Flashdeck becomes an `Action`.
//! User flips the card? That's `Action::Flip`.
//! The highlighting engine finishes loading? That's `Action::EngineLoaded`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect` describing the I/O the caller should perform (start a timer, show
//! a notice, spawn a load). No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Navigation rules:
//!
//! - The flip flag is cleared before every index change, including the
//!   delayed one, so a flip never survives a card transition.
//! - Advancing past the last card reports `Effect::DeckCompleted` and wraps
//!   to the first card. The deck never ends.
//! - While a delayed advance is pending, navigation input is ignored.

use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use crate::core::state::App;
use crate::highlight::{EngineError, SyntaxEngine};

/// Self-assessment buttons in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    DontKnow,
    Familiar,
    Mastered,
}

impl Assessment {
    pub const ALL: [Assessment; 3] = [Assessment::DontKnow, Assessment::Familiar, Assessment::Mastered];

    pub fn label(self) -> &'static str {
        match self {
            Assessment::DontKnow => "Don't know",
            Assessment::Familiar => "Familiar",
            Assessment::Mastered => "Mastered",
        }
    }
}

/// Header buttons that have no behaviour yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderButton {
    Delete,
    Edit,
    Settings,
}

impl HeaderButton {
    pub const ALL: [HeaderButton; 3] = [HeaderButton::Delete, HeaderButton::Edit, HeaderButton::Settings];

    pub fn label(self) -> &'static str {
        match self {
            HeaderButton::Delete => "Delete",
            HeaderButton::Edit => "Edit",
            HeaderButton::Settings => "Settings",
        }
    }
}

#[derive(Debug)]
pub enum Action {
    Flip,
    Advance,
    Retreat,
    Assess(Assessment),
    Header(HeaderButton),
    /// The transition delay elapsed.
    CommitTransition,
    /// Something wants the highlighting engine; load it if nobody has yet.
    RequestEngine,
    EngineLoaded {
        generation: u64,
        result: Result<Arc<dyn SyntaxEngine>, EngineError>,
    },
    Reload,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Dispatch `CommitTransition` after this delay.
    ScheduleTransition(Duration),
    /// Show the blocking "deck completed" notice.
    DeckCompleted,
    /// Spawn an engine load tagged with this generation.
    LoadEngine(u64),
    /// Rebuild all presentation state.
    Reload,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Flip => {
            if app.pending.is_some() {
                return Effect::None;
            }
            app.flipped = !app.flipped;
            Effect::None
        }
        Action::Advance => advance(app),
        Action::Retreat => {
            if app.pending.is_some() || app.index == 0 {
                return Effect::None;
            }
            app.flipped = false;
            app.index -= 1;
            Effect::None
        }
        Action::Assess(assessment) => {
            // TODO: feed assessments into a review scheduler; until then every
            // button behaves exactly like Advance.
            info!("Card {} assessed as {:?}", app.current_card().id, assessment);
            advance(app)
        }
        Action::Header(button) => {
            debug!("{} button pressed (no-op)", button.label());
            Effect::None
        }
        Action::CommitTransition => {
            if let Some(target) = app.pending.take() {
                app.flipped = false;
                app.index = target;
            }
            Effect::None
        }
        Action::RequestEngine => match app.engine.begin() {
            Some(generation) => {
                app.status_message = String::from("Loading syntax highlighter...");
                Effect::LoadEngine(generation)
            }
            None => Effect::None,
        },
        Action::EngineLoaded { generation, result } => {
            let ok = result.is_ok();
            if app.engine.resolve(generation, result) {
                app.status_message = if ok {
                    String::from("Syntax highlighter ready")
                } else {
                    String::from("Syntax highlighter unavailable")
                };
            }
            Effect::None
        }
        Action::Reload => {
            info!("Reloading study session");
            app.reload();
            Effect::Reload
        }
        Action::Quit => Effect::Quit,
    }
}

fn advance(app: &mut App) -> Effect {
    if app.pending.is_some() {
        debug!("Advance ignored: transition already pending");
        return Effect::None;
    }
    app.flipped = false;

    if app.index < app.deck.last_index() {
        let target = app.index + 1;
        if app.transition_delay.is_zero() {
            app.index = target;
            return Effect::None;
        }
        app.pending = Some(target);
        return Effect::ScheduleTransition(app.transition_delay);
    }

    app.index = 0;
    app.completions += 1;
    app.status_message = format!("Deck completed ({}x)", app.completions);
    info!("Deck '{}' completed, wrapping to first card", app.deck.title());
    Effect::DeckCompleted
}
