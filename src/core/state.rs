//! # Application State
//!
//! Core study state for Flashdeck. Domain logic only, no TUI types.
//! Presentation state (scroll offsets, render caches, overlays) lives in the
//! `tui` module.
//!
//! ```text
//! App
//! ├── deck: Deck                    // fixed, validated card sequence
//! ├── index: usize                  // current card, always < deck.len()
//! ├── flipped: bool                 // showing the back?
//! ├── pending: Option<usize>        // target of a scheduled card transition
//! ├── transition_delay: Duration    // cosmetic delay before advancing
//! ├── engine: EngineSlot            // lazily loaded highlighting engine
//! ├── status_message: String        // status bar text
//! └── completions: u32              // times the deck has been finished
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::time::Duration;

use crate::core::card::{Card, Deck};
use crate::core::config::ResolvedConfig;
use crate::highlight::EngineSlot;

pub const DEFAULT_TRANSITION_DELAY: Duration = Duration::from_millis(200);

pub struct App {
    pub deck: Deck,
    pub(crate) index: usize,
    pub(crate) flipped: bool,
    pub(crate) pending: Option<usize>,
    pub transition_delay: Duration,
    pub engine: EngineSlot,
    pub status_message: String,
    pub completions: u32,
}

impl App {
    pub fn new(deck: Deck) -> Self {
        Self {
            status_message: format!("Studying {}", deck.title()),
            deck,
            index: 0,
            flipped: false,
            pending: None,
            transition_delay: DEFAULT_TRANSITION_DELAY,
            engine: EngineSlot::new(),
            completions: 0,
        }
    }

    pub fn from_config(deck: Deck, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(deck);
        app.transition_delay = config.transition_delay;
        app
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// True while a delayed advance is waiting to be committed.
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current_card(&self) -> &Card {
        // index is kept < deck.len() by every transition, and decks are never empty
        &self.deck.cards()[self.index]
    }

    /// 1-based position for display.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn total(&self) -> usize {
        self.deck.len()
    }

    /// Return to the initial state and drop the highlighting engine.
    pub(crate) fn reload(&mut self) {
        self.index = 0;
        self.flipped = false;
        self.pending = None;
        self.engine.reset();
        self.status_message = String::from("Reloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app(3);
        assert_eq!(app.index(), 0);
        assert!(!app.is_flipped());
        assert!(!app.is_transitioning());
        assert_eq!(app.transition_delay, DEFAULT_TRANSITION_DELAY);
        assert_eq!(app.status_message, "Studying Test Deck");
    }

    #[test]
    fn test_position_is_one_based() {
        let mut app = test_app(4);
        assert_eq!(app.position(), 1);
        assert_eq!(app.total(), 4);
        app.index = 3;
        assert_eq!(app.position(), 4);
    }

    #[test]
    fn test_reload_resets_everything() {
        let mut app = test_app(4);
        app.index = 2;
        app.flipped = true;
        app.pending = Some(3);
        app.engine.begin();
        app.reload();
        assert_eq!(app.index(), 0);
        assert!(!app.is_flipped());
        assert!(!app.is_transitioning());
        assert_eq!(app.engine.generation(), 1);
        assert_eq!(app.engine.phase(), crate::highlight::EnginePhase::Uninitialized);
    }
}
