//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::card::{Card, Deck};
use crate::core::state::App;
use crate::highlight::{Fragment, HighlightError, HighlightedLine, Rgb, SyntaxEngine};

/// Colour every `StaticEngine` fragment carries, so tests can spot highlighted output.
pub const STATIC_COLOR: Rgb = Rgb(1, 2, 3);

/// An engine that "highlights" by colouring every line with `STATIC_COLOR`.
pub struct StaticEngine;

impl SyntaxEngine for StaticEngine {
    fn name(&self) -> &str {
        "static"
    }

    fn highlight(&self, _language: &str, code: &str) -> Result<Vec<HighlightedLine>, HighlightError> {
        Ok(code
            .lines()
            .map(|line| {
                vec![Fragment {
                    color: Some(STATIC_COLOR),
                    ..Fragment::plain(line)
                }]
            })
            .collect())
    }
}

/// An engine whose every render reports an error.
pub struct FailingEngine;

impl SyntaxEngine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    fn highlight(&self, language: &str, _code: &str) -> Result<Vec<HighlightedLine>, HighlightError> {
        Err(HighlightError::Engine {
            language: language.to_string(),
            message: "grammar failed to load".to_string(),
        })
    }
}

/// A deck of `n` plain cards with ids "1".."n".
pub fn test_deck(n: usize) -> Deck {
    let cards = (1..=n)
        .map(|i| Card::new(i.to_string(), format!("Question {i}"), format!("Answer {i}")))
        .collect();
    Deck::new("Test Deck", cards).expect("test deck is valid")
}

/// Creates a test App over `test_deck(n)`.
pub fn test_app(n: usize) -> App {
    App::new(test_deck(n))
}
