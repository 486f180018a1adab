//! # Cards and Decks
//!
//! A `Deck` is a fixed, ordered, non-empty sequence of `Card`s. Decks are
//! validated once at construction and never mutated afterwards, so every
//! index the navigator holds stays meaningful for the whole session.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One question/answer unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Card {
    pub id: String,
    /// Plain question text.
    pub front: String,
    /// Markdown answer, may embed fenced code blocks.
    pub back: String,
    /// Default language for code blocks whose fence carries no tag.
    #[serde(default)]
    pub language: Option<String>,
}

impl Card {
    pub fn new(id: impl Into<String>, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            front: front.into(),
            back: back.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[derive(Debug)]
pub enum DeckError {
    Empty,
    DuplicateId(String),
    Parse(serde_json::Error),
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::Empty => write!(f, "deck has no cards"),
            DeckError::DuplicateId(id) => write!(f, "duplicate card id in deck: {id}"),
            DeckError::Parse(e) => write!(f, "deck parse error: {e}"),
        }
    }
}

impl std::error::Error for DeckError {}

#[derive(Debug, Clone)]
pub struct Deck {
    title: String,
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck, rejecting empty card lists and repeated ids.
    pub fn new(title: impl Into<String>, cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.is_empty() {
            return Err(DeckError::Empty);
        }
        let mut seen = HashSet::new();
        for card in &cards {
            if !seen.insert(card.id.as_str()) {
                return Err(DeckError::DuplicateId(card.id.clone()));
            }
        }
        Ok(Self {
            title: title.into(),
            cards,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Always at least 1.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.cards.len() - 1
    }
}
