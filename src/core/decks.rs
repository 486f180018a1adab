//! Built-in decks, compiled into the binary as JSON documents.

use log::debug;
use serde::Deserialize;

use crate::DeckName;
use crate::core::card::{Card, Deck, DeckError};

const REACT_BEGINNER: &str = include_str!("decks/react_beginner.json");
const SAMPLE: &str = include_str!("decks/sample.json");

#[derive(Deserialize)]
struct DeckDocument {
    title: String,
    cards: Vec<Card>,
}

/// Parse and validate one of the built-in decks.
pub fn load(name: DeckName) -> Result<Deck, DeckError> {
    let source = match name {
        DeckName::ReactBeginner => REACT_BEGINNER,
        DeckName::Sample => SAMPLE,
    };
    let doc: DeckDocument = serde_json::from_str(source).map_err(DeckError::Parse)?;
    debug!("Loaded deck {:?}: {} cards", name, doc.cards.len());
    Deck::new(doc.title, doc.cards)
}
