//! Flashdeck library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod highlight;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Built-in decks selectable with `--deck`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DeckName {
    #[default]
    ReactBeginner,
    Sample,
}
