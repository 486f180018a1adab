//! # Core Application Logic
//!
//! This module contains Flashdeck's study logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Deck / Card (data)   │
//!                    │  • App (navigator)      │
//!                    │  • Action + update()    │
//!                    │  • Document (fences)    │
//!                    │                         │
//!                    │  No terminal. No I/O    │
//!                    │  beyond config files.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`card`]: `Card` and the validated `Deck`
//! - [`decks`]: built-in decks
//! - [`state`]: The `App` struct, the navigator state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`document`]: splitting answers into prose and fenced code
//! - [`memo`]: the memoization boundary used by the renderer
//! - [`config`]: config file and CLI resolution

pub mod action;
pub mod card;
pub mod config;
pub mod decks;
pub mod document;
pub mod memo;
pub mod state;
