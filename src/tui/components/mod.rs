//! # TUI Components
//!
//! This module contains all UI components for the study screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as props:
//! - `Header`: back button, deck title, placeholder buttons
//! - `Progress`: progress bar and `position | total`
//! - `Footer`: the three assessment buttons
//!
//! ### Stateful Components (Persistent State + Transient Wrapper)
//!
//! State lives in `TuiState`; the wrapper is built each frame around a
//! borrowed `&mut` state:
//! - `CardView` / `CardViewState`: card frame, scrolling
//! - `CodeDisplay` / `CodeDisplayState`: markdown and code rendering with
//!   highlighter fallback
//!
//! ### Overlays
//!
//! - `CompletionNotice`: blocking modal shown when the deck wraps
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── header.rs        (Top bar)
//! ├── progress.rs      (Progress bar)
//! ├── card_view.rs     (Card frame with scrolling)
//! ├── code_display.rs  (Answer renderer)
//! ├── footer.rs        (Assessment buttons)
//! └── notice.rs        (Completion modal)
//! ```

pub mod card_view;
pub mod code_display;
pub mod footer;
pub mod header;
pub mod notice;
pub mod progress;

pub use card_view::{CardView, CardViewState};
pub use code_display::{CodeDisplay, CodeDisplayState};
pub use footer::Footer;
pub use header::Header;
pub use notice::{CompletionNotice, NoticeEvent};
pub use progress::Progress;
