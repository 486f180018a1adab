//! # Syntax Engine
//!
//! The trait every highlighting backend implements. Output is deliberately
//! UI-agnostic: lines of coloured text fragments, which the TUI converts into
//! ratatui spans.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A run of source text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub color: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
}

impl Fragment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
            italic: false,
        }
    }
}

/// One source line. An empty vec is a blank line.
pub type HighlightedLine = Vec<Fragment>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// The engine failed while highlighting a block.
    Engine { language: String, message: String },
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightError::Engine { language, message } => {
                write!(f, "failed to highlight {language} block: {message}")
            }
        }
    }
}

impl std::error::Error for HighlightError {}

/// Turns raw code plus a language tag into styled lines.
///
/// Implementations must treat an unrecognised language as plain text rather
/// than an error; errors are reserved for the engine itself misbehaving.
pub trait SyntaxEngine: Send + Sync {
    fn name(&self) -> &str;

    fn highlight(&self, language: &str, code: &str) -> Result<Vec<HighlightedLine>, HighlightError>;
}

impl fmt::Debug for dyn SyntaxEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyntaxEngine({})", self.name())
    }
}
