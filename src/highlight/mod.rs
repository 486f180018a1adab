pub mod engine;
pub mod loader;
pub mod syntect_engine;

pub use engine::{Fragment, HighlightError, HighlightedLine, Rgb, SyntaxEngine};
pub use loader::{EngineError, EngineLoader, EnginePhase, EngineSlot, EngineState};
pub use syntect_engine::{DEFAULT_THEME, SyntectEngine, SyntectLoader};
