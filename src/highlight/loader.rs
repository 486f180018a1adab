//! # Engine Loading
//!
//! The highlighting engine is expensive to build (syntax definitions and
//! themes are deserialized from embedded dumps), so it is loaded lazily and
//! off the UI thread. `EngineSlot` tracks the load as an explicit state
//! machine:
//!
//! ```text
//!   Uninitialized ──begin()──▶ Loading ──resolve(Ok)──▶ Ready
//!         ▲                       │
//!         │                       └──resolve(Err)─▶ Failed
//!         └──────────── reset() (new generation) ◀──────┘
//! ```
//!
//! Every load is tagged with the slot's generation. `reset()` bumps it, so a
//! load that resolves after a reload is recognised as stale and dropped.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;

use crate::highlight::engine::SyntaxEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    UnknownTheme(String),
    /// The blocking load task panicked or was cancelled.
    Join(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownTheme(name) => write!(f, "unknown highlighting theme: {name}"),
            EngineError::Join(e) => write!(f, "engine load task failed: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Produces a ready-to-use engine. Called at most once per slot generation.
#[async_trait]
pub trait EngineLoader: Send + Sync {
    fn name(&self) -> &str;

    async fn load(&self) -> Result<Arc<dyn SyntaxEngine>, EngineError>;
}

#[derive(Debug, Clone)]
pub enum EngineState {
    Uninitialized,
    Loading,
    Ready(Arc<dyn SyntaxEngine>),
    Failed(String),
}

/// Data-free view of `EngineState`, cheap to compare in memo keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct EngineSlot {
    state: EngineState,
    generation: u64,
}

impl Default for EngineSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineSlot {
    pub fn new() -> Self {
        Self {
            state: EngineState::Uninitialized,
            generation: 0,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> EnginePhase {
        match self.state {
            EngineState::Uninitialized => EnginePhase::Uninitialized,
            EngineState::Loading => EnginePhase::Loading,
            EngineState::Ready(_) => EnginePhase::Ready,
            EngineState::Failed(_) => EnginePhase::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, EngineState::Loading)
    }

    /// Start a load if none has been started for this generation.
    ///
    /// Returns the generation the caller must tag the result with, or `None`
    /// if a load is already in flight or finished.
    pub fn begin(&mut self) -> Option<u64> {
        if !matches!(self.state, EngineState::Uninitialized) {
            return None;
        }
        self.state = EngineState::Loading;
        debug!("Engine load started (generation {})", self.generation);
        Some(self.generation)
    }

    /// Apply a load result. Returns false (and changes nothing) when the result
    /// belongs to an earlier generation or no load is pending.
    pub fn resolve(
        &mut self,
        generation: u64,
        result: Result<Arc<dyn SyntaxEngine>, EngineError>,
    ) -> bool {
        if generation != self.generation || !self.is_loading() {
            debug!(
                "Ignoring stale engine result (generation {}, current {})",
                generation, self.generation
            );
            return false;
        }
        self.state = match result {
            Ok(engine) => {
                info!("Highlighting engine ready: {}", engine.name());
                EngineState::Ready(engine)
            }
            Err(e) => {
                warn!("Highlighting engine failed to load: {}", e);
                EngineState::Failed(e.to_string())
            }
        };
        true
    }

    /// Forget the current engine so the next `begin()` loads a fresh one.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = EngineState::Uninitialized;
        info!("Engine slot reset (generation {})", self.generation);
    }
}
