//! Engine Error Types
//!
//! Three failure classes exist in the runtime core:
//!
//! - **Contract violations** - double initialize, missing required component,
//!   hierarchy cycles. Fatal for the current tick: [`Simulation::tick`]
//!   returns them immediately instead of continuing with corrupt state.
//! - **Not found** - child lookup or component query misses. Recoverable,
//!   the caller picks a fallback.
//! - **Duplicates** - a second component of the same kind or a second
//!   sibling with the same name. The scene is left unchanged.
//!
//! Degenerate input (zero-length vectors) is never an error; the affected
//! operation treats it as "no movement" / "no hit".
//!
//! [`Simulation::tick`]: crate::simulation::Simulation::tick

use thiserror::Error;

use crate::config::ConfigError;
use crate::scene::ComponentKind;

/// Result alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors produced by the scene, entity and simulation layers.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A caller broke an API contract. Halts the offending tick.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// A lookup missed.
    #[error("{what} not found")]
    NotFound { what: String },

    /// The object already holds a component of this kind.
    #[error("a {0:?} component is already attached")]
    DuplicateComponent(ComponentKind),

    /// The parent already has a child with this name.
    #[error("'{parent}' already has a child named '{name}'")]
    DuplicateChild { parent: String, name: String },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    pub(crate) fn contract(msg: impl Into<String>) -> Self {
        EngineError::ContractViolation(msg.into())
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        EngineError::NotFound { what: what.into() }
    }

    /// True for errors that must halt the current tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::ContractViolation(_))
    }
}
