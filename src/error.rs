//! Core error taxonomy (spec §7).
//!
//! The core never swallows errors silently; per-item failures inside a
//! batch are accumulated and returned alongside successes rather than
//! aborting the whole operation (planner, CSV import).

use std::fmt;

/// Errors the core can report to its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Missing required field, negative dimension, priority out of range,
    /// malformed date. Reported synchronously; no state change.
    InputInvalid(String),
    /// Item or container id absent.
    NotFound(String),
    /// The planner could not place an item anywhere.
    NoFit(String),
    /// A manual placement would violate containment or overlap.
    Conflict(String),
    /// Persistence error surfaced by the collaborator, propagated without retry.
    StoreFailure(String),
}

impl CoreError {
    pub fn input_invalid(msg: impl Into<String>) -> Self {
        Self::InputInvalid(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn no_fit(msg: impl Into<String>) -> Self {
        Self::NoFit(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Stable machine-readable tag, used by the HTTP layer to pick a status code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputInvalid(_) => "InputInvalid",
            Self::NotFound(_) => "NotFound",
            Self::NoFit(_) => "NoFit",
            Self::Conflict(_) => "Conflict",
            Self::StoreFailure(_) => "StoreFailure",
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputInvalid(msg) => write!(f, "invalid input: {}", msg),
            Self::NotFound(msg) => write!(f, "not found: {}", msg),
            Self::NoFit(msg) => write!(f, "no fit: {}", msg),
            Self::Conflict(msg) => write!(f, "conflict: {}", msg),
            Self::StoreFailure(msg) => write!(f, "store failure: {}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<String> for CoreError {
    fn from(msg: String) -> Self {
        Self::InputInvalid(msg)
    }
}
