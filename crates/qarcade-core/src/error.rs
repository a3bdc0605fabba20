//! Error taxonomy shared by every layer of the arcade.

use thiserror::Error;

/// Errors surfaced by the measurement engine and the games built on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArcadeError {
    /// A protected (Paired) value was read or forced early and collapsed.
    #[error("Quantum eavesdropping error: {0}")]
    TamperDetected(&'static str),
    /// Caller broke a sampling or configuration contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A guess arrived before any cards were dealt for the session.
    #[error("No cards have been dealt yet.")]
    NoActiveDeal,
    /// The OS refused to hand out seed material.
    #[error("Entropy unavailable: {0}")]
    Entropy(String),
    /// Anything else. Never carries partial game state.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArcadeError {
    /// Whether this error should be reported as a soft payload rather than
    /// a failed request.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::NoActiveDeal)
    }
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
