//! Common error infrastructure for skirmish-core.
//!
//! Domain-specific errors (`MoveError`, `AttackError`, `AbilityError`, ...)
//! live next to the operations they validate; this module provides the shared
//! severity taxonomy plus the two cross-cutting signals: stat validation
//! failures and the character-death signal.

use crate::character::ClassKind;
use crate::state::CharacterId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller may retry with a different action.
    ///
    /// Examples: destination occupied, revive target out of range
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: out-of-range board dimensions, zero move range
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: a board cell referencing an id missing from both rosters.
    /// These indicate bugs and should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all skirmish-core errors.
///
/// Use `#[derive(thiserror::Error)]` for the Display/Error impl and classify
/// severity based on recoverability, not impact.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;
}

/// Death signal raised when a character's health gauge is driven negative.
///
/// This is deliberately *not* a [`GameError`]: it marks a terminal
/// entity-lifecycle event rather than a programming mistake or bad input.
/// Callers must catch it and retire the character from active play; the
/// engine does not remove the piece from the board on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{class} {id} is down")]
pub struct CharacterDeath {
    /// The character whose gauge crossed zero.
    pub id: CharacterId,
    /// Class of the fallen character, for reporting.
    pub class: ClassKind,
}

/// Rejected stat mutation. Raised at the point of assignment, never clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatError {
    #[error("move range must be positive")]
    ZeroMoveRange,

    #[error("attack range must be positive")]
    ZeroAttackRange,
}

impl GameError for StatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}
