//! Attack legality.
//!
//! Ordinary attacks carry no distance restriction; only the raise/revive
//! abilities gate on attack range.

use crate::character::Character;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Board, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackError {
    #[error("{position} is outside the board")]
    OutOfBounds { position: Position },

    #[error("a piece cannot attack its own cell")]
    SamePosition,

    #[error("the acting character is not at {position}")]
    NotActor { position: Position },

    #[error("no target at {position}")]
    TargetEmpty { position: Position },
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// Checks whether `actor` may attack from `from` into `to` on `board`.
pub fn validate_attack(
    actor: &Character,
    from: Position,
    to: Position,
    board: &Board,
) -> Result<(), AttackError> {
    for position in [from, to] {
        if !board.contains(position) {
            return Err(AttackError::OutOfBounds { position });
        }
    }
    if from == to {
        return Err(AttackError::SamePosition);
    }
    if board.occupant(from) != Some(actor.id()) {
        return Err(AttackError::NotActor { position: from });
    }
    if board.occupant(to).is_none() {
        return Err(AttackError::TargetEmpty { position: to });
    }
    Ok(())
}

/// Convenience predicate over [`validate_attack`].
pub fn is_valid_attack(actor: &Character, from: Position, to: Position, board: &Board) -> bool {
    validate_attack(actor, from, to, board).is_ok()
}
