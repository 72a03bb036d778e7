//! Movement legality.
//!
//! All pieces share the generic checks (bounds, distinct cells, the actor
//! actually standing on `from`, an empty destination) plus axis alignment.
//! Villains additionally slide rook-style: bounded per axis by their move
//! range and blocked by any piece on the strictly-between path. Heroes carry
//! no range or path constraint beyond alignment.

use crate::character::{Character, Faction};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Board, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("{position} is outside the board")]
    OutOfBounds { position: Position },

    #[error("origin and destination are the same cell")]
    SamePosition,

    #[error("the acting character is not at {position}")]
    NotActor { position: Position },

    #[error("destination {destination} is occupied")]
    DestinationOccupied { destination: Position },

    #[error("movement must be purely horizontal or vertical")]
    NotAxisAligned,

    #[error("distance {distance} exceeds move range {range}")]
    ExceedsRange { distance: u32, range: u32 },

    #[error("path is blocked at {position}")]
    PathBlocked { position: Position },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// Checks whether `actor` may move from `from` to `to` on `board`.
pub fn validate_move(
    actor: &Character,
    from: Position,
    to: Position,
    board: &Board,
) -> Result<(), MoveError> {
    for position in [from, to] {
        if !board.contains(position) {
            return Err(MoveError::OutOfBounds { position });
        }
    }
    if from == to {
        return Err(MoveError::SamePosition);
    }
    if board.occupant(from) != Some(actor.id()) {
        return Err(MoveError::NotActor { position: from });
    }
    if board.occupant(to).is_some() {
        return Err(MoveError::DestinationOccupied { destination: to });
    }
    if from.x != to.x && from.y != to.y {
        return Err(MoveError::NotAxisAligned);
    }

    match actor.faction() {
        // Heroes keep only the alignment constraint.
        Faction::Hero => Ok(()),
        Faction::Villain => {
            let dx = from.x.abs_diff(to.x);
            let dy = from.y.abs_diff(to.y);
            if dx > actor.move_range() || dy > actor.move_range() {
                return Err(MoveError::ExceedsRange {
                    distance: dx.max(dy),
                    range: actor.move_range(),
                });
            }
            for position in path_between(from, to) {
                if board.occupant(position).is_some() {
                    return Err(MoveError::PathBlocked { position });
                }
            }
            Ok(())
        }
    }
}

/// Convenience predicate over [`validate_move`].
pub fn is_valid_move(actor: &Character, from: Position, to: Position, board: &Board) -> bool {
    validate_move(actor, from, to, board).is_ok()
}

/// Cells strictly between two axis-aligned positions, in travel order.
fn path_between(from: Position, to: Position) -> Vec<Position> {
    let mut path = Vec::new();
    if from.x == to.x {
        let step = if to.y > from.y { 1 } else { -1 };
        let mut y = from.y + step;
        while y != to.y {
            path.push(Position::new(from.x, y));
            y += step;
        }
    } else {
        let step = if to.x > from.x { 1 } else { -1 };
        let mut x = from.x + step;
        while x != to.x {
            path.push(Position::new(x, from.y));
            x += step;
        }
    }
    path
}
