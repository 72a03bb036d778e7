//! The two range-gated special abilities: raise-dead and revive.
//!
//! Both bring a defeated piece back at half its maximum health, gated by the
//! actor's attack range as a Manhattan distance between the supplied
//! coordinates. A failed precondition leaves every piece untouched.

use crate::character::{Character, ClassKind, Faction};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Board, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityError {
    #[error("{class} cannot use this ability")]
    WrongClass { class: ClassKind },

    #[error("target is still standing")]
    TargetAlive,

    #[error("distance {distance} exceeds range {range}")]
    OutOfRange { distance: u32, range: u32 },

    #[error("the heal charge is already spent")]
    ChargeSpent,

    #[error("the target is not at {position}")]
    TargetMismatch { position: Position },
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// Necromancer ability: raises a defeated character into the villain faction
/// at half its maximum health.
///
/// The target does not need to stand on the board; the range gate runs over
/// the supplied coordinates.
pub fn raise_dead(
    actor: &Character,
    target: &mut Character,
    from: Position,
    to: Position,
) -> Result<(), AbilityError> {
    if actor.class() != ClassKind::Necromancer {
        return Err(AbilityError::WrongClass {
            class: actor.class(),
        });
    }
    if !target.is_down() {
        return Err(AbilityError::TargetAlive);
    }
    let distance = from.manhattan(to);
    if distance > actor.attack_range() {
        return Err(AbilityError::OutOfRange {
            distance,
            range: actor.attack_range(),
        });
    }

    if target.faction() != Faction::Villain {
        target.set_faction(Faction::Villain);
    }
    target.restore_health(target.max_health() / 2);
    tracing::info!("{target} was raised into the villain ranks");
    Ok(())
}

/// Paladin ability: revives an ally at half its maximum health, consuming the
/// one-shot heal charge. The target must occupy `to`.
pub fn revive(
    actor: &mut Character,
    target: &mut Character,
    from: Position,
    to: Position,
    board: &Board,
) -> Result<(), AbilityError> {
    if actor.class() != ClassKind::Paladin {
        return Err(AbilityError::WrongClass {
            class: actor.class(),
        });
    }
    if !actor.heal_available() {
        return Err(AbilityError::ChargeSpent);
    }
    if board.occupant(to) != Some(target.id()) {
        return Err(AbilityError::TargetMismatch { position: to });
    }
    let distance = from.manhattan(to);
    if distance > actor.attack_range() {
        return Err(AbilityError::OutOfRange {
            distance,
            range: actor.attack_range(),
        });
    }

    target.restore_health(target.max_health() / 2);
    actor.spend_heal_charge();
    tracing::info!("{target} was revived");
    Ok(())
}
