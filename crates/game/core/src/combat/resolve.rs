//! Attack-exchange resolution: per-class dice layering and damage adjustment.

use crate::character::{Character, ClassKind};
use crate::config::GameConfig;
use crate::error::CharacterDeath;
use crate::state::CharacterId;

use super::dice::{DiceRole, DiceSource, count_successes};

/// Computes a character's dice successes against `target`.
///
/// When `rolls` is supplied it is counted verbatim (determinism hook);
/// otherwise a fresh pool of `attack` or `defense` dice, depending on
/// `role`, is rolled from `dice`.
///
/// A Warrior attacking a Goblin layers two bonus attack dice on top of the
/// base pool: `bonus_rolls` when supplied, freshly rolled otherwise.
pub fn combat_dice(
    actor: &Character,
    target: &Character,
    role: DiceRole,
    rolls: Option<&[u8]>,
    bonus_rolls: Option<&[u8]>,
    dice: &DiceSource<'_>,
) -> u32 {
    let base = match rolls {
        Some(rolls) => count_successes(rolls, role),
        None => {
            let pool_size = match role {
                DiceRole::Attack => actor.attack(),
                DiceRole::Defense => actor.defense(),
            };
            count_successes(&dice.roll_pool(pool_size, 0), role)
        }
    };

    let goblin_slayer = role == DiceRole::Attack
        && actor.class() == ClassKind::Warrior
        && target.class() == ClassKind::Goblin;
    if !goblin_slayer {
        return base;
    }

    let bonus = match bonus_rolls {
        Some(rolls) => count_successes(rolls, DiceRole::Attack),
        None => {
            // Bonus dice continue the context sequence after the base pool.
            let pool = dice.roll_pool(GameConfig::WARRIOR_BONUS_DICE, actor.attack());
            count_successes(&pool, DiceRole::Attack)
        }
    };

    base + bonus
}

/// Applies the attacker's class modifier to a raw damage amount.
///
/// Mages hit one harder on any successful attack; Rangers hit Skeletons one
/// softer, clamped to non-negative.
pub fn adjust_damage(attacker: &Character, target: &Character, amount: u32) -> u32 {
    match attacker.class() {
        ClassKind::Mage => amount + 1,
        ClassKind::Ranger if target.class() == ClassKind::Skeleton => amount.saturating_sub(1),
        _ => amount,
    }
}

/// Deals adjusted damage to `target`, emitting the damage notification.
///
/// Returns the applied amount, or the death signal when the hit drives the
/// target's gauge below zero (the gauge is left at zero).
pub fn deal_damage(
    attacker: &Character,
    target: &mut Character,
    amount: u32,
) -> Result<u32, CharacterDeath> {
    let applied = adjust_damage(attacker, target, amount);
    tracing::info!("{target} was dealt {applied} damage by {attacker}");
    target.apply_damage(applied)?;
    Ok(applied)
}

/// Outcome of one resolved attack exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeReport {
    pub attacker: CharacterId,
    pub defender: CharacterId,
    pub attack_successes: u32,
    pub defense_successes: u32,
    /// Damage actually applied, `None` when the defender blocked.
    pub damage: Option<u32>,
}

/// Resolves a full exchange: attacker's attack pool against the defender's
/// defense pool, surplus successes dealt as damage.
///
/// Both pools roll freshly from their dice sources; use [`combat_dice`]
/// directly when scripting rolls. A lethal hit surfaces as the death signal
/// after the damage has been applied.
pub fn resolve_exchange(
    attacker: &Character,
    defender: &mut Character,
    attacker_dice: &DiceSource<'_>,
    defender_dice: &DiceSource<'_>,
) -> Result<ExchangeReport, CharacterDeath> {
    let attack_successes = combat_dice(attacker, defender, DiceRole::Attack, None, None, attacker_dice);
    let defense_successes =
        combat_dice(defender, attacker, DiceRole::Defense, None, None, defender_dice);

    let mut report = ExchangeReport {
        attacker: attacker.id(),
        defender: defender.id(),
        attack_successes,
        defense_successes,
        damage: None,
    };

    if attack_successes > defense_successes {
        let applied = deal_damage(attacker, defender, attack_successes - defense_successes)?;
        report.damage = Some(applied);
    } else {
        tracing::info!("{defender} took no damage from {attacker}");
    }

    Ok(report)
}
