//! Combat resolution system.
//!
//! Dice-pool combat: the attacker rolls its attack pool, the defender its
//! defense pool, and surplus attack successes become damage. Success counting
//! and the per-class layers (bonus dice, damage adjustment) live here as
//! functions over [`crate::character::Character`] values; board orchestration
//! stays in [`crate::dungeon`].

mod dice;
mod resolve;

pub use dice::{DiceRole, DiceSource, count_successes};
pub use resolve::{ExchangeReport, adjust_damage, combat_dice, deal_damage, resolve_exchange};
