//! Character pieces: per-class stat blocks, the mutable health gauge, and the
//! validating mutation surface.
//!
//! # Design Principles
//!
//! 1. **Closed polymorphism**: behavior dispatches on [`ClassKind`] instead of
//!    a trait-object hierarchy; the combat and action modules match on it.
//! 2. **Validated mutation**: stat setters return errors instead of clamping;
//!    the health gauge reserves a distinct death signal for crossing zero.
//! 3. **Identity by id**: the board references characters by [`CharacterId`],
//!    so legality checks compare ids rather than addresses.

mod class;

pub use class::{ClassKind, ClassPreset, Faction};

use std::fmt;

use crate::error::{CharacterDeath, StatError};
use crate::state::CharacterId;

/// A single playing piece with its mutable stat state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    id: CharacterId,
    class: ClassKind,
    faction: Faction,
    max_health: u32,
    /// Current hit points. Zero means the piece is down.
    health: u32,
    attack: u32,
    defense: u32,
    move_range: u32,
    attack_range: u32,
    heal_available: bool,
}

impl Character {
    /// Creates a character from its class preset, at full health.
    pub fn new(id: CharacterId, class: ClassKind) -> Self {
        let preset = class.preset();
        Self {
            id,
            class,
            faction: class.faction(),
            max_health: preset.max_health,
            health: preset.max_health,
            attack: preset.attack,
            defense: preset.defense,
            move_range: preset.move_range,
            attack_range: preset.attack_range,
            heal_available: preset.heal_available,
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn class(&self) -> ClassKind {
        self.class
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Current health gauge. Combat damage reduces this, never `max_health`.
    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn defense(&self) -> u32 {
        self.defense
    }

    pub fn move_range(&self) -> u32 {
        self.move_range
    }

    pub fn attack_range(&self) -> u32 {
        self.attack_range
    }

    /// Whether the one-shot revive charge is still unspent.
    pub fn heal_available(&self) -> bool {
        self.heal_available
    }

    /// Quick check whether the piece is out of the fight.
    #[inline]
    pub fn is_down(&self) -> bool {
        self.health == 0
    }

    /// Reassigns allegiance. Used when a raised corpse defects.
    pub fn set_faction(&mut self, faction: Faction) {
        self.faction = faction;
    }

    /// Sets the health gauge.
    ///
    /// A negative value marks the piece down (the gauge becomes zero) and
    /// returns the death signal; the caller is responsible for retiring the
    /// piece from active play.
    pub fn set_health(&mut self, value: i32) -> Result<(), CharacterDeath> {
        if value < 0 {
            self.health = 0;
            return Err(CharacterDeath {
                id: self.id,
                class: self.class,
            });
        }
        self.health = value as u32;
        Ok(())
    }

    /// Reduces the health gauge by `amount`, signalling death when the gauge
    /// would cross below zero.
    pub fn apply_damage(&mut self, amount: u32) -> Result<(), CharacterDeath> {
        self.set_health(self.health as i32 - amount as i32)
    }

    /// Replaces the attack and defense dice pools.
    pub fn set_combat(&mut self, attack: u32, defense: u32) {
        self.attack = attack;
        self.defense = defense;
    }

    pub fn set_move_range(&mut self, value: u32) -> Result<(), StatError> {
        if value == 0 {
            return Err(StatError::ZeroMoveRange);
        }
        self.move_range = value;
        Ok(())
    }

    pub fn set_attack_range(&mut self, value: u32) -> Result<(), StatError> {
        if value == 0 {
            return Err(StatError::ZeroAttackRange);
        }
        self.attack_range = value;
        Ok(())
    }

    /// Restores the gauge to a known non-negative value (raise/revive path).
    pub(crate) fn restore_health(&mut self, value: u32) {
        self.health = value;
    }

    pub(crate) fn spend_heal_charge(&mut self) {
        self.heal_available = false;
    }

    pub(crate) fn assign_id(&mut self, id: CharacterId) {
        self.id = id;
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.class, self.faction)
    }
}
