//! Deterministic rules engine for a two-faction grid skirmish.
//!
//! `skirmish-core` defines the canonical rules (character classes, dice
//! combat, and the dungeon session state machine) and exposes pure APIs for
//! an external front end to drive. All board mutation flows through
//! [`dungeon::Dungeon`]; every random draw flows through an injected
//! [`env::RngOracle`], so whole sessions replay from a single seed and tests
//! can script each die face.

pub mod action;
pub mod character;
pub mod combat;
pub mod config;
pub mod dungeon;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    AbilityError, AttackError, MoveError, is_valid_attack, is_valid_move, raise_dead, revive,
    validate_attack, validate_move,
};
pub use character::{Character, ClassKind, ClassPreset, Faction};
pub use combat::{
    DiceRole, DiceSource, ExchangeReport, adjust_damage, combat_dice, count_successes,
    deal_damage, resolve_exchange,
};
pub use config::GameConfig;
pub use dungeon::{Dungeon, DungeonError};
pub use env::{PcgRng, RngOracle, SequenceRng, compute_seed};
pub use error::{CharacterDeath, ErrorSeverity, GameError, StatError};
pub use state::{Board, BoardError, CharacterId, Position, TurnState};
