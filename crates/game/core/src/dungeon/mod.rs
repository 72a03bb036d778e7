//! Dungeon session state machine.
//!
//! The [`Dungeon`] is the authoritative owner of a session: the board, the
//! fixed hero party, the villain roster, and turn bookkeeping. All board
//! mutation flows through it. Legality failures on ordinary moves and attacks
//! are dropped silently (the caller re-prompts); ability misuse surfaces as
//! typed errors; a lethal hit surfaces the death signal for the caller to
//! retire the piece from active play.

mod spawn;

use std::cmp::Ordering;

use arrayvec::ArrayVec;

use crate::action::{AbilityError, validate_attack, validate_move};
use crate::character::{Character, ClassKind, Faction};
use crate::combat::{DiceSource, ExchangeReport, resolve_exchange};
use crate::config::GameConfig;
use crate::env::{PcgRng, RngOracle};
use crate::error::{CharacterDeath, ErrorSeverity, GameError};
use crate::state::{Board, BoardError, CharacterId, Position, TurnState};

#[derive(Debug, thiserror::Error)]
pub enum DungeonError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("supplied villain roster contains a {class}, which is not a villain")]
    ForeignFaction { class: ClassKind },

    #[error("no character at {position}")]
    VacantCell { position: Position },

    #[error("no roster member has id {id}")]
    UnknownCharacter { id: CharacterId },

    #[error("board references {id} at {position} but no roster member matches")]
    RosterDesync { id: CharacterId, position: Position },

    #[error(transparent)]
    Ability(#[from] AbilityError),

    #[error(transparent)]
    Death(#[from] CharacterDeath),
}

impl GameError for DungeonError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Board(_) | Self::ForeignFaction { .. } | Self::VacantCell { .. } => {
                ErrorSeverity::Validation
            }
            Self::UnknownCharacter { .. } => ErrorSeverity::Validation,
            Self::RosterDesync { .. } => ErrorSeverity::Internal,
            Self::Ability(_) | Self::Death(_) => ErrorSeverity::Recoverable,
        }
    }
}

/// A running skirmish session.
pub struct Dungeon {
    board: Board,
    heroes: ArrayVec<Character, { GameConfig::HERO_PARTY_SIZE }>,
    villains: Vec<Character>,
    turn: TurnState,
    oracle: Box<dyn RngOracle>,
    game_seed: u64,
    /// Randomized-operation counter mixed into every seed.
    nonce: u64,
    next_id: u32,
}

impl Dungeon {
    /// Creates a session with a generated villain roster and the default
    /// PCG oracle.
    pub fn new(height: u32, width: u32, seed: u64) -> Result<Self, DungeonError> {
        Self::with_oracle(height, width, seed, Vec::new(), Box::new(PcgRng))
    }

    /// Creates a session with a pre-built villain roster. An empty roster
    /// falls back to generation.
    pub fn with_villains(
        height: u32,
        width: u32,
        seed: u64,
        villains: Vec<Character>,
    ) -> Result<Self, DungeonError> {
        Self::with_oracle(height, width, seed, villains, Box::new(PcgRng))
    }

    /// Fully-injected constructor: board dimensions, game seed, optional
    /// pre-built villains, and the randomness oracle.
    pub fn with_oracle(
        height: u32,
        width: u32,
        seed: u64,
        villains: Vec<Character>,
        oracle: Box<dyn RngOracle>,
    ) -> Result<Self, DungeonError> {
        let board = Board::new(height, width)?;
        let mut dungeon = Self {
            board,
            heroes: ArrayVec::new(),
            villains: Vec::new(),
            turn: TurnState::new(),
            oracle,
            game_seed: seed,
            nonce: 0,
            next_id: 0,
        };

        for class in [
            ClassKind::Warrior,
            ClassKind::Mage,
            ClassKind::Paladin,
            ClassKind::Ranger,
        ] {
            let id = dungeon.allocate_id();
            dungeon.heroes.push(Character::new(id, class));
        }

        if villains.is_empty() {
            dungeon.generate_villains();
        } else {
            dungeon.adopt_villains(villains)?;
        }

        Ok(dungeon)
    }

    fn allocate_id(&mut self) -> CharacterId {
        while CharacterId(self.next_id).is_system() {
            self.next_id += 1;
        }
        let id = CharacterId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Takes ownership of a caller-built villain roster, reassigning ids so
    /// board references stay session-unique.
    fn adopt_villains(&mut self, villains: Vec<Character>) -> Result<(), DungeonError> {
        if let Some(stray) = villains.iter().find(|v| v.faction() != Faction::Villain) {
            return Err(DungeonError::ForeignFaction {
                class: stray.class(),
            });
        }
        for mut villain in villains {
            let id = self.allocate_id();
            villain.assign_id(id);
            self.villains.push(villain);
        }
        Ok(())
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn height(&self) -> u32 {
        self.board.height()
    }

    pub fn width(&self) -> u32 {
        self.board.width()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The hero party, in placement order: Warrior, Mage, Paladin, Ranger.
    pub fn heroes(&self) -> &[Character] {
        &self.heroes
    }

    pub fn villains(&self) -> &[Character] {
        &self.villains
    }

    /// Faction currently taking its turn.
    pub fn active_faction(&self) -> Faction {
        self.turn.active
    }

    /// Looks a character up by id across both rosters.
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.heroes
            .iter()
            .chain(self.villains.iter())
            .find(|character| character.id() == id)
    }

    /// Mutable roster access for the orchestrating caller (retiring a dead
    /// piece, scripting a scenario).
    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.heroes
            .iter_mut()
            .chain(self.villains.iter_mut())
            .find(|character| character.id() == id)
    }

    /// Resolves the occupant of a cell, if any.
    pub fn character_at(&self, position: Position) -> Option<&Character> {
        self.board
            .occupant(position)
            .and_then(|id| self.character(id))
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Whether the occupant of `from` may legally move to `to`.
    pub fn is_valid_move(&self, from: Position, to: Position) -> bool {
        self.character_at(from)
            .map(|actor| validate_move(actor, from, to, &self.board).is_ok())
            .unwrap_or(false)
    }

    /// Whether the occupant of `from` may legally attack `to`.
    pub fn is_valid_attack(&self, from: Position, to: Position) -> bool {
        self.character_at(from)
            .map(|actor| validate_attack(actor, from, to, &self.board).is_ok())
            .unwrap_or(false)
    }

    /// Moves the occupant of `from` to `to` when the move is legal for that
    /// piece; an illegal request is dropped silently.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        let Some(id) = self.board.occupant(from) else {
            tracing::debug!("move {from} -> {to} rejected: no piece at origin");
            return;
        };
        let Some(actor) = self.character(id) else {
            tracing::debug!("move {from} -> {to} rejected: {id} not in any roster");
            return;
        };
        if let Err(reason) = validate_move(actor, from, to, &self.board) {
            tracing::debug!("move {from} -> {to} rejected: {reason}");
            return;
        }

        self.board.relocate(from, to);
        tracing::debug!("{id} moved {from} -> {to}");
    }

    /// Resolves an attack from the occupant of `from` against the occupant
    /// of `to`.
    ///
    /// Returns `Ok(None)` when the request is illegal (silent no-op),
    /// `Ok(Some(report))` for a resolved exchange, and `Err` for the death
    /// signal or a board/roster integrity fault.
    pub fn attack(
        &mut self,
        from: Position,
        to: Position,
    ) -> Result<Option<ExchangeReport>, DungeonError> {
        let (Some(attacker_id), Some(defender_id)) =
            (self.board.occupant(from), self.board.occupant(to))
        else {
            tracing::debug!("attack {from} -> {to} rejected: empty cell");
            return Ok(None);
        };

        let attacker = self
            .character(attacker_id)
            .ok_or(DungeonError::RosterDesync {
                id: attacker_id,
                position: from,
            })?;
        if let Err(reason) = validate_attack(attacker, from, to, &self.board) {
            tracing::debug!("attack {from} -> {to} rejected: {reason}");
            return Ok(None);
        }
        if self.character(defender_id).is_none() {
            return Err(DungeonError::RosterDesync {
                id: defender_id,
                position: to,
            });
        }

        let nonce = self.nonce;
        self.nonce += 1;
        let game_seed = self.game_seed;
        let oracle = self.oracle.as_ref();
        let (attacker, defender) = pair_mut(
            self.heroes.as_mut_slice(),
            self.villains.as_mut_slice(),
            attacker_id,
            defender_id,
        )
        .ok_or(DungeonError::RosterDesync {
            id: defender_id,
            position: to,
        })?;

        let attacker_dice = DiceSource::new(oracle, game_seed, nonce, attacker_id);
        let defender_dice = DiceSource::new(oracle, game_seed, nonce, defender_id);
        let report = resolve_exchange(attacker, defender, &attacker_dice, &defender_dice)?;
        Ok(Some(report))
    }

    /// Hands the turn to the opposing faction.
    pub fn advance_turn(&mut self) {
        self.turn.advance();
        tracing::debug!("turn passes to the {} side", self.turn.active);
    }

    /// Necromancer at `from` raises the defeated occupant of `to`.
    pub fn raise_dead(&mut self, from: Position, to: Position) -> Result<(), DungeonError> {
        let actor_id = self
            .board
            .occupant(from)
            .ok_or(DungeonError::VacantCell { position: from })?;
        let target_id = self
            .board
            .occupant(to)
            .ok_or(DungeonError::VacantCell { position: to })?;
        if actor_id == target_id {
            return Err(AbilityError::TargetMismatch { position: to }.into());
        }

        let (actor, target) = pair_mut(
            self.heroes.as_mut_slice(),
            self.villains.as_mut_slice(),
            actor_id,
            target_id,
        )
        .ok_or(DungeonError::RosterDesync {
            id: target_id,
            position: to,
        })?;

        crate::action::raise_dead(actor, target, from, to)?;
        Ok(())
    }

    /// Paladin at `from` revives the occupant of `to`, consuming the charge.
    pub fn revive(&mut self, from: Position, to: Position) -> Result<(), DungeonError> {
        let actor_id = self
            .board
            .occupant(from)
            .ok_or(DungeonError::VacantCell { position: from })?;
        let target_id = self
            .board
            .occupant(to)
            .ok_or(DungeonError::VacantCell { position: to })?;
        if actor_id == target_id {
            return Err(AbilityError::TargetMismatch { position: to }.into());
        }

        let board = &self.board;
        let (actor, target) = pair_mut(
            self.heroes.as_mut_slice(),
            self.villains.as_mut_slice(),
            actor_id,
            target_id,
        )
        .ok_or(DungeonError::RosterDesync {
            id: target_id,
            position: to,
        })?;

        crate::action::revive(actor, target, from, to, board)?;
        Ok(())
    }

    /// Places a roster member at `position`, clearing any cell it previously
    /// occupied. Orchestration surface for scenario setup.
    pub fn set_character_at(
        &mut self,
        id: CharacterId,
        position: Position,
    ) -> Result<(), DungeonError> {
        if self.character(id).is_none() {
            return Err(DungeonError::UnknownCharacter { id });
        }
        self.board.remove_id(id);
        self.board.set(position, id)?;
        Ok(())
    }

    // ========================================================================
    // Session outcome
    // ========================================================================

    /// True iff every villain's health gauge is down to zero.
    pub fn is_dungeon_clear(&self) -> bool {
        self.villains.iter().all(Character::is_down)
    }

    /// Reports the party's defeat by consulting the lead roster entry only.
    pub fn adventurer_defeat(&self) -> bool {
        self.heroes
            .first()
            .map(Character::is_down)
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for Dungeon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dungeon")
            .field("board", &self.board)
            .field("heroes", &self.heroes)
            .field("villains", &self.villains)
            .field("turn", &self.turn)
            .field("game_seed", &self.game_seed)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}

/// Locates two distinct characters across the rosters and borrows both
/// mutably. Returns `None` when either id is missing or the ids coincide.
fn pair_mut<'a>(
    heroes: &'a mut [Character],
    villains: &'a mut [Character],
    first: CharacterId,
    second: CharacterId,
) -> Option<(&'a mut Character, &'a mut Character)> {
    enum Slot {
        Hero(usize),
        Villain(usize),
    }

    let locate = |heroes: &[Character], villains: &[Character], id: CharacterId| {
        if let Some(index) = heroes.iter().position(|c| c.id() == id) {
            Some(Slot::Hero(index))
        } else {
            villains
                .iter()
                .position(|c| c.id() == id)
                .map(Slot::Villain)
        }
    };

    let first = locate(heroes, villains, first)?;
    let second = locate(heroes, villains, second)?;

    match (first, second) {
        (Slot::Hero(i), Slot::Hero(j)) => split_pair(heroes, i, j),
        (Slot::Villain(i), Slot::Villain(j)) => split_pair(villains, i, j),
        (Slot::Hero(i), Slot::Villain(j)) => Some((&mut heroes[i], &mut villains[j])),
        (Slot::Villain(i), Slot::Hero(j)) => Some((&mut villains[i], &mut heroes[j])),
    }
}

fn split_pair(
    slice: &mut [Character],
    i: usize,
    j: usize,
) -> Option<(&mut Character, &mut Character)> {
    match i.cmp(&j) {
        Ordering::Less => {
            let (left, right) = slice.split_at_mut(j);
            Some((&mut left[i], &mut right[0]))
        }
        Ordering::Greater => {
            let (left, right) = slice.split_at_mut(i);
            Some((&mut right[0], &mut left[j]))
        }
        Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;

    fn scripted(
        height: u32,
        width: u32,
        villains: Vec<Character>,
        words: impl IntoIterator<Item = u32>,
    ) -> Dungeon {
        Dungeon::with_oracle(height, width, 99, villains, Box::new(SequenceRng::new(words)))
            .unwrap()
    }

    fn villain(class: ClassKind) -> Character {
        Character::new(CharacterId(0), class)
    }

    #[test]
    fn dimensions_outside_four_to_twelve_are_rejected() {
        assert!(matches!(
            Dungeon::new(3, 8, 0),
            Err(DungeonError::Board(BoardError::InvalidDimension { value: 3 }))
        ));
        assert!(matches!(
            Dungeon::new(8, 13, 0),
            Err(DungeonError::Board(BoardError::InvalidDimension { value: 13 }))
        ));
    }

    #[test]
    fn heroes_are_always_the_fixed_party() {
        let dungeon = Dungeon::new(6, 6, 0).unwrap();
        let classes: Vec<ClassKind> = dungeon.heroes().iter().map(Character::class).collect();
        assert_eq!(
            classes,
            [
                ClassKind::Warrior,
                ClassKind::Mage,
                ClassKind::Paladin,
                ClassKind::Ranger
            ]
        );
    }

    #[test]
    fn hero_roster_members_are_rejected_as_villains() {
        let result = Dungeon::with_villains(6, 6, 0, vec![villain(ClassKind::Warrior)]);
        assert!(matches!(
            result,
            Err(DungeonError::ForeignFaction {
                class: ClassKind::Warrior
            })
        ));
    }

    #[test]
    fn an_empty_supplied_roster_falls_back_to_generation() {
        let dungeon = Dungeon::with_villains(6, 6, 0, Vec::new()).unwrap();
        assert!(!dungeon.villains().is_empty());
    }

    #[test]
    fn valid_moves_round_trip_through_the_board() {
        let mut dungeon = scripted(5, 5, vec![villain(ClassKind::Goblin)], []);
        let goblin_id = dungeon.villains()[0].id();
        let from = Position::new(0, 0);
        let to = Position::new(0, 3);
        dungeon.set_character_at(goblin_id, from).unwrap();

        assert!(dungeon.is_valid_move(from, to));
        dungeon.move_piece(from, to);

        assert!(dungeon.character_at(from).is_none());
        assert_eq!(dungeon.character_at(to).map(Character::id), Some(goblin_id));
    }

    #[test]
    fn illegal_moves_are_silently_dropped() {
        let mut dungeon = scripted(5, 5, vec![villain(ClassKind::Skeleton)], []);
        let skeleton_id = dungeon.villains()[0].id();
        let from = Position::new(0, 0);
        dungeon.set_character_at(skeleton_id, from).unwrap();

        // Diagonal and beyond move range: both dropped without touching state.
        dungeon.move_piece(from, Position::new(1, 1));
        dungeon.move_piece(from, Position::new(0, 3));

        assert_eq!(
            dungeon.character_at(from).map(Character::id),
            Some(skeleton_id)
        );
    }

    #[test]
    fn attacks_on_empty_cells_are_silent_noops() {
        let mut dungeon = scripted(5, 5, vec![villain(ClassKind::Goblin)], []);
        let goblin_id = dungeon.villains()[0].id();
        dungeon.set_character_at(goblin_id, Position::new(0, 0)).unwrap();

        let report = dungeon.attack(Position::new(0, 0), Position::new(0, 1)).unwrap();
        assert!(report.is_none());
    }

    #[test]
    fn scripted_attack_applies_surplus_successes_as_damage() {
        // Goblin (2 attack dice) against Warrior (4 defense dice).
        let mut dungeon = scripted(
            5,
            5,
            vec![villain(ClassKind::Goblin)],
            // Attacker faces 6,6 then defender faces 1,1,1,1.
            [5, 5, 0, 0, 0, 0],
        );
        let goblin_id = dungeon.villains()[0].id();
        let warrior_id = dungeon.heroes()[0].id();
        dungeon.set_character_at(goblin_id, Position::new(0, 0)).unwrap();
        dungeon.set_character_at(warrior_id, Position::new(0, 1)).unwrap();

        let report = dungeon
            .attack(Position::new(0, 0), Position::new(0, 1))
            .unwrap()
            .expect("attack is legal");

        assert_eq!(report.attack_successes, 2);
        assert_eq!(report.defense_successes, 0);
        assert_eq!(report.damage, Some(2));
        assert_eq!(dungeon.character(warrior_id).unwrap().health(), 5);
    }

    #[test]
    fn blocked_attacks_deal_no_damage() {
        let mut dungeon = scripted(
            5,
            5,
            vec![villain(ClassKind::Goblin)],
            // Attacker faces 1,1; defender faces 6,6,6,6.
            [0, 0, 5, 5, 5, 5],
        );
        let goblin_id = dungeon.villains()[0].id();
        let warrior_id = dungeon.heroes()[0].id();
        dungeon.set_character_at(goblin_id, Position::new(0, 0)).unwrap();
        dungeon.set_character_at(warrior_id, Position::new(0, 1)).unwrap();

        let report = dungeon
            .attack(Position::new(0, 0), Position::new(0, 1))
            .unwrap()
            .expect("attack is legal");

        assert_eq!(report.damage, None);
        assert_eq!(dungeon.character(warrior_id).unwrap().health(), 7);
    }

    #[test]
    fn lethal_attacks_surface_the_death_signal() {
        // Warrior (2 attack + 2 bonus dice vs Goblin) against Goblin with 2 hp left.
        let mut dungeon = scripted(
            5,
            5,
            vec![villain(ClassKind::Goblin)],
            // Base faces 6,6; bonus faces 6,1; defense faces 1,1.
            [5, 5, 5, 0, 0, 0],
        );
        let goblin_id = dungeon.villains()[0].id();
        let warrior_id = dungeon.heroes()[0].id();
        dungeon
            .character_mut(goblin_id)
            .unwrap()
            .set_health(2)
            .unwrap();
        dungeon.set_character_at(warrior_id, Position::new(0, 0)).unwrap();
        dungeon.set_character_at(goblin_id, Position::new(0, 1)).unwrap();

        let result = dungeon.attack(Position::new(0, 0), Position::new(0, 1));
        match result {
            Err(DungeonError::Death(signal)) => {
                assert_eq!(signal.id, goblin_id);
                assert_eq!(signal.class, ClassKind::Goblin);
            }
            other => panic!("expected the death signal, got {other:?}"),
        }
        assert!(dungeon.character(goblin_id).unwrap().is_down());
    }

    #[test]
    fn turn_indicator_alternates() {
        let mut dungeon = scripted(5, 5, vec![villain(ClassKind::Goblin)], []);
        assert_eq!(dungeon.active_faction(), Faction::Hero);
        dungeon.advance_turn();
        assert_eq!(dungeon.active_faction(), Faction::Villain);
        dungeon.advance_turn();
        assert_eq!(dungeon.active_faction(), Faction::Hero);
    }

    #[test]
    fn dungeon_clears_only_when_every_villain_is_down() {
        let mut dungeon = scripted(
            5,
            5,
            vec![villain(ClassKind::Goblin), villain(ClassKind::Skeleton)],
            [],
        );
        assert!(!dungeon.is_dungeon_clear());

        let first = dungeon.villains()[0].id();
        dungeon.character_mut(first).unwrap().set_health(0).unwrap();
        assert!(!dungeon.is_dungeon_clear());

        let second = dungeon.villains()[1].id();
        dungeon.character_mut(second).unwrap().set_health(0).unwrap();
        assert!(dungeon.is_dungeon_clear());
    }

    #[test]
    fn adventurer_defeat_consults_the_lead_hero_only() {
        let mut dungeon = scripted(5, 5, vec![villain(ClassKind::Goblin)], []);
        let warrior_id = dungeon.heroes()[0].id();
        let ranger_id = dungeon.heroes()[3].id();

        dungeon.character_mut(ranger_id).unwrap().set_health(0).unwrap();
        assert!(
            !dungeon.adventurer_defeat(),
            "a fallen ranger is invisible to the lead-hero check"
        );

        dungeon.character_mut(warrior_id).unwrap().set_health(0).unwrap();
        assert!(dungeon.adventurer_defeat());
    }

    #[test]
    fn placing_an_unknown_id_is_rejected() {
        let mut dungeon = scripted(5, 5, vec![villain(ClassKind::Goblin)], []);
        assert!(matches!(
            dungeon.set_character_at(CharacterId(999), Position::ORIGIN),
            Err(DungeonError::UnknownCharacter { .. })
        ));
    }

    #[test]
    fn paladin_revives_a_downed_ally_through_the_session() {
        let mut dungeon = scripted(5, 5, vec![villain(ClassKind::Goblin)], []);
        let paladin_id = dungeon.heroes()[2].id();
        let warrior_id = dungeon.heroes()[0].id();

        dungeon.character_mut(warrior_id).unwrap().set_health(0).unwrap();
        dungeon.set_character_at(paladin_id, Position::new(0, 0)).unwrap();
        dungeon.set_character_at(warrior_id, Position::new(0, 1)).unwrap();

        dungeon.revive(Position::new(0, 0), Position::new(0, 1)).unwrap();

        assert_eq!(dungeon.character(warrior_id).unwrap().health(), 3);
        assert!(!dungeon.character(paladin_id).unwrap().heal_available());
    }

    #[test]
    fn necromancer_raises_a_downed_hero_through_the_session() {
        let mut dungeon = scripted(5, 5, vec![villain(ClassKind::Necromancer)], []);
        let necromancer_id = dungeon.villains()[0].id();
        let mage_id = dungeon.heroes()[1].id();

        dungeon.character_mut(mage_id).unwrap().set_health(0).unwrap();
        dungeon.set_character_at(necromancer_id, Position::new(0, 0)).unwrap();
        dungeon.set_character_at(mage_id, Position::new(1, 1)).unwrap();

        dungeon.raise_dead(Position::new(0, 0), Position::new(1, 1)).unwrap();

        let mage = dungeon.character(mage_id).unwrap();
        assert_eq!(mage.faction(), Faction::Villain);
        assert_eq!(mage.health(), 2);
    }
}
