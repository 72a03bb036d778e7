//! Dice pools and success counting.

use crate::config::GameConfig;
use crate::env::{RngOracle, compute_seed};
use crate::state::CharacterId;

/// Whether a pool is rolled to attack or to defend. The two roles succeed on
/// different thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiceRole {
    Attack,
    Defense,
}

impl DiceRole {
    /// A die succeeds on a face strictly greater than this.
    pub const fn threshold(self) -> u8 {
        match self {
            DiceRole::Attack => GameConfig::ATTACK_THRESHOLD,
            DiceRole::Defense => GameConfig::DEFENSE_THRESHOLD,
        }
    }
}

/// Counts the successes in `rolls` for the given role.
///
/// Attacking succeeds on 5-6, defending on 4-6. Supplied rolls are counted
/// verbatim, however many there are.
pub fn count_successes(rolls: &[u8], role: DiceRole) -> u32 {
    let threshold = role.threshold();
    rolls.iter().filter(|&&face| face > threshold).count() as u32
}

/// Deterministic per-die roll source.
///
/// Bundles the oracle with the seed components of one randomized operation;
/// each die varies only the `context` index, so the whole pool is replayable
/// from the session seed.
#[derive(Clone, Copy)]
pub struct DiceSource<'a> {
    oracle: &'a dyn RngOracle,
    game_seed: u64,
    nonce: u64,
    actor: CharacterId,
}

impl<'a> DiceSource<'a> {
    pub fn new(oracle: &'a dyn RngOracle, game_seed: u64, nonce: u64, actor: CharacterId) -> Self {
        Self {
            oracle,
            game_seed,
            nonce,
            actor,
        }
    }

    /// Rolls a single d6.
    pub fn roll(&self, context: u32) -> u8 {
        let seed = compute_seed(self.game_seed, self.nonce, self.actor.0, context);
        self.oracle.roll_die(seed, GameConfig::DIE_FACES) as u8
    }

    /// Rolls `count` dice, one context index per die starting at
    /// `context_base`.
    pub fn roll_pool(&self, count: u32, context_base: u32) -> Vec<u8> {
        (0..count).map(|die| self.roll(context_base + die)).collect()
    }
}

impl std::fmt::Debug for DiceSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiceSource")
            .field("game_seed", &self.game_seed)
            .field("nonce", &self.nonce)
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    #[test]
    fn attack_successes_need_a_five_or_six() {
        assert_eq!(count_successes(&[1, 5, 5], DiceRole::Attack), 2);
        assert_eq!(count_successes(&[4, 4, 4], DiceRole::Attack), 0);
        assert_eq!(count_successes(&[], DiceRole::Attack), 0);
    }

    #[test]
    fn defense_successes_need_a_four_or_better() {
        assert_eq!(count_successes(&[1, 2, 4], DiceRole::Defense), 1);
        assert_eq!(count_successes(&[4, 5, 6], DiceRole::Defense), 3);
    }

    #[test]
    fn pools_are_replayable_from_the_same_components() {
        let oracle = PcgRng;
        let first = DiceSource::new(&oracle, 9, 3, CharacterId(1)).roll_pool(4, 0);
        let second = DiceSource::new(&oracle, 9, 3, CharacterId(1)).roll_pool(4, 0);
        assert_eq!(first, second);
        assert!(first.iter().all(|face| (1..=6).contains(face)));
    }

    #[test]
    fn pools_differ_across_actors() {
        let oracle = PcgRng;
        let mine = DiceSource::new(&oracle, 9, 3, CharacterId(1)).roll_pool(6, 0);
        let theirs = DiceSource::new(&oracle, 9, 3, CharacterId(2)).roll_pool(6, 0);
        assert_ne!(mine, theirs);
    }
}
