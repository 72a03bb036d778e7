/// Rules-engine configuration constants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    // ===== board geometry =====
    /// Smallest legal board edge, inclusive.
    pub const MIN_DIMENSION: u32 = 4;
    /// Largest legal board edge, inclusive.
    pub const MAX_DIMENSION: u32 = 12;

    // ===== rosters =====
    /// The hero party is always Warrior, Mage, Paladin, Ranger.
    pub const HERO_PARTY_SIZE: usize = 4;

    // ===== dice =====
    /// Every combat die is six-sided.
    pub const DIE_FACES: u32 = 6;
    /// An attack die succeeds on a face strictly greater than this.
    pub const ATTACK_THRESHOLD: u8 = 4;
    /// A defense die succeeds on a face strictly greater than this.
    pub const DEFENSE_THRESHOLD: u8 = 3;
    /// Extra attack dice a Warrior rolls against a Goblin.
    pub const WARRIOR_BONUS_DICE: u32 = 2;
}
