//! Character classes and faction allegiance.

/// Side a piece fights for. Turn order alternates between the two, and the
/// raise/revive abilities key their alliance rules on it.
///
/// Faction can change during play: a raised corpse defects to the villains.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    Hero,
    Villain,
}

impl Faction {
    /// The opposing side.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Hero => Self::Villain,
            Self::Villain => Self::Hero,
        }
    }
}

/// The closed set of playable classes.
///
/// Stat presets and special rules are hard-coded per class rather than
/// data-driven; per-class behavior dispatches on this enum instead of a
/// trait-object hierarchy.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ClassKind {
    /// Villain chaff. Takes two bonus attack dice from a Warrior.
    Goblin,
    /// Fragile villain. Takes one less damage from a Ranger.
    Skeleton,
    /// Villain support. Can raise a defeated character into its own faction.
    Necromancer,
    /// Hero front line. Rolls two bonus attack dice against Goblins.
    Warrior,
    /// Hero caster. Deals one extra damage on any successful attack.
    Mage,
    /// Hero support. Carries a one-shot revive charge.
    Paladin,
    /// Hero skirmisher. Deals one less damage to Skeletons.
    Ranger,
}

impl ClassKind {
    /// Every class, villains first.
    pub const ALL: [ClassKind; 7] = [
        ClassKind::Goblin,
        ClassKind::Skeleton,
        ClassKind::Necromancer,
        ClassKind::Warrior,
        ClassKind::Mage,
        ClassKind::Paladin,
        ClassKind::Ranger,
    ];

    /// The faction this class fights for at construction.
    pub const fn faction(self) -> Faction {
        match self {
            ClassKind::Goblin | ClassKind::Skeleton | ClassKind::Necromancer => Faction::Villain,
            ClassKind::Warrior | ClassKind::Mage | ClassKind::Paladin | ClassKind::Ranger => {
                Faction::Hero
            }
        }
    }

    /// Construction-time stat preset for this class.
    pub const fn preset(self) -> ClassPreset {
        match self {
            ClassKind::Goblin => ClassPreset::new(3, 2, 2, 3, 1),
            ClassKind::Skeleton => ClassPreset::new(2, 2, 1, 2, 1),
            ClassKind::Necromancer => ClassPreset::new(5, 1, 2, 3, 3),
            ClassKind::Warrior => ClassPreset::new(7, 2, 4, 3, 1),
            ClassKind::Mage => ClassPreset::new(5, 2, 2, 2, 3),
            ClassKind::Paladin => ClassPreset::new(6, 3, 3, 3, 1).with_heal_charge(),
            ClassKind::Ranger => ClassPreset::new(5, 3, 3, 3, 1),
        }
    }
}

/// Fixed stat block a class starts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassPreset {
    /// Maximum (and starting) health.
    pub max_health: u32,
    /// Attack dice pool size.
    pub attack: u32,
    /// Defense dice pool size.
    pub defense: u32,
    /// Maximum per-axis step distance per move.
    pub move_range: u32,
    /// Manhattan-distance bound for the raise/revive abilities.
    pub attack_range: u32,
    /// Whether the class starts with the one-shot revive charge.
    pub heal_available: bool,
}

impl ClassPreset {
    const fn new(max_health: u32, attack: u32, defense: u32, move_range: u32, attack_range: u32) -> Self {
        Self {
            max_health,
            attack,
            defense,
            move_range,
            attack_range,
            heal_available: false,
        }
    }

    const fn with_heal_charge(mut self) -> Self {
        self.heal_available = true;
        self
    }
}
