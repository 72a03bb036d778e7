use crate::character::Faction;

/// Whose-turn bookkeeping. Play strictly alternates between the two factions;
/// move and attack requests themselves do not gate on this indicator, callers
/// orchestrate the sequencing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Faction currently taking its turn. Heroes open every session.
    pub active: Faction,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            active: Faction::Hero,
        }
    }

    /// Hands the turn to the opposing faction.
    pub fn advance(&mut self) {
        self.active = self.active.opponent();
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
