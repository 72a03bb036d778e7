//! Board occupancy grid.
//!
//! The board owns its cells exclusively; each cell holds at most one
//! [`CharacterId`]. Characters themselves are owned by the session rosters,
//! which keeps a piece in at most one cell at a time.

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

use super::common::{CharacterId, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardError {
    #[error(
        "board dimension {value} outside {min}..={max}",
        min = GameConfig::MIN_DIMENSION,
        max = GameConfig::MAX_DIMENSION
    )]
    InvalidDimension { value: u32 },

    #[error("position {position} is outside the board")]
    OutOfBounds { position: Position },
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// Rectangular `height x width` grid of optional character references.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    height: u32,
    width: u32,
    cells: Vec<Option<CharacterId>>,
}

impl Board {
    /// Creates an empty board. Both edges must lie in
    /// [`GameConfig::MIN_DIMENSION`]`..=`[`GameConfig::MAX_DIMENSION`].
    pub fn new(height: u32, width: u32) -> Result<Self, BoardError> {
        for value in [height, width] {
            if !(GameConfig::MIN_DIMENSION..=GameConfig::MAX_DIMENSION).contains(&value) {
                return Err(BoardError::InvalidDimension { value });
            }
        }

        Ok(Self {
            height,
            width,
            cells: vec![None; (height * width) as usize],
        })
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.height as i32
            && position.y < self.width as i32
    }

    fn index(&self, position: Position) -> usize {
        (position.x as u32 * self.width + position.y as u32) as usize
    }

    /// Returns the occupant of `position`, or `None` when the cell is empty
    /// or the position lies outside the board.
    pub fn occupant(&self, position: Position) -> Option<CharacterId> {
        if !self.contains(position) {
            return None;
        }
        self.cells[self.index(position)]
    }

    /// Places `id` at `position`, overwriting any previous occupant.
    pub fn set(&mut self, position: Position, id: CharacterId) -> Result<(), BoardError> {
        if !self.contains(position) {
            return Err(BoardError::OutOfBounds { position });
        }
        let index = self.index(position);
        self.cells[index] = Some(id);
        Ok(())
    }

    /// Empties `position`, returning the previous occupant.
    pub fn clear(&mut self, position: Position) -> Result<Option<CharacterId>, BoardError> {
        if !self.contains(position) {
            return Err(BoardError::OutOfBounds { position });
        }
        let index = self.index(position);
        Ok(self.cells[index].take())
    }

    /// Moves the occupant of `from` to `to`. Both positions must already be
    /// validated; movement legality lives in the action layer.
    pub(crate) fn relocate(&mut self, from: Position, to: Position) {
        debug_assert!(self.contains(from) && self.contains(to));
        let from_index = self.index(from);
        let occupant = self.cells[from_index].take();
        let to_index = self.index(to);
        self.cells[to_index] = occupant;
    }

    /// Strips `id` from every cell it occupies.
    pub(crate) fn remove_id(&mut self, id: CharacterId) {
        for cell in &mut self.cells {
            if *cell == Some(id) {
                *cell = None;
            }
        }
    }

    /// Row-major read access for an external renderer.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<CharacterId>]> {
        self.cells.chunks(self.width as usize)
    }
}
