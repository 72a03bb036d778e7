//! Session state types: identifiers, grid positions, the board occupancy
//! grid, and turn bookkeeping. The dungeon session mutates these exclusively
//! through the operations in [`crate::dungeon`] and [`crate::action`].

mod board;
mod common;
mod turn;

pub use board::{Board, BoardError};
pub use common::{CharacterId, Position};
pub use turn::TurnState;
