//! Common types for the game: errors, shot marks and shot results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome recorded in a shot ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    Hit,
    Miss,
}

/// Result of resolving a shot against a fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotResult {
    /// Shot missed all ships.
    Miss,
    /// Shot hit a ship that is still afloat, carrying its name.
    Hit(String),
    /// Shot hit a ship that is now sunk, carrying its name.
    Sunk(String),
}

impl ShotResult {
    pub fn is_hit(&self) -> bool {
        !matches!(self, ShotResult::Miss)
    }

    pub fn is_sunk(&self) -> bool {
        matches!(self, ShotResult::Sunk(_))
    }

    /// Name of the ship that was hit, if any.
    pub fn ship_name(&self) -> Option<&str> {
        match self {
            ShotResult::Miss => None,
            ShotResult::Hit(name) | ShotResult::Sunk(name) => Some(name),
        }
    }

    /// Ledger mark for this result.
    pub fn mark(&self) -> Mark {
        if self.is_hit() {
            Mark::Hit
        } else {
            Mark::Miss
        }
    }
}

/// Errors returned by game operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// Index does not lie on the board.
    #[error("index {index} is out of range for a board of {cells} cells")]
    InvalidIndex { index: usize, cells: usize },
    /// Board side exceeds what the game supports.
    #[error("board size {size} exceeds the maximum of {max}")]
    BoardTooLarge { size: usize, max: usize },
    /// Ship would run off the board.
    #[error("ship placement is out of bounds")]
    ShipOutOfBounds,
    /// Ship placement overlaps another ship.
    #[error("ship placement overlaps with another ship")]
    ShipOverlaps,
    /// Ship cells are not a straight contiguous run or its hits are not its cells.
    #[error("ship {0} is malformed")]
    MalformedShip(String),
    /// Shot was already fired at this cell.
    #[error("cell {0} was already fired upon")]
    AlreadyShot(usize),
    /// Random placement kept failing past the restart cap.
    #[error("unable to place fleet after {restarts} restarts")]
    UnableToPlaceFleet { restarts: usize },
    /// Fleet definition contains no ships.
    #[error("fleet definition is empty")]
    EmptyFleet,
    /// Decoded session violates a game invariant.
    #[error("corrupt session: {0}")]
    Corrupt(String),
    /// Session blob could not be encoded or decoded.
    #[error("session codec error: {0}")]
    Codec(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Codec(err.to_string())
    }
}

impl From<bincode::Error> for GameError {
    fn from(err: bincode::Error) -> Self {
        GameError::Codec(err.to_string())
    }
}
