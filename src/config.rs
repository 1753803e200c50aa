use serde::{Deserialize, Serialize};

use crate::common::GameError;
use crate::grid::Grid;
use crate::ship::ShipType;

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Largest board side; columns are lettered A-Z.
pub const MAX_BOARD_SIZE: usize = 26;

/// Most recent event log lines kept in a session.
pub const LOG_CAPACITY: usize = 7;

/// Random anchor attempts per ship before the whole fleet is placed again.
pub const PLACEMENT_ATTEMPTS: usize = 5000;

/// Whole-fleet restarts before placement gives up.
pub const PLACEMENT_RESTARTS: usize = 1000;

/// Board and fleet a game is played with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct GameConfig {
    grid: Grid,
    fleet: Vec<ShipType>,
}

impl GameConfig {
    /// Validate and build a configuration.
    pub fn new(size: usize, fleet: Vec<ShipType>) -> Result<Self, GameError> {
        if fleet.is_empty() {
            return Err(GameError::EmptyFleet);
        }
        if size > MAX_BOARD_SIZE {
            return Err(GameError::BoardTooLarge {
                size,
                max: MAX_BOARD_SIZE,
            });
        }
        if size == 0 || fleet.iter().any(|s| s.length() == 0 || s.length() > size) {
            return Err(GameError::ShipOutOfBounds);
        }
        Ok(Self {
            grid: Grid::new(size),
            fleet,
        })
    }

    /// Standard fleet on a board of side `size`.
    pub fn with_size(size: usize) -> Result<Self, GameError> {
        Self::new(size, SHIPS.to_vec())
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn fleet(&self) -> &[ShipType] {
        &self.fleet
    }

    /// Sum of every ship length in the fleet.
    pub fn total_ship_cells(&self) -> usize {
        self.fleet.iter().map(ShipType::length).sum()
    }
}

/// Wire shape of a [`GameConfig`]; decoding goes back through
/// [`GameConfig::new`] so a stored board can never skip its bounds.
#[derive(Deserialize)]
struct RawConfig {
    grid: Grid,
    fleet: Vec<ShipType>,
}

impl TryFrom<RawConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        Self::new(raw.grid.size(), raw.fleet)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: Grid::new(BOARD_SIZE),
            fleet: SHIPS.to_vec(),
        }
    }
}
