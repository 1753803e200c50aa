//! Fleet placement and shot resolution.

use std::collections::BTreeSet;

use log::debug;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{GameError, ShotResult};
use crate::config::{PLACEMENT_ATTEMPTS, PLACEMENT_RESTARTS};
use crate::grid::Grid;
use crate::ship::{Orientation, Ship, ShipType};

/// All ships belonging to one side, in fleet definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    /// Create an empty fleet (no ships placed).
    pub fn new() -> Self {
        Self { ships: Vec::new() }
    }

    /// Build a fleet from already constructed ships, rejecting overlaps.
    pub fn from_ships(ships: Vec<Ship>, grid: Grid) -> Result<Self, GameError> {
        let mut fleet = Fleet::new();
        for ship in ships {
            fleet.place(ship, grid)?;
        }
        Ok(fleet)
    }

    /// Add a ship to the fleet. Fails if it is malformed or overlaps a ship
    /// already placed.
    pub fn place(&mut self, ship: Ship, grid: Grid) -> Result<(), GameError> {
        ship.validate(grid)?;
        if ship.cells().iter().any(|&i| self.is_occupied(i)) {
            return Err(GameError::ShipOverlaps);
        }
        self.ships.push(ship);
        Ok(())
    }

    /// Place every ship of `ship_types` at random, non-overlapping positions.
    ///
    /// Each ship gets `PLACEMENT_ATTEMPTS` random anchors. When one runs
    /// out, every ship is lifted and placement starts over, so an early ship
    /// can never leave a later one without room. Gives up with
    /// `UnableToPlaceFleet` after `PLACEMENT_RESTARTS` restarts.
    pub fn random(rng: &mut SmallRng, grid: Grid, ship_types: &[ShipType]) -> Result<Self, GameError> {
        if ship_types.is_empty() {
            return Err(GameError::EmptyFleet);
        }
        if grid.size() == 0 {
            return Err(GameError::ShipOutOfBounds);
        }
        for restart in 0..PLACEMENT_RESTARTS {
            if let Some(fleet) = Self::try_random(rng, grid, ship_types) {
                return Ok(fleet);
            }
            debug!("fleet placement stuck, restarting (restart {})", restart + 1);
        }
        Err(GameError::UnableToPlaceFleet {
            restarts: PLACEMENT_RESTARTS,
        })
    }

    fn try_random(rng: &mut SmallRng, grid: Grid, ship_types: &[ShipType]) -> Option<Self> {
        let mut fleet = Fleet::new();
        for ship_type in ship_types {
            let ship = fleet.random_placement(rng, grid, ship_type)?;
            fleet.ships.push(ship);
        }
        Some(fleet)
    }

    /// Returns a random ship of type `ship_type` that fits on the board without
    /// overlapping this fleet, or `None` once the attempt budget is spent.
    pub fn random_placement(
        &self,
        rng: &mut SmallRng,
        grid: Grid,
        ship_type: &ShipType,
    ) -> Option<Ship> {
        let n = grid.size();
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let r = rng.random_range(0..n);
            let c = rng.random_range(0..n);
            // off-board anchors are rejected, not clamped
            let Ok(ship) = Ship::new(ship_type, orient, r, c, grid) else {
                continue;
            };
            if ship.cells().iter().all(|&i| !self.is_occupied(i)) {
                return Some(ship);
            }
        }
        None
    }

    /// Resolve a shot at `index`, recording a hit on the owning ship.
    ///
    /// Repeating a shot on an already hit cell reports the same result again
    /// without counting the hit twice.
    pub fn resolve_shot(&mut self, index: usize) -> ShotResult {
        let Some(si) = self.ship_owning(index) else {
            return ShotResult::Miss;
        };
        let ship = &mut self.ships[si];
        ship.register_hit(index);
        if ship.is_sunk() {
            ShotResult::Sunk(ship.name().to_string())
        } else {
            ShotResult::Hit(ship.name().to_string())
        }
    }

    /// Position in the fleet of the ship occupying `index`, if any.
    pub fn ship_owning(&self, index: usize) -> Option<usize> {
        self.ships.iter().position(|s| s.contains(index))
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.ship_owning(index).is_some()
    }

    /// Returns `true` when all ships are sunk.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Number of ships still afloat.
    pub fn remaining(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_sunk()).count()
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Check every ship's shape and that no two ships share a cell.
    pub fn validate(&self, grid: Grid) -> Result<(), GameError> {
        let mut seen = BTreeSet::new();
        for ship in &self.ships {
            ship.validate(grid)?;
            for &i in ship.cells() {
                if !seen.insert(i) {
                    return Err(GameError::ShipOverlaps);
                }
            }
        }
        Ok(())
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}
