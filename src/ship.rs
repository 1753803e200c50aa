//! Ship definitions and hit tracking.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::common::GameError;
use crate::grid::Grid;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Type of ship: name and length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipType {
    name: Cow<'static, str>,
    length: usize,
}

impl ShipType {
    /// Create a new ship type.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self {
            name: Cow::Borrowed(name),
            length,
        }
    }

    /// Create a ship type with a runtime name.
    pub fn named(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            length,
        }
    }

    /// Ship's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship placed on the board, with the cells it occupies and the cells hit so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    name: String,
    length: usize,
    cells: Vec<usize>,
    hits: BTreeSet<usize>,
}

impl Ship {
    /// Place a ship with its first cell at (`row`, `col`), extending right
    /// or down depending on `orientation`.
    pub fn new(
        ship_type: &ShipType,
        orientation: Orientation,
        row: usize,
        col: usize,
        grid: Grid,
    ) -> Result<Self, GameError> {
        let len = ship_type.length();
        let n = grid.size();
        // Ensure placement fits within N×N
        let fits = match orientation {
            Orientation::Horizontal => row < n && col + len <= n,
            Orientation::Vertical => col < n && row + len <= n,
        };
        if len == 0 || !fits {
            return Err(GameError::ShipOutOfBounds);
        }

        let cells = (0..len)
            .map(|i| match orientation {
                Orientation::Horizontal => grid.to_index(row, col + i),
                Orientation::Vertical => grid.to_index(row + i, col),
            })
            .collect();

        Ok(Ship {
            name: ship_type.name().to_string(),
            length: len,
            cells,
            hits: BTreeSet::new(),
        })
    }

    /// Returns `true` if the ship occupies `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains(&index)
    }

    /// Register a shot at `index`. Returns `true` if it struck this ship.
    /// Hitting the same cell twice leaves the hit count unchanged.
    pub fn register_hit(&mut self, index: usize) -> bool {
        if self.contains(index) {
            self.hits.insert(index);
            true
        } else {
            false
        }
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hits.len() == self.length
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Occupied cells, ordered from the anchor outwards.
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn hits(&self) -> &BTreeSet<usize> {
        &self.hits
    }

    /// Orientation inferred from the occupied cells. Single-cell ships report
    /// `Horizontal`.
    pub fn orientation(&self, grid: Grid) -> Orientation {
        match self.cells.as_slice() {
            [a, b, ..] if grid.to_row_col(*a).1 == grid.to_row_col(*b).1 => Orientation::Vertical,
            _ => Orientation::Horizontal,
        }
    }

    /// Check the shape invariants: `length` distinct on-board cells forming
    /// an axis-aligned run with step 1, and every hit on one of those cells.
    pub fn validate(&self, grid: Grid) -> Result<(), GameError> {
        let malformed = || GameError::MalformedShip(self.name.clone());
        if self.length == 0 || self.cells.len() != self.length {
            return Err(malformed());
        }
        if self.cells.iter().any(|&i| !grid.contains(i)) {
            return Err(malformed());
        }
        let coords: Vec<(usize, usize)> = self.cells.iter().map(|&i| grid.to_row_col(i)).collect();
        let (r0, c0) = coords[0];
        let horizontal = coords.iter().enumerate().all(|(i, &rc)| rc == (r0, c0 + i));
        let vertical = coords.iter().enumerate().all(|(i, &rc)| rc == (r0 + i, c0));
        if !horizontal && !vertical {
            return Err(malformed());
        }
        if !self.hits.iter().all(|h| self.cells.contains(h)) {
            return Err(malformed());
        }
        Ok(())
    }
}
