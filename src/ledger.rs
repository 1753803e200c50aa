//! Append-only record of the cells one side has fired upon.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{GameError, Mark};
use crate::grid::Grid;

/// Shots fired by one side, keyed by cell index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotLedger {
    shots: BTreeMap<usize, Mark>,
}

impl ShotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a shot. Each cell may be recorded once.
    pub fn record(&mut self, index: usize, mark: Mark) -> Result<(), GameError> {
        if self.shots.contains_key(&index) {
            return Err(GameError::AlreadyShot(index));
        }
        self.shots.insert(index, mark);
        Ok(())
    }

    pub fn contains(&self, index: usize) -> bool {
        self.shots.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.shots.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    /// Number of recorded hits.
    pub fn hits(&self) -> usize {
        self.shots.values().filter(|m| **m == Mark::Hit).count()
    }

    /// Shots in ascending cell order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Mark)> + '_ {
        self.shots.iter().map(|(&i, &m)| (i, m))
    }

    /// Cells of `grid` not yet fired upon, in ascending order.
    pub fn unshot(&self, grid: Grid) -> Vec<usize> {
        grid.indices().filter(|i| !self.contains(*i)).collect()
    }

    /// First candidate not yet fired upon.
    pub fn first_unshot(&self, candidates: &[usize]) -> Option<usize> {
        candidates.iter().copied().find(|i| !self.contains(*i))
    }
}
