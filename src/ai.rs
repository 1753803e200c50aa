//! Cell selection for the computer opponent.
//!
//! Three interchangeable strategies share the [`Strategy`] trait. Each one
//! only sees the ledger of cells it has already fired on plus its own
//! scratch state, which the game feeds through [`Strategy::observe`].

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::common::ShotResult;
use crate::grid::Grid;
use crate::ledger::ShotLedger;

/// Interface implemented by the opponent's targeting strategies.
pub trait Strategy {
    /// Choose the next cell to fire on. Returns `None` only once every cell
    /// of the board is in `ledger`.
    fn pick_shot(&mut self, rng: &mut SmallRng, ledger: &ShotLedger, grid: Grid) -> Option<usize>;

    /// Inform the strategy of the result of its last shot.
    fn observe(&mut self, _index: usize, _result: &ShotResult, _grid: Grid) {}
}

/// Opponent skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Uniform choice among cells not yet fired upon.
pub fn random_unshot(rng: &mut SmallRng, ledger: &ShotLedger, grid: Grid) -> Option<usize> {
    ledger.unshot(grid).choose(rng).copied()
}

/// Easy: pure random fire, no memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomAi;

impl Strategy for RandomAi {
    fn pick_shot(&mut self, rng: &mut SmallRng, ledger: &ShotLedger, grid: Grid) -> Option<usize> {
        random_unshot(rng, ledger, grid)
    }
}

/// Medium: after a hit, tries the hit's neighbours in queue order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueAi {
    target_queue: VecDeque<usize>,
}

impl QueueAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates awaiting trial, front first.
    pub fn target_queue(&self) -> &VecDeque<usize> {
        &self.target_queue
    }

    /// Append candidates not already queued.
    pub fn enqueue(&mut self, candidates: impl IntoIterator<Item = usize>) {
        for c in candidates {
            if !self.target_queue.contains(&c) {
                self.target_queue.push_back(c);
            }
        }
    }
}

impl Strategy for QueueAi {
    fn pick_shot(&mut self, rng: &mut SmallRng, ledger: &ShotLedger, grid: Grid) -> Option<usize> {
        while let Some(candidate) = self.target_queue.pop_front() {
            if !ledger.contains(candidate) {
                debug!("medium ai: trying queued cell {}", candidate);
                return Some(candidate);
            }
        }
        random_unshot(rng, ledger, grid)
    }

    fn observe(&mut self, index: usize, result: &ShotResult, grid: Grid) {
        match result {
            ShotResult::Miss => {}
            ShotResult::Hit(_) => self.enqueue(grid.neighbors4(index)),
            ShotResult::Sunk(_) => self.target_queue.clear(),
        }
    }
}

/// Hard: extends lines of confirmed hits, otherwise hunts on one parity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityAi {
    target_hits: Vec<usize>,
}

impl ParityAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known set of hits on the ship being hunted.
    pub fn with_hits(hits: impl IntoIterator<Item = usize>) -> Self {
        let mut ai = Self::new();
        for h in hits {
            ai.add_hit(h);
        }
        ai
    }

    /// Confirmed hits on the ship currently hunted.
    pub fn target_hits(&self) -> &[usize] {
        &self.target_hits
    }

    fn add_hit(&mut self, index: usize) {
        if !self.target_hits.contains(&index) {
            self.target_hits.push(index);
        }
    }

    /// With two or more hits in one row (or column), the cells just past
    /// either end of the run, lower end first.
    fn line_ends(&self, grid: Grid) -> Vec<usize> {
        if self.target_hits.len() < 2 {
            return Vec::new();
        }
        let coords: Vec<(usize, usize)> =
            self.target_hits.iter().map(|&h| grid.to_row_col(h)).collect();
        let (r0, c0) = coords[0];
        let n = grid.size();
        let mut ends = Vec::with_capacity(2);

        if coords.iter().all(|&(r, _)| r == r0) {
            let min = coords.iter().map(|&(_, c)| c).min().unwrap_or(c0);
            let max = coords.iter().map(|&(_, c)| c).max().unwrap_or(c0);
            if min > 0 {
                ends.push(grid.to_index(r0, min - 1));
            }
            if max + 1 < n {
                ends.push(grid.to_index(r0, max + 1));
            }
        } else if coords.iter().all(|&(_, c)| c == c0) {
            let min = coords.iter().map(|&(r, _)| r).min().unwrap_or(r0);
            let max = coords.iter().map(|&(r, _)| r).max().unwrap_or(r0);
            if min > 0 {
                ends.push(grid.to_index(min - 1, c0));
            }
            if max + 1 < n {
                ends.push(grid.to_index(max + 1, c0));
            }
        }
        ends
    }

    /// Deduplicated neighbours of every confirmed hit, in hit order.
    fn adjacent(&self, grid: Grid) -> Vec<usize> {
        let mut out = Vec::new();
        for &h in &self.target_hits {
            for n in grid.neighbors4(h) {
                if !out.contains(&n) {
                    out.push(n);
                }
            }
        }
        out
    }
}

impl Strategy for ParityAi {
    fn pick_shot(&mut self, rng: &mut SmallRng, ledger: &ShotLedger, grid: Grid) -> Option<usize> {
        if let Some(shot) = ledger.first_unshot(&self.line_ends(grid)) {
            debug!("hard ai: extending line to {}", shot);
            return Some(shot);
        }
        if let Some(shot) = ledger.first_unshot(&self.adjacent(grid)) {
            debug!("hard ai: probing neighbour {}", shot);
            return Some(shot);
        }

        let parity: Vec<usize> = ledger
            .unshot(grid)
            .into_iter()
            .filter(|&i| grid.is_even_parity(i))
            .collect();
        if let Some(&shot) = parity.choose(rng) {
            return Some(shot);
        }
        random_unshot(rng, ledger, grid)
    }

    fn observe(&mut self, index: usize, result: &ShotResult, _grid: Grid) {
        match result {
            ShotResult::Miss => {}
            ShotResult::Hit(_) => self.add_hit(index),
            ShotResult::Sunk(_) => self.target_hits.clear(),
        }
    }
}

/// Scratch state of the opponent, one variant per difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Easy(RandomAi),
    Medium(QueueAi),
    Hard(ParityAi),
}

impl AiState {
    /// Empty state for `difficulty`.
    pub fn fresh(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => AiState::Easy(RandomAi),
            Difficulty::Medium => AiState::Medium(QueueAi::new()),
            Difficulty::Hard => AiState::Hard(ParityAi::new()),
        }
    }

    /// Every cell held in the scratch state.
    pub fn tracked_cells(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            AiState::Easy(_) => Box::new(std::iter::empty()),
            AiState::Medium(ai) => Box::new(ai.target_queue.iter().copied()),
            AiState::Hard(ai) => Box::new(ai.target_hits.iter().copied()),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            AiState::Easy(_) => Difficulty::Easy,
            AiState::Medium(_) => Difficulty::Medium,
            AiState::Hard(_) => Difficulty::Hard,
        }
    }
}

impl Default for AiState {
    fn default() -> Self {
        AiState::fresh(Difficulty::default())
    }
}

impl Strategy for AiState {
    fn pick_shot(&mut self, rng: &mut SmallRng, ledger: &ShotLedger, grid: Grid) -> Option<usize> {
        match self {
            AiState::Easy(ai) => ai.pick_shot(rng, ledger, grid),
            AiState::Medium(ai) => ai.pick_shot(rng, ledger, grid),
            AiState::Hard(ai) => ai.pick_shot(rng, ledger, grid),
        }
    }

    fn observe(&mut self, index: usize, result: &ShotResult, grid: Grid) {
        match self {
            AiState::Easy(ai) => ai.observe(index, result, grid),
            AiState::Medium(ai) => ai.observe(index, result, grid),
            AiState::Hard(ai) => ai.observe(index, result, grid),
        }
    }
}
