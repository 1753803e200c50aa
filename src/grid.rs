//! Index math for a square `N×N` board.
//!
//! Cells are addressed by a flat index `row * N + col`. All conversions are
//! pure; callers check `contains` before trusting an index from outside.

use serde::{Deserialize, Serialize};

/// Dimensions of a square board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
}

impl Grid {
    /// Create a grid with `size` rows and `size` columns.
    pub const fn new(size: usize) -> Self {
        Self { size }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (`N²`), saturating rather than overflowing.
    pub fn cells(&self) -> usize {
        self.size.checked_mul(self.size).unwrap_or(usize::MAX)
    }

    /// Returns `true` if `index` lies on the board.
    pub fn contains(&self, index: usize) -> bool {
        index < self.cells()
    }

    /// Flat index of (`row`, `col`).
    pub fn to_index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Row and column of a flat index.
    pub fn to_row_col(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    /// On-board orthogonal neighbours of `index`, in the order up, down,
    /// left, right. Edge neighbours are omitted, never wrapped.
    pub fn neighbors4(&self, index: usize) -> Vec<usize> {
        let (r, c) = self.to_row_col(index);
        let mut out = Vec::with_capacity(4);
        if r > 0 {
            out.push(self.to_index(r - 1, c));
        }
        if r + 1 < self.size {
            out.push(self.to_index(r + 1, c));
        }
        if c > 0 {
            out.push(self.to_index(r, c - 1));
        }
        if c + 1 < self.size {
            out.push(self.to_index(r, c + 1));
        }
        out
    }

    /// Checkerboard colour of a cell: `true` when `(row + col)` is even.
    pub fn is_even_parity(&self, index: usize) -> bool {
        let (r, c) = self.to_row_col(index);
        (r + c) % 2 == 0
    }

    /// Iterate over every flat index on the board.
    pub fn indices(&self) -> core::ops::Range<usize> {
        0..self.cells()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(crate::config::BOARD_SIZE)
    }
}
