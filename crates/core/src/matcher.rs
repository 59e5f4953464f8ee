//! Match detection
//!
//! A match is a run of at least three equal, non-empty symbols along a row or
//! a column. Rows are scanned left to right: every column offset that starts
//! three equal cells seeds a run, which is then extended forward for as long
//! as the symbol continues. Columns are scanned bottom to top the same way.
//!
//! A tile can belong to a horizontal and a vertical run at once (L and T
//! shapes), so the result is a set of cells rather than a list of runs.

use crate::grid::Grid;
use crate::types::{Pos, MIN_RUN};

/// Set of grid cells, sized to a particular grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    height: u8,
    /// One flag per cell, same column-major layout as the grid
    mask: Vec<bool>,
    count: usize,
}

impl MatchSet {
    /// Empty set for a grid of the given shape
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            height,
            mask: vec![false; width as usize * height as usize],
            count: 0,
        }
    }

    /// Set containing the given positions; out-of-bounds positions are skipped
    pub fn from_positions(grid: &Grid, positions: impl IntoIterator<Item = Pos>) -> Self {
        let mut set = Self::new(grid.width(), grid.height());
        for pos in positions {
            if let Some(idx) = grid.index(pos) {
                set.mark(idx);
            }
        }
        set
    }

    fn mark(&mut self, idx: usize) {
        if !self.mask[idx] {
            self.mask[idx] = true;
            self.count += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, pos: Pos) -> bool {
        let h = self.height as usize;
        if pos.y >= self.height {
            return false;
        }
        let idx = pos.x as usize * h + pos.y as usize;
        self.mask.get(idx).copied().unwrap_or(false)
    }

    /// Flat grid indices in the set
    pub(crate) fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(idx, &hit)| hit.then_some(idx))
    }

    /// Positions in the set, column-major (x, then y from the bottom)
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let h = self.height as usize;
        self.indices()
            .map(move |idx| Pos::new((idx / h) as u8, (idx % h) as u8))
    }

    pub fn to_vec(&self) -> Vec<Pos> {
        self.positions().collect()
    }
}

/// Find every cell that is part of a run of three or more.
///
/// Returns an empty set when the board is stable.
pub fn find_matches(grid: &Grid) -> MatchSet {
    let w = grid.width() as usize;
    let h = grid.height() as usize;
    let mut set = MatchSet::new(grid.width(), grid.height());

    // Horizontal
    if w >= MIN_RUN {
        for y in 0..h {
            for x in 0..=w - MIN_RUN {
                let Some(symbol) = grid.cell_at(x, y) else {
                    continue;
                };
                if grid.cell_at(x + 1, y) != Some(symbol) || grid.cell_at(x + 2, y) != Some(symbol)
                {
                    continue;
                }
                let mut end = x + MIN_RUN;
                while end < w && grid.cell_at(end, y) == Some(symbol) {
                    end += 1;
                }
                for run_x in x..end {
                    set.mark(grid.index_unchecked(run_x, y));
                }
            }
        }
    }

    // Vertical
    if h >= MIN_RUN {
        for x in 0..w {
            for y in 0..=h - MIN_RUN {
                let Some(symbol) = grid.cell_at(x, y) else {
                    continue;
                };
                if grid.cell_at(x, y + 1) != Some(symbol) || grid.cell_at(x, y + 2) != Some(symbol)
                {
                    continue;
                }
                let mut end = y + MIN_RUN;
                while end < h && grid.cell_at(x, end) == Some(symbol) {
                    end += 1;
                }
                for run_y in y..end {
                    set.mark(grid.index_unchecked(x, run_y));
                }
            }
        }
    }

    set
}

/// True if the grid contains at least one run; stops at the first one found.
pub fn has_match(grid: &Grid) -> bool {
    let w = grid.width() as usize;
    let h = grid.height() as usize;

    if w >= MIN_RUN {
        for y in 0..h {
            for x in 0..=w - MIN_RUN {
                if let Some(symbol) = grid.cell_at(x, y) {
                    if grid.cell_at(x + 1, y) == Some(symbol)
                        && grid.cell_at(x + 2, y) == Some(symbol)
                    {
                        return true;
                    }
                }
            }
        }
    }

    if h >= MIN_RUN {
        for x in 0..w {
            for y in 0..=h - MIN_RUN {
                if let Some(symbol) = grid.cell_at(x, y) {
                    if grid.cell_at(x, y + 1) == Some(symbol)
                        && grid.cell_at(x, y + 2) == Some(symbol)
                    {
                        return true;
                    }
                }
            }
        }
    }

    false
}
