//! Resolver - the cascade loop
//!
//! One pass removes a set of cells, compacts every column toward row 0 and
//! refills the vacated cells from the symbol source. Refills are not
//! constrained, so they may form new runs; the loop re-scans and keeps going
//! until the board is stable, incrementing the combo each pass.
//!
//! The bomb enters the same loop with a flat-scored first pass over its 3x3
//! area; only the natural matches that appear afterwards are combo-scored.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::grid::Grid;
use crate::matcher::{find_matches, has_match, MatchSet};
use crate::rng::SymbolSource;
use crate::scoring::{bomb_score, match_score};
use crate::types::{Pos, MAX_CASCADE_PASSES};

/// What triggered a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Natural run of three or more, combo-scored
    Match,
    /// Bomb area around `center`, flat-scored
    Bomb { center: Pos },
}

/// One remove/compact/refill step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub kind: PassKind,
    /// Multiplier used for this pass (0 for a bomb pass)
    pub combo: u32,
    /// Cells removed, in column-major order, as they were before the pass
    pub positions: Vec<Pos>,
    pub score: u32,
}

impl PassReport {
    pub fn cleared(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Everything that happened during one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub passes: Vec<PassReport>,
    pub total_score: u32,
    /// The pass cap stopped the loop while matches remained
    pub capped: bool,
}

impl CascadeReport {
    fn push(&mut self, pass: PassReport) {
        self.total_score = self.total_score.saturating_add(pass.score);
        self.passes.push(pass);
    }

    /// Highest combo reached (0 if no natural match was resolved)
    pub fn max_combo(&self) -> u32 {
        self.passes.iter().map(|p| p.combo).max().unwrap_or(0)
    }
}

/// Remove the cells in `set`, apply gravity, refill from `source`.
pub fn collapse<S: SymbolSource + ?Sized>(grid: &mut Grid, set: &MatchSet, source: &mut S) {
    grid.clear(set);
    grid.apply_gravity();
    grid.refill(source);
}

/// Resolve matches until the board is stable.
///
/// Returns an empty report if the board has no match to begin with.
pub fn resolve_cascade<S: SymbolSource + ?Sized>(grid: &mut Grid, source: &mut S) -> CascadeReport {
    let mut report = CascadeReport::default();
    run_cascade(grid, source, &mut report);
    report
}

/// Cells hit by a bomb at `center`: the 3x3 neighborhood clipped to the grid.
///
/// Empty if `center` itself is out of bounds.
pub fn bomb_area(grid: &Grid, center: Pos) -> ArrayVec<Pos, 9> {
    let mut area = ArrayVec::new();
    if !grid.in_bounds(center) {
        return area;
    }
    let xs = center.x.saturating_sub(1)..=center.x.saturating_add(1).min(grid.width() - 1);
    for x in xs {
        let ys = center.y.saturating_sub(1)..=center.y.saturating_add(1).min(grid.height() - 1);
        area.extend(
            ys.map(|y| Pos::new(x, y))
                .filter(|pos| pos.chebyshev(center) <= 1),
        );
    }
    area
}

/// Detonate a bomb at `center`, then let the board settle.
pub fn detonate<S: SymbolSource + ?Sized>(
    grid: &mut Grid,
    center: Pos,
    source: &mut S,
) -> CascadeReport {
    let mut report = CascadeReport::default();
    let area = bomb_area(grid, center);
    if area.is_empty() {
        return report;
    }

    let set = MatchSet::from_positions(grid, area.iter().copied());
    let score = bomb_score(set.len());
    debug!(x = center.x, y = center.y, cleared = set.len(), score, "bomb pass");
    collapse(grid, &set, source);
    report.push(PassReport {
        kind: PassKind::Bomb { center },
        combo: 0,
        positions: set.to_vec(),
        score,
    });

    run_cascade(grid, source, &mut report);
    report
}

fn run_cascade<S: SymbolSource + ?Sized>(
    grid: &mut Grid,
    source: &mut S,
    report: &mut CascadeReport,
) {
    let mut combo = 1;
    loop {
        if report.passes.len() as u32 >= MAX_CASCADE_PASSES {
            if has_match(grid) {
                warn!(passes = report.passes.len(), "cascade pass cap reached");
                report.capped = true;
            }
            break;
        }

        let matched = find_matches(grid);
        if matched.is_empty() {
            break;
        }

        let score = match_score(matched.len(), combo);
        debug!(combo, cleared = matched.len(), score, "cascade pass");
        collapse(grid, &matched, source);
        report.push(PassReport {
            kind: PassKind::Match,
            combo,
            positions: matched.to_vec(),
            score,
        });
        combo += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedSource, SimpleRng};
    use crate::types::Symbol;

    #[test]
    fn test_single_pass_scores_combo_one() {
        // Bottom row HHH, refill with a non-matching cycle.
        let mut grid = Grid::from_rows(&["UND", "NDU", "HHH"], 6).unwrap();
        let mut src = ScriptedSource::from_glyphs("TET");

        let report = resolve_cascade(&mut grid, &mut src);

        assert_eq!(report.passes.len(), 1);
        assert_eq!(report.passes[0].combo, 1);
        assert_eq!(report.total_score, 30);
        assert_eq!(grid.to_rows(), vec!["TET", "UND", "NDU"]);
        assert!(!has_match(&grid));
    }

    #[test]
    fn test_refill_chain_increments_combo() {
        // Clearing the bottom row drops nothing (single-row grid) and the
        // refill produces another HHH, then a stable row.
        let mut grid = Grid::from_rows(&["HHH"], 6).unwrap();
        let mut src = ScriptedSource::from_glyphs("HHHUNU");

        let report = resolve_cascade(&mut grid, &mut src);

        let combos: Vec<u32> = report.passes.iter().map(|p| p.combo).collect();
        assert_eq!(combos, vec![1, 2]);
        assert_eq!(report.total_score, 3 * 10 + 3 * 10 * 2);
        assert_eq!(grid.to_rows(), vec!["UNU"]);
    }

    #[test]
    fn test_stable_board_is_untouched() {
        let mut grid = Grid::from_rows(&["HUN", "UNH"], 6).unwrap();
        let before = grid.clone();
        let mut rng = SimpleRng::new(1);

        let report = resolve_cascade(&mut grid, &mut rng);

        assert!(report.passes.is_empty());
        assert_eq!(report.total_score, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_bomb_area_clips_at_corner() {
        let grid = Grid::empty(6, 9, 6);
        let area = bomb_area(&grid, Pos::new(0, 0));
        assert_eq!(area.len(), 4);
        assert_eq!(bomb_area(&grid, Pos::new(3, 4)).len(), 9);
        assert_eq!(bomb_area(&grid, Pos::new(5, 8)).len(), 4);
        assert_eq!(bomb_area(&grid, Pos::new(5, 4)).len(), 6);
        assert!(bomb_area(&grid, Pos::new(6, 0)).is_empty());
    }

    #[test]
    fn test_bomb_area_is_chebyshev_neighborhood() {
        let grid = Grid::from_rows(&["HUN", "DTE", "HUN", "DTE"], 6).unwrap();
        for center in [Pos::new(1, 1), Pos::new(0, 3), Pos::new(2, 0)] {
            let expected: Vec<Pos> = grid
                .cells()
                .map(|(pos, _)| pos)
                .filter(|pos| pos.chebyshev(center) <= 1)
                .collect();
            assert_eq!(bomb_area(&grid, center).to_vec(), expected);
        }

        // Single-column grid clips both sides
        let column = Grid::from_rows(&["H", "U", "N"], 6).unwrap();
        assert_eq!(
            bomb_area(&column, Pos::new(0, 1)).to_vec(),
            vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)]
        );
    }

    #[test]
    fn test_detonate_scores_flat_then_settles() {
        let mut grid = Grid::from_rows(&["HUN", "UNH", "NHU"], 6).unwrap();
        // Refill: 9 tiles, column by column, none forming a run.
        let mut src = ScriptedSource::from_glyphs("HUNUNHNHU");

        let report = detonate(&mut grid, Pos::new(1, 1), &mut src);

        assert_eq!(
            report.passes[0].kind,
            PassKind::Bomb {
                center: Pos::new(1, 1)
            }
        );
        assert_eq!(report.passes[0].cleared(), 9);
        assert_eq!(report.passes[0].score, 180);
        assert_eq!(report.passes.len(), 1);
        assert_eq!(report.total_score, 180);
        assert_eq!(grid.empty_cells(), 0);
        assert_eq!(grid.get(Pos::new(0, 0)), Some(Some(Symbol::Hmstr)));
    }

    #[test]
    fn test_bomb_followed_by_natural_match_starts_at_combo_one() {
        // 3x1 column grid: bomb at the middle clears all three, refill H H H
        // forms a vertical run, then the next refill is stable.
        let mut grid = Grid::from_rows(&["U", "N", "D"], 6).unwrap();
        let mut src = ScriptedSource::from_glyphs("HHHUNU");

        let report = detonate(&mut grid, Pos::new(0, 1), &mut src);

        assert_eq!(report.passes.len(), 2);
        assert_eq!(report.passes[0].score, 60);
        assert_eq!(report.passes[1].kind, PassKind::Match);
        assert_eq!(report.passes[1].combo, 1);
        assert_eq!(report.passes[1].score, 30);
        assert_eq!(report.total_score, 90);
    }

    #[test]
    fn test_cascade_terminates_on_random_boards() {
        for seed in 1..50 {
            let mut rng = SimpleRng::new(seed);
            let mut grid = Grid::generate(6, 9, 6, &mut rng);
            // Force a run in the bottom row.
            for x in 0..3 {
                grid.set(Pos::new(x, 0), Some(Symbol::Ton));
            }

            let report = resolve_cascade(&mut grid, &mut rng);

            assert!(!report.passes.is_empty());
            assert!(!report.capped);
            assert!(!has_match(&grid));
            assert_eq!(grid.empty_cells(), 0);
            let combos: Vec<u32> = report.passes.iter().map(|p| p.combo).collect();
            let expected: Vec<u32> = (1..=combos.len() as u32).collect();
            assert_eq!(combos, expected);
        }
    }
}
