use match3_core::{has_match, Grid};
use match3_types::Pos;

/// Every adjacent pair whose swap produces at least one match.
///
/// Pairs are `(pos, right or upper neighbor)`, column-major. The grid is
/// swapped in a scratch copy and never modified.
pub fn valid_swaps(grid: &Grid) -> Vec<(Pos, Pos)> {
    let mut scratch = grid.clone();
    let mut out = Vec::new();
    for_each_neighbor_pair(grid, |a, b| {
        if swap_matches(&mut scratch, a, b) {
            out.push((a, b));
        }
        true
    });
    out
}

/// First pair [`valid_swaps`] would report, without collecting the rest.
pub fn first_valid_swap(grid: &Grid) -> Option<(Pos, Pos)> {
    let mut scratch = grid.clone();
    let mut found = None;
    for_each_neighbor_pair(grid, |a, b| {
        if swap_matches(&mut scratch, a, b) {
            found = Some((a, b));
            return false;
        }
        true
    });
    found
}

fn swap_matches(scratch: &mut Grid, a: Pos, b: Pos) -> bool {
    if !scratch.swap(a, b) {
        return false;
    }
    let hit = has_match(scratch);
    scratch.swap(a, b);
    hit
}

/// Calls `f` for each (pos, right) and (pos, up) pair until it returns false.
fn for_each_neighbor_pair(grid: &Grid, mut f: impl FnMut(Pos, Pos) -> bool) {
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let here = Pos::new(x, y);
            if x + 1 < grid.width() && !f(here, Pos::new(x + 1, y)) {
                return;
            }
            if y + 1 < grid.height() && !f(here, Pos::new(x, y + 1)) {
                return;
            }
        }
    }
}
