//! Grid module - W x H board of typed tiles
//!
//! Tiles live in a flat `Vec` stored **column-major** (`x * height + y`) so a
//! column is a contiguous slice; gravity compaction then works on one slice at
//! a time. Row 0 is the bottom row.
//!
//! The grid always holds exactly `width * height` tiles. A cell may be empty
//! (`None`) only transiently, between clearing matched tiles and refilling.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::matcher::{has_match, MatchSet};
use crate::rng::SymbolSource;
use crate::types::{
    Cell, Pos, Symbol, TileId, MAX_CELL_REDRAWS, MAX_GENERATION_ATTEMPTS, MAX_GRID_DIM,
};

/// Errors raised when building a grid from explicit data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions {width}x{height} outside 1..={}", MAX_GRID_DIM)]
    InvalidDimensions { width: usize, height: usize },
    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("unknown glyph {glyph:?} at row {row}")]
    UnknownGlyph { glyph: char, row: usize },
    #[error("expected {expected} symbols, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("grid is {actual_width}x{actual_height}, session expects {width}x{height}")]
    SizeMismatch {
        width: u8,
        height: u8,
        actual_width: u8,
        actual_height: u8,
    },
}

/// One tile: identity plus face value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub cell: Cell,
}

/// The playfield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Number of symbols in play (first N of `Symbol::ALL`)
    alphabet: u8,
    /// Column-major tiles (x * height + y)
    tiles: Vec<Tile>,
    next_id: u32,
}

impl Grid {
    /// Create a grid of empty cells
    pub fn empty(width: u8, height: u8, alphabet: u8) -> Self {
        let len = width as usize * height as usize;
        let mut grid = Self {
            width,
            height,
            alphabet: alphabet.clamp(1, Symbol::COUNT as u8),
            tiles: vec![
                Tile {
                    id: TileId(0),
                    cell: None,
                };
                len
            ],
            next_id: 0,
        };
        grid.renumber_from(TileId(0));
        grid
    }

    /// Generate a grid with no pre-existing matches.
    ///
    /// Regenerates the whole board up to `MAX_GENERATION_ATTEMPTS` times. If
    /// that keeps failing, falls back to resampling cell by cell. With fewer
    /// than three symbols even that can fail; the grid is then returned with
    /// matches in it and a warning is logged.
    pub fn generate<S: SymbolSource + ?Sized>(
        width: u8,
        height: u8,
        alphabet: u8,
        source: &mut S,
    ) -> Self {
        Self::generate_from(width, height, alphabet, TileId(0), source)
    }

    /// [`Grid::generate`] with tile ids allocated from `first_id` upward.
    pub fn generate_from<S: SymbolSource + ?Sized>(
        width: u8,
        height: u8,
        alphabet: u8,
        first_id: TileId,
        source: &mut S,
    ) -> Self {
        let mut grid = Self::empty(width, height, alphabet);
        grid.renumber_from(first_id);

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            grid.fill_random(source);
            if !has_match(&grid) {
                debug!(attempt, width, height, "generated stable grid");
                return grid;
            }
        }

        warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            "full regeneration kept producing matches, resampling per cell"
        );
        grid.fill_constrained(source);
        if has_match(&grid) {
            warn!(
                alphabet = grid.alphabet,
                "no-match constraint could not be satisfied, accepting grid with matches"
            );
        }
        grid
    }

    /// Build a grid from glyph rows, **top row first** (as it reads on screen).
    ///
    /// Glyphs are those of [`Symbol::glyph`]; `.` marks an empty cell.
    /// Whitespace inside a row is ignored.
    ///
    /// ```
    /// use match3_core::Grid;
    ///
    /// let grid = Grid::from_rows(&["HUN", "DTE"], 6).unwrap();
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.height(), 2);
    /// ```
    pub fn from_rows(rows: &[&str], alphabet: u8) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows
            .first()
            .map(|r| r.chars().filter(|c| !c.is_whitespace()).count())
            .unwrap_or(0);
        if width == 0
            || height == 0
            || width > MAX_GRID_DIM as usize
            || height > MAX_GRID_DIM as usize
        {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let mut grid = Self::empty(width as u8, height as u8, alphabet);
        for (row, line) in rows.iter().enumerate() {
            let glyphs: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if glyphs.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    len: glyphs.len(),
                    expected: width,
                });
            }
            let y = height - 1 - row;
            for (x, glyph) in glyphs.into_iter().enumerate() {
                let cell = if glyph == '.' {
                    None
                } else {
                    Some(Symbol::from_glyph(glyph).ok_or(GridError::UnknownGlyph { glyph, row })?)
                };
                let idx = grid.index_unchecked(x, y);
                grid.tiles[idx].cell = cell;
            }
        }
        Ok(grid)
    }

    /// Build a grid from symbols in storage order (column by column, each
    /// column bottom row first).
    pub fn from_symbols(
        width: u8,
        height: u8,
        alphabet: u8,
        symbols: &[Symbol],
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 || width > MAX_GRID_DIM || height > MAX_GRID_DIM {
            return Err(GridError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        let mut grid = Self::empty(width, height, alphabet);
        if symbols.len() != grid.len() {
            return Err(GridError::LengthMismatch {
                expected: grid.len(),
                actual: symbols.len(),
            });
        }
        for (tile, symbol) in grid.tiles.iter_mut().zip(symbols) {
            tile.cell = Some(*symbol);
        }
        Ok(grid)
    }

    /// Get width of the grid
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the grid
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of symbols in play
    pub fn alphabet(&self) -> u8 {
        self.alphabet
    }

    /// Total number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Flat index for a position, `None` when out of bounds
    #[inline(always)]
    pub fn index(&self, pos: Pos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.index_unchecked(pos.x as usize, pos.y as usize))
    }

    #[inline(always)]
    pub(crate) fn index_unchecked(&self, x: usize, y: usize) -> usize {
        x * self.height as usize + y
    }

    /// Position of a flat index
    #[inline(always)]
    pub(crate) fn pos_of_index(&self, idx: usize) -> Pos {
        let h = self.height as usize;
        Pos::new((idx / h) as u8, (idx % h) as u8)
    }

    /// Cell at (x, y) without bounds checks beyond the slice's own
    #[inline(always)]
    pub(crate) fn cell_at(&self, x: usize, y: usize) -> Cell {
        self.tiles[self.index_unchecked(x, y)].cell
    }

    /// Get cell at position; `None` if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.tiles[idx].cell)
    }

    /// Get the tile at position; `None` if out of bounds
    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).map(|idx| &self.tiles[idx])
    }

    /// Overwrite the face value at a position, keeping the tile id.
    /// Returns false if out of bounds.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.tiles[idx].cell = cell;
                true
            }
            None => false,
        }
    }

    /// Current position of a tile id
    pub fn position_of(&self, id: TileId) -> Option<Pos> {
        self.tiles
            .iter()
            .position(|t| t.id == id)
            .map(|idx| self.pos_of_index(idx))
    }

    /// Tiles of column `x`, bottom row first
    pub fn column(&self, x: u8) -> Option<&[Tile]> {
        if x >= self.width {
            return None;
        }
        let h = self.height as usize;
        let start = x as usize * h;
        Some(&self.tiles[start..start + h])
    }

    /// All tiles with their positions, column-major
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (self.pos_of_index(idx), tile))
    }

    /// Face values with their positions, column-major
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.iter().map(|(pos, tile)| (pos, tile.cell))
    }

    /// Exchange the tiles at two edge-adjacent positions.
    ///
    /// Returns false (and leaves the grid untouched) if either position is out
    /// of bounds or the two are not adjacent. Does not look for matches.
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        if !a.is_adjacent(b) {
            return false;
        }
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.tiles.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Re-roll every face value in place; positions and ids are unchanged.
    /// No anti-match constraint is applied.
    pub fn reroll<S: SymbolSource + ?Sized>(&mut self, source: &mut S) {
        let alphabet = self.alphabet as usize;
        for tile in &mut self.tiles {
            tile.cell = Some(source.draw(alphabet));
        }
    }

    /// Empty every cell in the set. Returns the number of cells cleared.
    pub fn clear(&mut self, set: &MatchSet) -> usize {
        let mut cleared = 0;
        for idx in set.indices() {
            if let Some(tile) = self.tiles.get_mut(idx) {
                tile.cell = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Compact each column toward row 0, preserving the vertical order of the
    /// surviving tiles. Vacated cells at the top are left empty.
    pub fn apply_gravity(&mut self) {
        let h = self.height as usize;
        for column in self.tiles.chunks_mut(h) {
            // Two-pointer compaction
            let mut write = 0;
            for read in 0..h {
                if column[read].cell.is_some() {
                    if write != read {
                        column[write] = column[read];
                    }
                    write += 1;
                }
            }
            for tile in &mut column[write..] {
                tile.cell = None;
            }
        }
    }

    /// Fill every empty cell with a fresh tile. Returns the number of tiles created.
    pub fn refill<S: SymbolSource + ?Sized>(&mut self, source: &mut S) -> usize {
        let alphabet = self.alphabet as usize;
        let mut created = 0;
        for idx in 0..self.tiles.len() {
            if self.tiles[idx].cell.is_none() {
                let id = self.alloc_id();
                self.tiles[idx] = Tile {
                    id,
                    cell: Some(source.draw(alphabet)),
                };
                created += 1;
            }
        }
        created
    }

    /// Count of empty cells
    pub fn empty_cells(&self) -> usize {
        self.tiles.iter().filter(|t| t.cell.is_none()).count()
    }

    /// Rows as glyph strings, top row first (inverse of [`Grid::from_rows`])
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as usize)
            .rev()
            .map(|y| {
                (0..self.width as usize)
                    .map(|x| self.cell_at(x, y).map_or('.', |s| s.glyph()))
                    .collect()
            })
            .collect()
    }

    /// Id the next refilled tile will get
    pub fn next_id(&self) -> TileId {
        TileId(self.next_id)
    }

    /// Give every tile a fresh id, column-major from `first`.
    pub fn renumber_from(&mut self, first: TileId) {
        self.next_id = first.0;
        for idx in 0..self.tiles.len() {
            let id = self.alloc_id();
            self.tiles[idx].id = id;
        }
    }

    fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Independent uniform symbols in every cell; ids are kept.
    fn fill_random<S: SymbolSource + ?Sized>(&mut self, source: &mut S) {
        let alphabet = self.alphabet as usize;
        for tile in &mut self.tiles {
            tile.cell = Some(source.draw(alphabet));
        }
    }

    /// Fill column by column, bottom up, redrawing any symbol that would
    /// complete a run with the two cells to its left or the two below it.
    fn fill_constrained<S: SymbolSource + ?Sized>(&mut self, source: &mut S) {
        let alphabet = self.alphabet as usize;
        for idx in 0..self.tiles.len() {
            self.tiles[idx].cell = None;
        }
        for x in 0..self.width as usize {
            for y in 0..self.height as usize {
                let mut symbol = source.draw(alphabet);
                let mut redraws = 0;
                while self.completes_run(x, y, symbol) && redraws < MAX_CELL_REDRAWS {
                    symbol = source.draw(alphabet);
                    redraws += 1;
                }
                if self.completes_run(x, y, symbol) {
                    if let Some(alt) = Symbol::ALL[..alphabet]
                        .iter()
                        .copied()
                        .find(|s| !self.completes_run(x, y, *s))
                    {
                        symbol = alt;
                    }
                }
                let idx = self.index_unchecked(x, y);
                self.tiles[idx].cell = Some(symbol);
            }
        }
    }

    fn completes_run(&self, x: usize, y: usize, symbol: Symbol) -> bool {
        let s = Some(symbol);
        let horizontal = x >= 2 && self.cell_at(x - 1, y) == s && self.cell_at(x - 2, y) == s;
        let vertical = y >= 2 && self.cell_at(x, y - 1) == s && self.cell_at(x, y - 2) == s;
        horizontal || vertical
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
