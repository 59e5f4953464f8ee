//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no game logic, usable from the engine core,
//! the hint/autoplay helpers, and any presentation layer that consumes events.
//!
//! # Grid Dimensions
//!
//! The grid is addressed by `(x, y)` where `x` is the column (left to right)
//! and `y` is the row with **row 0 at the bottom**. Gravity pulls tiles toward
//! row 0. Dimensions are configurable per session; the defaults are:
//!
//! - **Width**: 6 columns (the 8-column variant is also common)
//! - **Height**: 9 rows
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MATCH_POINTS` | 10 | Points per matched tile, multiplied by the combo |
//! | `BOMB_POINTS` | 20 | Flat points per tile cleared by a bomb |
//! | `TARGET_SCORE_PER_LEVEL` | 500 | Level target is `level * 500` |
//! | `WIN_REWARD_PER_LEVEL` | 50 | Currency credited on a win is `level * 50` |
//! | `DAILY_REWARD` | 100 | Currency credited by the daily reward |
//!
//! # Presentation Pauses
//!
//! The engine never sleeps. These durations are hints attached to events so a
//! renderer can sequence its animations:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SWAP_SETTLE_MS` | 300 | After a swap, before matches are shown |
//! | `INVALID_SWAP_MS` | 300 | Swap-back animation for a rejected move |
//! | `CASCADE_PASS_MS` | 400 | Each remove/compact/refill pass |
//! | `SHUFFLE_MS` | 500 | Full board re-roll |
//! | `BOMB_FLASH_MS` | 800 | Explosion effect |
//!
//! # Examples
//!
//! ```
//! use match3_types::{BoosterKind, Pos, Symbol};
//!
//! // Parse from string (case-insensitive)
//! assert_eq!(Symbol::from_str("ton"), Some(Symbol::Ton));
//! assert_eq!(BoosterKind::from_str("extraMoves"), Some(BoosterKind::ExtraMoves));
//!
//! // Adjacency is Manhattan distance 1
//! assert!(Pos::new(2, 3).is_adjacent(Pos::new(2, 4)));
//! assert!(!Pos::new(2, 3).is_adjacent(Pos::new(3, 4)));
//! ```

use serde::{Deserialize, Serialize};

/// Default grid width in columns
pub const DEFAULT_GRID_WIDTH: u8 = 6;

/// Default grid height in rows
pub const DEFAULT_GRID_HEIGHT: u8 = 9;

/// Largest accepted width or height
pub const MAX_GRID_DIM: u8 = 32;

/// Minimum run length that counts as a match
pub const MIN_RUN: usize = 3;

/// Moves granted at the start of every game
pub const DEFAULT_MOVES: u32 = 25;

/// Points per matched tile per combo step
pub const MATCH_POINTS: u32 = 10;

/// Flat points per tile cleared by a bomb (no combo)
pub const BOMB_POINTS: u32 = 20;

/// Target score for level `n` is `n * TARGET_SCORE_PER_LEVEL`
pub const TARGET_SCORE_PER_LEVEL: u32 = 500;

/// Currency credited for winning level `n` is `n * WIN_REWARD_PER_LEVEL`
pub const WIN_REWARD_PER_LEVEL: u64 = 50;

/// Moves added by the extra-moves booster
pub const EXTRA_MOVES_GRANT: u32 = 5;

/// Currency credited by the daily reward
pub const DAILY_REWARD: u64 = 100;

/// Full-board regeneration attempts before falling back to local resampling
pub const MAX_GENERATION_ATTEMPTS: u32 = 64;

/// Redraws allowed per cell during local resampling
pub const MAX_CELL_REDRAWS: u32 = 32;

/// Safety cap on cascade passes within a single resolution
pub const MAX_CASCADE_PASSES: u32 = 100;

/// Pause after a swap before matches are evaluated (presentation hint)
pub const SWAP_SETTLE_MS: u32 = 300;

/// Pause for the swap-back of a rejected move (presentation hint)
pub const INVALID_SWAP_MS: u32 = 300;

/// Pause after each cascade pass (presentation hint)
pub const CASCADE_PASS_MS: u32 = 400;

/// Pause for the shuffle booster (presentation hint)
pub const SHUFFLE_MS: u32 = 500;

/// Duration of the bomb explosion effect (presentation hint)
pub const BOMB_FLASH_MS: u32 = 800;

/// Tile face values
///
/// Six token kinds. A session may restrict itself to the first N of them
/// (see `EngineConfig::symbol_count` in the core crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symbol {
    Hmstr,
    Usdt,
    Not,
    Dogs,
    Ton,
    Elzr,
}

impl Symbol {
    /// Every symbol, in alphabet order
    pub const ALL: [Symbol; 6] = [
        Symbol::Hmstr,
        Symbol::Usdt,
        Symbol::Not,
        Symbol::Dogs,
        Symbol::Ton,
        Symbol::Elzr,
    ];

    /// Number of symbols in the full alphabet
    pub const COUNT: usize = 6;

    /// Symbol at alphabet position `index`, if any
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Alphabet position of this symbol
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse symbol from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::Symbol;
    ///
    /// assert_eq!(Symbol::from_str("HMSTR"), Some(Symbol::Hmstr));
    /// assert_eq!(Symbol::from_str("dogs"), Some(Symbol::Dogs));
    /// assert_eq!(Symbol::from_str("empty"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hmstr" => Some(Symbol::Hmstr),
            "usdt" => Some(Symbol::Usdt),
            "not" => Some(Symbol::Not),
            "dogs" => Some(Symbol::Dogs),
            "ton" => Some(Symbol::Ton),
            "elzr" => Some(Symbol::Elzr),
            _ => None,
        }
    }

    /// Convert to the uppercase token name
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Hmstr => "HMSTR",
            Symbol::Usdt => "USDT",
            Symbol::Not => "NOT",
            Symbol::Dogs => "DOGS",
            Symbol::Ton => "TON",
            Symbol::Elzr => "ELZR",
        }
    }

    /// Single-character glyph used by text dumps of the grid
    pub fn glyph(&self) -> char {
        match self {
            Symbol::Hmstr => 'H',
            Symbol::Usdt => 'U',
            Symbol::Not => 'N',
            Symbol::Dogs => 'D',
            Symbol::Ton => 'T',
            Symbol::Elzr => 'E',
        }
    }

    /// Inverse of [`Symbol::glyph`]
    pub fn from_glyph(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'H' => Some(Symbol::Hmstr),
            'U' => Some(Symbol::Usdt),
            'N' => Some(Symbol::Not),
            'D' => Some(Symbol::Dogs),
            'T' => Some(Symbol::Ton),
            'E' => Some(Symbol::Elzr),
            _ => None,
        }
    }
}

/// A cell on the grid
///
/// - `None`: empty (only exists transiently while a cascade is resolving)
/// - `Some(Symbol)`: occupied by a tile of that symbol
pub type Cell = Option<Symbol>;

/// Unique per-instance tile identity
///
/// Ids are allocated monotonically by the grid and never reused within a
/// session; a refilled cell always gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

/// Grid coordinate: column `x`, row `y` (row 0 is the bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Manhattan (4-neighborhood) distance
    pub fn manhattan(self, other: Pos) -> u32 {
        (self.x.abs_diff(other.x) as u32) + (self.y.abs_diff(other.y) as u32)
    }

    /// Chebyshev (8-neighborhood) distance
    pub fn chebyshev(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y)) as u32
    }

    /// True when the two positions share an edge
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }
}

/// Consumable boosters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoosterKind {
    /// Clears the 3x3 neighborhood of a targeted tile
    Bomb,
    /// Re-rolls every symbol in place
    Shuffle,
    /// Adds moves to the budget
    ExtraMoves,
    /// Tracked in inventory, no gameplay effect
    Shield,
}

impl BoosterKind {
    pub const ALL: [BoosterKind; 4] = [
        BoosterKind::Bomb,
        BoosterKind::Shuffle,
        BoosterKind::ExtraMoves,
        BoosterKind::Shield,
    ];

    /// Parse booster kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::BoosterKind;
    ///
    /// assert_eq!(BoosterKind::from_str("bomb"), Some(BoosterKind::Bomb));
    /// assert_eq!(BoosterKind::from_str("EXTRAMOVES"), Some(BoosterKind::ExtraMoves));
    /// assert_eq!(BoosterKind::from_str("rocket"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bomb" => Some(BoosterKind::Bomb),
            "shuffle" => Some(BoosterKind::Shuffle),
            "extramoves" | "extra_moves" => Some(BoosterKind::ExtraMoves),
            "shield" => Some(BoosterKind::Shield),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            BoosterKind::Bomb => "bomb",
            BoosterKind::Shuffle => "shuffle",
            BoosterKind::ExtraMoves => "extraMoves",
            BoosterKind::Shield => "shield",
        }
    }

    /// Shop price in currency units
    pub fn price(&self) -> u64 {
        match self {
            BoosterKind::Bomb => 500,
            BoosterKind::Shuffle => 300,
            BoosterKind::ExtraMoves => 800,
            BoosterKind::Shield => 1000,
        }
    }

    /// Whether the booster waits for a target tap after being armed
    pub fn needs_target(&self) -> bool {
        matches!(self, BoosterKind::Bomb | BoosterKind::Shield)
    }
}

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Menu,
    Playing,
    Won,
    #[serde(rename = "GAMEOVER")]
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Menu => "MENU",
            GameStatus::Playing => "PLAYING",
            GameStatus::Won => "WON",
            GameStatus::GameOver => "GAMEOVER",
        }
    }

    /// Terminal statuses end a game until `new_game` is called
    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::GameOver)
    }
}

/// Why a booster activation or purchase was declined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineReason {
    /// Inventory count for the booster is zero
    NoInventory,
    /// Currency balance is below the price
    InsufficientFunds,
    /// A turn is still resolving (or awaiting presentation)
    Processing,
    /// No game is in progress
    NotPlaying,
}

/// Discrete engine events for the presentation layer.
///
/// The engine pushes these in order while it resolves a command; the caller
/// drains them and owns all animation timing. [`BoardEvent::pause_hint_ms`]
/// suggests how long to dwell on each one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardEvent {
    GameStarted {
        level: u32,
        target_score: u32,
        moves: u32,
    },
    TileSelected {
        pos: Pos,
    },
    SelectionCleared {
        pos: Pos,
    },
    Swapped {
        a: Pos,
        b: Pos,
    },
    SwapReverted {
        a: Pos,
        b: Pos,
    },
    MatchFound {
        combo: u32,
        positions: Vec<Pos>,
    },
    PassResolved {
        combo: u32,
        cleared: u32,
        score: u32,
    },
    BombDetonated {
        center: Pos,
        positions: Vec<Pos>,
    },
    Shuffled,
    MovesGranted {
        amount: u32,
        moves: u32,
    },
    BoosterArmed {
        booster: BoosterKind,
    },
    BoosterDisarmed {
        booster: BoosterKind,
    },
    BoosterDeclined {
        booster: BoosterKind,
        reason: DeclineReason,
    },
    TurnSettled {
        score_delta: u32,
        score: u32,
        moves: u32,
        status: GameStatus,
    },
    CurrencyCredited {
        amount: u64,
        balance: u64,
    },
}

impl BoardEvent {
    /// Suggested presentation dwell time for this event, in milliseconds
    pub fn pause_hint_ms(&self) -> u32 {
        match self {
            BoardEvent::Swapped { .. } => SWAP_SETTLE_MS,
            BoardEvent::SwapReverted { .. } => INVALID_SWAP_MS,
            BoardEvent::PassResolved { .. } => CASCADE_PASS_MS,
            BoardEvent::Shuffled => SHUFFLE_MS,
            BoardEvent::BombDetonated { .. } => BOMB_FLASH_MS,
            _ => 0,
        }
    }
}
