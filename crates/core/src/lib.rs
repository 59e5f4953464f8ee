//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules, the turn state machine and the
//! player profile. It does no rendering and no timing:
//!
//! - **Deterministic**: the same seed replays the same game
//! - **Synchronous**: a tap runs a whole turn; animation pauses are hints on events
//! - **Testable**: every random draw goes through a [`SymbolSource`] that tests can script
//!
//! # Module Structure
//!
//! - [`grid`]: W x H board of identified tiles, gravity, refill
//! - [`matcher`]: runs of three or more along rows and columns
//! - [`resolver`]: the remove/compact/refill cascade loop and the bomb blast
//! - [`scoring`]: per-pass points, level targets, win reward
//! - [`session`]: selection, swap, rollback, win/loss
//! - [`booster`]: bomb, shuffle, extra moves, shield
//! - [`profile`]: currency, inventory, daily reward, shop
//! - [`store`]: key-value persistence seam for the profile
//! - [`snapshot`]: serializable view for a presentation layer
//! - [`config`]: board shape, alphabet, move budget, seed
//! - [`rng`]: LCG symbol source
//!
//! # Example
//!
//! ```
//! use match3_core::{EngineConfig, GameStatus, Pos, Session, TapOutcome};
//!
//! let mut session = Session::new(EngineConfig::default()).unwrap();
//! session.new_game(1);
//! assert_eq!(session.status(), GameStatus::Playing);
//!
//! // First tap selects, tapping the same tile again deselects
//! assert_eq!(session.tap(Pos::new(0, 0)), TapOutcome::Selected(Pos::new(0, 0)));
//! assert_eq!(session.tap(Pos::new(0, 0)), TapOutcome::Deselected(Pos::new(0, 0)));
//! ```

pub mod booster;
pub mod config;
pub mod grid;
pub mod matcher;
pub mod profile;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod store;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use booster::BoosterOutcome;
pub use config::{ConfigError, EngineConfig};
pub use grid::{Grid, GridError, Tile};
pub use matcher::{find_matches, has_match, MatchSet};
pub use profile::{Inventory, Profile, PurchaseOutcome, RewardOutcome};
pub use resolver::{bomb_area, detonate, resolve_cascade, CascadeReport, PassKind, PassReport};
pub use rng::{ScriptedSource, SimpleRng, SymbolSource};
pub use session::{IgnoreReason, Session, TapOutcome, TurnReport};
pub use snapshot::{SessionSnapshot, TileSnapshot};
pub use store::{load_profile, save_profile, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use types::{BoardEvent, BoosterKind, Cell, DeclineReason, GameStatus, Pos, Symbol, TileId};
