//! Session module - the turn controller
//!
//! A [`Session`] owns the grid, the symbol source, the player profile and the
//! per-game counters. Input arrives as taps; each tap either updates the
//! selection or, on a second adjacent tap, runs a whole turn synchronously:
//!
//! ```text
//! IDLE --tap--> SELECTED --same tile--> IDLE
//!                  |  \--non-adjacent--> SELECTED (new tile)
//!                  \--adjacent--> RESOLVING --swap, cascade, win/loss--> IDLE
//! ```
//!
//! Everything the presentation layer needs to animate the turn is queued as
//! [`BoardEvent`]s; see [`Session::drain_events`].

use tracing::{debug, info, instrument};

use crate::config::{ConfigError, EngineConfig};
use crate::grid::{Grid, GridError};
use crate::matcher::has_match;
use crate::profile::{Inventory, Profile, PurchaseOutcome, RewardOutcome};
use crate::resolver::{resolve_cascade, CascadeReport, PassKind, PassReport};
use crate::rng::{SimpleRng, SymbolSource};
use crate::scoring::{target_score, win_reward};
use crate::snapshot::{SessionSnapshot, TileSnapshot};
use crate::types::{BoardEvent, BoosterKind, GameStatus, Pos, TileId};

use chrono::NaiveDate;

/// Why a tap did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A turn is resolving or awaiting `presentation_settled`
    Processing,
    /// Status is not `Playing`
    NotPlaying,
    OutOfBounds,
    UnknownTile,
    /// The bomb was armed but the inventory had run out; it is now disarmed
    BoosterUnavailable,
}

/// Summary of a resolved turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub score_delta: u32,
    pub passes: Vec<PassReport>,
    /// Status after the win/loss check
    pub status: GameStatus,
    pub moves: u32,
    /// The cascade stopped at the pass cap
    pub capped: bool,
}

/// Result of a tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    Ignored(IgnoreReason),
    /// First tile of a pair chosen
    Selected(Pos),
    /// Tapped the selected tile again
    Deselected(Pos),
    /// Non-adjacent tile replaced the selection
    Reselected(Pos),
    /// Swap produced no match and was reverted; no move spent
    InvalidSwap { a: Pos, b: Pos },
    Resolved(TurnReport),
    /// Armed bomb detonated at the tapped tile
    Bombed(TurnReport),
}

/// A match-3 game in progress (or waiting in the menu)
#[derive(Debug, Clone)]
pub struct Session<S: SymbolSource = SimpleRng> {
    pub(crate) config: EngineConfig,
    pub(crate) grid: Grid,
    pub(crate) source: S,
    pub(crate) profile: Profile,
    /// Profile changed since the last checkpoint
    pub(crate) profile_dirty: bool,
    pub(crate) score: u32,
    pub(crate) moves: u32,
    pub(crate) level: u32,
    pub(crate) status: GameStatus,
    pub(crate) selection: Option<Pos>,
    pub(crate) processing: bool,
    pub(crate) active_booster: Option<BoosterKind>,
    pub(crate) events: Vec<BoardEvent>,
    /// Increments on every `new_game`
    pub(crate) game_id: u32,
}

impl Session<SimpleRng> {
    /// Session seeded from `config.seed`, in the menu, with a default profile
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let source = SimpleRng::new(config.seed);
        Self::with_source(config, source)
    }
}

impl<S: SymbolSource> Session<S> {
    pub fn with_source(config: EngineConfig, mut source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::generate(config.width, config.height, config.symbol_count, &mut source);
        Ok(Self {
            config,
            grid,
            source,
            profile: Profile::default(),
            profile_dirty: false,
            score: 0,
            moves: 0,
            level: 1,
            status: GameStatus::Menu,
            selection: None,
            processing: false,
            active_booster: None,
            events: Vec::new(),
            game_id: 0,
        })
    }

    /// Replace the profile (e.g. one loaded from a store)
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self.profile_dirty = false;
        self
    }

    /// Start level `level` (clamped to at least 1) on a fresh stable grid.
    ///
    /// Resets score, moves, selection, the processing flag and any armed
    /// booster. The profile carries over.
    #[instrument(skip(self))]
    pub fn new_game(&mut self, level: u32) {
        let level = level.max(1);
        self.grid = Grid::generate_from(
            self.config.width,
            self.config.height,
            self.config.symbol_count,
            self.grid.next_id(),
            &mut self.source,
        );
        self.game_id = self.game_id.wrapping_add(1);
        self.level = level;
        self.score = 0;
        self.moves = self.config.initial_moves;
        self.selection = None;
        self.processing = false;
        self.active_booster = None;
        self.status = GameStatus::Playing;

        info!(level, target = self.target_score(), moves = self.moves, "game started");
        self.events.push(BoardEvent::GameStarted {
            level,
            target_score: self.target_score(),
            moves: self.moves,
        });
    }

    /// Back to the menu. Score and grid stay readable until the next game.
    pub fn quit(&mut self) {
        self.status = GameStatus::Menu;
        self.selection = None;
        self.active_booster = None;
        self.processing = false;
        info!(game_id = self.game_id, score = self.score, "game quit");
    }

    /// Handle a tap on the tile at `pos`.
    pub fn tap(&mut self, pos: Pos) -> TapOutcome {
        if self.status != GameStatus::Playing {
            return TapOutcome::Ignored(IgnoreReason::NotPlaying);
        }
        if self.processing {
            return TapOutcome::Ignored(IgnoreReason::Processing);
        }
        if !self.grid.in_bounds(pos) {
            return TapOutcome::Ignored(IgnoreReason::OutOfBounds);
        }

        if self.active_booster == Some(BoosterKind::Bomb) {
            return self.detonate_bomb(pos);
        }

        match self.selection {
            None => {
                self.selection = Some(pos);
                self.events.push(BoardEvent::TileSelected { pos });
                TapOutcome::Selected(pos)
            }
            Some(selected) if selected == pos => {
                self.selection = None;
                self.events.push(BoardEvent::SelectionCleared { pos });
                TapOutcome::Deselected(pos)
            }
            Some(selected) if !selected.is_adjacent(pos) => {
                self.selection = Some(pos);
                self.events.push(BoardEvent::TileSelected { pos });
                TapOutcome::Reselected(pos)
            }
            Some(selected) => {
                self.selection = None;
                self.swap_and_resolve(selected, pos)
            }
        }
    }

    /// Handle a tap on the tile with identity `id`, wherever it is now.
    pub fn tap_tile(&mut self, id: TileId) -> TapOutcome {
        match self.grid.position_of(id) {
            Some(pos) => self.tap(pos),
            None => TapOutcome::Ignored(IgnoreReason::UnknownTile),
        }
    }

    fn swap_and_resolve(&mut self, a: Pos, b: Pos) -> TapOutcome {
        self.processing = true;
        self.grid.swap(a, b);
        self.events.push(BoardEvent::Swapped { a, b });

        if !has_match(&self.grid) {
            self.grid.swap(a, b);
            self.events.push(BoardEvent::SwapReverted { a, b });
            self.processing = false;
            debug!(?a, ?b, "swap reverted");
            return TapOutcome::InvalidSwap { a, b };
        }

        self.moves = self.moves.saturating_sub(1);
        let report = resolve_cascade(&mut self.grid, &mut self.source);
        TapOutcome::Resolved(self.settle_turn(report))
    }

    /// Emit pass events, apply the score, run the win/loss check.
    pub(crate) fn settle_turn(&mut self, report: CascadeReport) -> TurnReport {
        for pass in &report.passes {
            match pass.kind {
                PassKind::Bomb { center } => self.events.push(BoardEvent::BombDetonated {
                    center,
                    positions: pass.positions.clone(),
                }),
                PassKind::Match => self.events.push(BoardEvent::MatchFound {
                    combo: pass.combo,
                    positions: pass.positions.clone(),
                }),
            }
            self.events.push(BoardEvent::PassResolved {
                combo: pass.combo,
                cleared: pass.cleared(),
                score: pass.score,
            });
        }

        self.score = self.score.saturating_add(report.total_score);
        self.evaluate_status();

        self.events.push(BoardEvent::TurnSettled {
            score_delta: report.total_score,
            score: self.score,
            moves: self.moves,
            status: self.status,
        });
        self.processing = self.config.hold_input_for_presentation;

        TurnReport {
            score_delta: report.total_score,
            passes: report.passes,
            status: self.status,
            moves: self.moves,
            capped: report.capped,
        }
    }

    fn evaluate_status(&mut self) {
        if self.score >= self.target_score() {
            self.status = GameStatus::Won;
            let amount = win_reward(self.level);
            let balance = self.profile.credit(amount);
            self.profile_dirty = true;
            info!(level = self.level, score = self.score, amount, balance, "level won");
            self.events
                .push(BoardEvent::CurrencyCredited { amount, balance });
        } else if self.moves == 0 {
            self.status = GameStatus::GameOver;
            info!(level = self.level, score = self.score, "out of moves");
        }
    }

    /// Release the input lock held for presentation after a turn.
    pub fn presentation_settled(&mut self) {
        self.processing = false;
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// The profile, if it changed since the last call
    pub fn take_checkpoint(&mut self) -> Option<Profile> {
        if !self.profile_dirty {
            return None;
        }
        self.profile_dirty = false;
        Some(self.profile.clone())
    }

    pub fn claim_daily_reward(&mut self, today: NaiveDate) -> RewardOutcome {
        let outcome = self.profile.claim_daily_reward(today);
        if let RewardOutcome::Claimed { amount, balance } = outcome {
            self.profile_dirty = true;
            self.events
                .push(BoardEvent::CurrencyCredited { amount, balance });
        }
        outcome
    }

    pub fn buy_booster(&mut self, kind: BoosterKind, price: u64) -> PurchaseOutcome {
        let outcome = self.profile.buy_booster(kind, price);
        if let PurchaseOutcome::Purchased { .. } = outcome {
            self.profile_dirty = true;
        }
        outcome
    }

    /// Swap in a prepared grid of the same shape (tools and tests).
    ///
    /// Its tiles are renumbered so ids stay unique within the session.
    pub fn replace_grid(&mut self, grid: Grid) -> Result<(), GridError> {
        if grid.width() != self.config.width || grid.height() != self.config.height {
            return Err(GridError::SizeMismatch {
                width: self.config.width,
                height: self.config.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        let mut grid = grid;
        grid.renumber_from(self.grid.next_id());
        self.grid = grid;
        self.selection = None;
        Ok(())
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.game_id = self.game_id;
        out.level = self.level;
        out.status = self.status;
        out.score = self.score;
        out.target_score = self.target_score();
        out.moves = self.moves;
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.tiles.clear();
        out.tiles
            .extend(self.grid.iter().map(|(pos, tile)| TileSnapshot::new(pos, tile)));
        out.selection = self.selection;
        out.processing = self.processing;
        out.active_booster = self.active_booster;
        out.currency = self.profile.currency;
        out.boosters = self.profile.boosters;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn target_score(&self) -> u32 {
        target_score(self.level)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn selection(&self) -> Option<Pos> {
        self.selection
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn active_booster(&self) -> Option<BoosterKind> {
        self.active_booster
    }

    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn inventory(&self) -> &Inventory {
        &self.profile.boosters
    }

    /// True when a tap would be acted on
    pub fn accepts_input(&self) -> bool {
        self.status == GameStatus::Playing && !self.processing
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    #[cfg(test)]
    pub(crate) fn set_moves(&mut self, moves: u32) {
        self.moves = moves;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::types::Symbol;

    /// 3x3 session on a scripted source; refills cycle through `refill`.
    fn scripted(rows: &[&str], refill: &str) -> Session<ScriptedSource> {
        let config = EngineConfig {
            width: rows[0].len() as u8,
            height: rows.len() as u8,
            ..EngineConfig::default()
        };
        let mut session =
            Session::with_source(config, ScriptedSource::from_glyphs("HUNDTE")).unwrap();
        session.new_game(1);
        session.replace_grid(Grid::from_rows(rows, 6).unwrap()).unwrap();
        session.source = ScriptedSource::from_glyphs(refill);
        session.drain_events();
        session
    }

    // Swapping (0,0) with (0,1) turns the bottom row into HHH.
    const ROWS: [&str; 3] = ["UND", "HDU", "UHH"];

    #[test]
    fn test_new_session_is_in_menu() {
        let mut session = Session::new(EngineConfig::default()).unwrap();
        assert_eq!(session.status(), GameStatus::Menu);
        assert_eq!(
            session.tap(Pos::new(0, 0)),
            TapOutcome::Ignored(IgnoreReason::NotPlaying)
        );
    }

    #[test]
    fn test_new_game_grid_is_stable() {
        let mut session = Session::new(EngineConfig::default()).unwrap();
        session.new_game(2);
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.moves(), 25);
        assert_eq!(session.target_score(), 1000);
        assert!(!has_match(session.grid()));
        assert!(matches!(
            session.drain_events().as_slice(),
            [BoardEvent::GameStarted { level: 2, .. }]
        ));
    }

    #[test]
    fn test_selection_state_machine() {
        let mut session = scripted(&ROWS, "TET");
        let a = Pos::new(0, 0);

        assert_eq!(session.tap(a), TapOutcome::Selected(a));
        assert_eq!(session.tap(a), TapOutcome::Deselected(a));
        assert_eq!(session.selection(), None);

        session.tap(a);
        // Manhattan distance 2 reselects
        let far = Pos::new(2, 0);
        assert_eq!(session.tap(far), TapOutcome::Reselected(far));
        assert_eq!(session.selection(), Some(far));
        // Diagonal also reselects
        let diag = Pos::new(1, 1);
        assert_eq!(session.tap(diag), TapOutcome::Reselected(diag));
    }

    #[test]
    fn test_invalid_swap_rolls_back() {
        let mut session = scripted(&ROWS, "TET");
        let before = session.grid().clone();

        session.tap(Pos::new(1, 1));
        let outcome = session.tap(Pos::new(1, 2));

        assert!(matches!(outcome, TapOutcome::InvalidSwap { .. }));
        assert_eq!(session.grid(), &before);
        assert_eq!(session.moves(), 25);
        assert!(!session.is_processing());
        let events = session.drain_events();
        assert!(matches!(events.last(), Some(BoardEvent::SwapReverted { .. })));
    }

    #[test]
    fn test_valid_swap_spends_a_move_and_scores() {
        let mut session = scripted(&ROWS, "TET");

        session.tap(Pos::new(0, 0));
        let outcome = session.tap(Pos::new(0, 1));

        let TapOutcome::Resolved(report) = outcome else {
            panic!("expected a resolved turn");
        };
        assert_eq!(report.score_delta, 30);
        assert_eq!(report.passes.len(), 1);
        assert_eq!(report.status, GameStatus::Playing);
        assert_eq!(session.moves(), 24);
        assert_eq!(session.score(), 30);
        assert!(!has_match(session.grid()));
    }

    #[test]
    fn test_crossing_target_wins_and_credits() {
        let mut session = scripted(&ROWS, "TET");
        session.set_score(480);

        session.tap(Pos::new(0, 0));
        let TapOutcome::Resolved(report) = session.tap(Pos::new(0, 1)) else {
            panic!("expected a resolved turn");
        };

        assert_eq!(session.score(), 510);
        assert_eq!(report.status, GameStatus::Won);
        assert_eq!(session.profile().currency, 50);
        let checkpoint = session.take_checkpoint().expect("profile changed");
        assert_eq!(checkpoint.currency, 50);
        assert_eq!(session.take_checkpoint(), None);
        assert_eq!(
            session.tap(Pos::new(0, 0)),
            TapOutcome::Ignored(IgnoreReason::NotPlaying)
        );
    }

    #[test]
    fn test_last_move_below_target_is_game_over() {
        let mut session = scripted(&ROWS, "TET");
        session.set_moves(1);

        session.tap(Pos::new(0, 0));
        let TapOutcome::Resolved(report) = session.tap(Pos::new(0, 1)) else {
            panic!("expected a resolved turn");
        };

        assert_eq!(report.status, GameStatus::GameOver);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.profile().currency, 0);
    }

    #[test]
    fn test_turn_events_in_order() {
        let mut session = scripted(&ROWS, "TET");
        session.tap(Pos::new(0, 0));
        session.tap(Pos::new(0, 1));

        let kinds: Vec<&'static str> = session
            .drain_events()
            .iter()
            .map(|e| match e {
                BoardEvent::TileSelected { .. } => "selected",
                BoardEvent::Swapped { .. } => "swapped",
                BoardEvent::MatchFound { .. } => "match",
                BoardEvent::PassResolved { .. } => "pass",
                BoardEvent::TurnSettled { .. } => "settled",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["selected", "swapped", "match", "pass", "settled"]);
    }

    #[test]
    fn test_hold_input_until_presentation_settles() {
        let mut session = scripted(&ROWS, "TET");
        session.config.hold_input_for_presentation = true;

        session.tap(Pos::new(0, 0));
        session.tap(Pos::new(0, 1));
        assert!(session.is_processing());
        assert_eq!(
            session.tap(Pos::new(2, 2)),
            TapOutcome::Ignored(IgnoreReason::Processing)
        );

        session.presentation_settled();
        assert_eq!(
            session.tap(Pos::new(2, 2)),
            TapOutcome::Selected(Pos::new(2, 2))
        );
    }

    #[test]
    fn test_ids_not_reused_across_games() {
        let mut session = scripted(&ROWS, "TET");
        let old_ids: Vec<TileId> = session.grid().iter().map(|(_, t)| t.id).collect();

        session.new_game(2);

        assert!(session
            .grid()
            .iter()
            .all(|(_, t)| !old_ids.contains(&t.id)));
        assert_eq!(
            session.tap_tile(old_ids[0]),
            TapOutcome::Ignored(IgnoreReason::UnknownTile)
        );
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_tap_tile_follows_identity() {
        let mut session = scripted(&ROWS, "TET");
        let id = session.grid().tile(Pos::new(2, 2)).unwrap().id;

        assert_eq!(session.tap_tile(id), TapOutcome::Selected(Pos::new(2, 2)));
        assert_eq!(
            session.tap_tile(TileId(9999)),
            TapOutcome::Ignored(IgnoreReason::UnknownTile)
        );
        assert_eq!(
            session.tap(Pos::new(3, 0)),
            TapOutcome::Ignored(IgnoreReason::OutOfBounds)
        );
    }

    #[test]
    fn test_quit_returns_to_menu() {
        let mut session = scripted(&ROWS, "TET");
        session.tap(Pos::new(0, 0));
        session.quit();
        assert_eq!(session.status(), GameStatus::Menu);
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_profile_survives_new_game() {
        let mut session = Session::new(EngineConfig::default())
            .unwrap()
            .with_profile(Profile {
                currency: 900,
                ..Profile::default()
            });
        session.new_game(1);
        session.new_game(3);
        assert_eq!(session.profile().currency, 900);
        assert_eq!(session.level(), 3);
        assert_eq!(session.game_id(), 2);
    }

    #[test]
    fn test_replace_grid_checks_shape() {
        let mut session = scripted(&ROWS, "TET");
        let wrong = Grid::from_rows(&["HU", "UH"], 6).unwrap();
        assert!(matches!(
            session.replace_grid(wrong),
            Err(GridError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = scripted(&ROWS, "TET");
        session.tap(Pos::new(2, 2));

        let snap = session.snapshot();
        assert_eq!(snap.tiles.len(), 9);
        assert_eq!(snap.selection, Some(Pos::new(2, 2)));
        assert_eq!(snap.tile_at(Pos::new(1, 0)).unwrap().symbol, Some(Symbol::Hmstr));
        assert!(snap.accepts_input());
    }
}
