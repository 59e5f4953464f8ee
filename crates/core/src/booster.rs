//! Booster effects
//!
//! | Booster | Activation | Effect |
//! |---------|------------|--------|
//! | Extra moves | instant | `+EXTRA_MOVES_GRANT` moves |
//! | Shuffle | instant | every symbol re-rolled in place, ids kept |
//! | Bomb | arm, then tap a tile | 3x3 clear, flat score, then cascade |
//! | Shield | arm only | none; never consumed |
//!
//! Activating the booster that is already armed disarms it, whatever the
//! inventory says. Otherwise activation needs a count above zero, a game in
//! progress and no turn in flight.

use tracing::{info, instrument};

use crate::resolver::detonate;
use crate::rng::SymbolSource;
use crate::session::{IgnoreReason, Session, TapOutcome};
use crate::types::{BoardEvent, BoosterKind, DeclineReason, GameStatus, Pos, EXTRA_MOVES_GRANT};

/// Result of `Session::activate_booster`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoosterOutcome {
    /// Waiting for a target tap
    Armed,
    Disarmed,
    /// Instant effect applied, inventory decremented
    Applied,
    /// Nothing changed
    Declined(DeclineReason),
}

impl<S: SymbolSource> Session<S> {
    #[instrument(skip(self))]
    pub fn activate_booster(&mut self, kind: BoosterKind) -> BoosterOutcome {
        if self.status != GameStatus::Playing {
            return self.decline(kind, DeclineReason::NotPlaying);
        }
        if self.processing {
            return self.decline(kind, DeclineReason::Processing);
        }

        if self.active_booster == Some(kind) {
            self.active_booster = None;
            self.events.push(BoardEvent::BoosterDisarmed { booster: kind });
            return BoosterOutcome::Disarmed;
        }

        if self.profile.boosters.count(kind) == 0 {
            return self.decline(kind, DeclineReason::NoInventory);
        }

        match kind {
            BoosterKind::ExtraMoves => {
                self.profile.boosters.consume(kind);
                self.profile_dirty = true;
                self.moves = self.moves.saturating_add(EXTRA_MOVES_GRANT);
                self.events.push(BoardEvent::MovesGranted {
                    amount: EXTRA_MOVES_GRANT,
                    moves: self.moves,
                });
                info!(moves = self.moves, "extra moves granted");
                BoosterOutcome::Applied
            }
            BoosterKind::Shuffle => {
                self.profile.boosters.consume(kind);
                self.profile_dirty = true;
                self.grid.reroll(&mut self.source);
                self.events.push(BoardEvent::Shuffled);
                info!("board shuffled");
                BoosterOutcome::Applied
            }
            BoosterKind::Bomb | BoosterKind::Shield => {
                self.active_booster = Some(kind);
                self.events.push(BoardEvent::BoosterArmed { booster: kind });
                BoosterOutcome::Armed
            }
        }
    }

    fn decline(&mut self, kind: BoosterKind, reason: DeclineReason) -> BoosterOutcome {
        self.events.push(BoardEvent::BoosterDeclined {
            booster: kind,
            reason,
        });
        BoosterOutcome::Declined(reason)
    }

    /// Tap while the bomb is armed. Does not spend a move.
    pub(crate) fn detonate_bomb(&mut self, center: Pos) -> TapOutcome {
        self.active_booster = None;
        if !self.profile.boosters.consume(BoosterKind::Bomb) {
            self.events.push(BoardEvent::BoosterDisarmed {
                booster: BoosterKind::Bomb,
            });
            return TapOutcome::Ignored(IgnoreReason::BoosterUnavailable);
        }
        self.profile_dirty = true;
        self.processing = true;
        if let Some(pos) = self.selection.take() {
            self.events.push(BoardEvent::SelectionCleared { pos });
        }

        info!(x = center.x, y = center.y, "bomb detonated");
        let report = detonate(&mut self.grid, center, &mut self.source);
        TapOutcome::Bombed(self.settle_turn(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::grid::Grid;
    use crate::profile::{Inventory, Profile};
    use crate::resolver::PassKind;
    use crate::rng::ScriptedSource;

    fn playing(inventory: Inventory) -> Session<ScriptedSource> {
        let mut session = Session::with_source(
            EngineConfig::default(),
            ScriptedSource::from_glyphs("HUNDTEUHNTDE"),
        )
        .unwrap()
        .with_profile(Profile {
            boosters: inventory,
            ..Profile::default()
        });
        session.new_game(1);
        session.drain_events();
        session
    }

    #[test]
    fn test_extra_moves() {
        let mut session = playing(Inventory::default());
        assert_eq!(
            session.activate_booster(BoosterKind::ExtraMoves),
            BoosterOutcome::Applied
        );
        assert_eq!(session.moves(), 30);
        assert_eq!(session.inventory().extra_moves, 0);
        assert!(session.take_checkpoint().is_some());
    }

    #[test]
    fn test_empty_inventory_declines_without_change() {
        let mut session = playing(Inventory::empty());
        let grid = session.grid().clone();

        for kind in BoosterKind::ALL {
            assert_eq!(
                session.activate_booster(kind),
                BoosterOutcome::Declined(DeclineReason::NoInventory)
            );
        }
        assert_eq!(session.grid(), &grid);
        assert_eq!(session.moves(), 25);
        assert_eq!(session.active_booster(), None);
        assert_eq!(session.take_checkpoint(), None);
    }

    #[test]
    fn test_shuffle_keeps_ids_and_positions() {
        let mut session = playing(Inventory::default());
        let ids: Vec<_> = session.grid().iter().map(|(p, t)| (p, t.id)).collect();

        assert_eq!(
            session.activate_booster(BoosterKind::Shuffle),
            BoosterOutcome::Applied
        );

        let after: Vec<_> = session.grid().iter().map(|(p, t)| (p, t.id)).collect();
        assert_eq!(ids, after);
        assert_eq!(session.grid().empty_cells(), 0);
        assert_eq!(session.inventory().shuffle, 0);
        assert_eq!(session.drain_events(), vec![BoardEvent::Shuffled]);
    }

    #[test]
    fn test_rearming_disarms() {
        let mut session = playing(Inventory::default());
        assert_eq!(session.activate_booster(BoosterKind::Bomb), BoosterOutcome::Armed);
        assert_eq!(session.active_booster(), Some(BoosterKind::Bomb));
        assert_eq!(
            session.activate_booster(BoosterKind::Bomb),
            BoosterOutcome::Disarmed
        );
        assert_eq!(session.active_booster(), None);
        assert_eq!(session.inventory().bomb, 1);
    }

    #[test]
    fn test_bomb_clears_area_and_keeps_moves() {
        let mut session = playing(Inventory::default());
        session.activate_booster(BoosterKind::Bomb);

        let outcome = session.tap(Pos::new(3, 4));

        let TapOutcome::Bombed(report) = outcome else {
            panic!("expected a detonation");
        };
        let first = &report.passes[0];
        assert_eq!(
            first.kind,
            PassKind::Bomb {
                center: Pos::new(3, 4)
            }
        );
        assert_eq!(first.cleared(), 9);
        for x in 2..=4 {
            for y in 3..=5 {
                assert!(first.positions.contains(&Pos::new(x, y)));
            }
        }
        assert!(report.score_delta >= 180);
        assert_eq!(session.moves(), 25);
        assert_eq!(session.inventory().bomb, 0);
        assert_eq!(session.active_booster(), None);
        assert_eq!(session.grid().empty_cells(), 0);
    }

    #[test]
    fn test_bomb_at_corner_is_clipped() {
        let mut session = playing(Inventory::default());
        session.activate_booster(BoosterKind::Bomb);
        let TapOutcome::Bombed(report) = session.tap(Pos::new(0, 0)) else {
            panic!("expected a detonation");
        };
        assert_eq!(report.passes[0].cleared(), 4);
        assert_eq!(report.passes[0].score, 80);
    }

    #[test]
    fn test_shield_arms_but_taps_select() {
        let mut session = playing(Inventory {
            shield: 1,
            ..Inventory::empty()
        });
        assert_eq!(
            session.activate_booster(BoosterKind::Shield),
            BoosterOutcome::Armed
        );
        assert_eq!(
            session.tap(Pos::new(1, 1)),
            TapOutcome::Selected(Pos::new(1, 1))
        );
        assert_eq!(session.inventory().shield, 1);
    }

    #[test]
    fn test_declined_while_processing_or_in_menu() {
        let mut session = playing(Inventory::default());
        session.processing = true;
        assert_eq!(
            session.activate_booster(BoosterKind::ExtraMoves),
            BoosterOutcome::Declined(DeclineReason::Processing)
        );
        session.processing = false;
        session.quit();
        assert_eq!(
            session.activate_booster(BoosterKind::ExtraMoves),
            BoosterOutcome::Declined(DeclineReason::NotPlaying)
        );
        assert_eq!(session.inventory().extra_moves, 1);
    }

    #[test]
    fn test_bomb_win_credits_reward() {
        let mut session = playing(Inventory::default());
        session.set_score(450);
        session.activate_booster(BoosterKind::Bomb);
        let TapOutcome::Bombed(report) = session.tap(Pos::new(2, 2)) else {
            panic!("expected a detonation");
        };
        assert_eq!(report.status, GameStatus::Won);
        assert_eq!(session.profile().currency, 50);
    }

    #[test]
    fn test_bomb_after_inventory_vanished() {
        let mut session = playing(Inventory::default());
        session.activate_booster(BoosterKind::Bomb);
        session.profile.boosters.bomb = 0;
        let grid: Grid = session.grid().clone();

        assert_eq!(
            session.tap(Pos::new(2, 2)),
            TapOutcome::Ignored(IgnoreReason::BoosterUnavailable)
        );
        assert_eq!(session.grid(), &grid);
        assert_eq!(session.active_booster(), None);
    }
}
