use thiserror::Error;
use tracing::debug;

use match3_core::{IgnoreReason, Session, SymbolSource, TapOutcome, TurnReport};
use match3_types::{BoosterKind, GameStatus};

use crate::hint::first_valid_swap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AutoplayError {
    #[error("game is not playable (status {0:?})")]
    NotPlayable(GameStatus),
    #[error("session is still processing a turn")]
    Busy,
    #[error("no swap on the board produces a match")]
    NoValidSwap,
    #[error("session rejected the swap")]
    Rejected,
}

impl AutoplayError {
    pub fn code(self) -> &'static str {
        match self {
            AutoplayError::NotPlayable(_) => "not_playable",
            AutoplayError::Busy => "busy",
            AutoplayError::NoValidSwap => "no_valid_swap",
            AutoplayError::Rejected => "rejected",
        }
    }
}

/// Play the first valid swap on the board as two taps.
///
/// Any pending selection is cleared first. An armed bomb would turn the
/// first tap into a detonation, so it is reported as `Busy`.
pub fn play_turn<S: SymbolSource>(session: &mut Session<S>) -> Result<TurnReport, AutoplayError> {
    if session.status() != GameStatus::Playing {
        return Err(AutoplayError::NotPlayable(session.status()));
    }
    if session.is_processing() || session.active_booster() == Some(BoosterKind::Bomb) {
        return Err(AutoplayError::Busy);
    }

    let (a, b) = first_valid_swap(session.grid()).ok_or(AutoplayError::NoValidSwap)?;
    debug!(?a, ?b, "autoplay swap");

    if let Some(selected) = session.selection() {
        session.tap(selected);
    }
    session.tap(a);
    match session.tap(b) {
        TapOutcome::Resolved(report) => Ok(report),
        TapOutcome::Ignored(IgnoreReason::Processing) => Err(AutoplayError::Busy),
        _ => Err(AutoplayError::Rejected),
    }
}
