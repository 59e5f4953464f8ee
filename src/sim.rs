//! Headless simulation runner.
//!
//! Plays a session automatically and writes every engine event as one JSON
//! line. With `--profile DIR` the player profile is loaded from and
//! checkpointed to a [`FileStore`] in that directory, and the daily reward is
//! claimed at start.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::core::{
    load_profile, save_profile, BoosterOutcome, EngineConfig, FileStore, Session, SymbolSource,
};
use crate::engine::{play_turn, AutoplayError};
use crate::types::{BoosterKind, GameStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub engine: EngineConfig,
    pub level: u32,
    /// Maximum number of swaps to play
    pub turns: u32,
    pub profile_dir: Option<PathBuf>,
}

impl SimConfig {
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            engine,
            level: 1,
            turns: 100,
            profile_dir: None,
        }
    }
}

/// Parse `--seed --level --turns --profile --width --height` on top of `base`.
pub fn parse_sim_args(args: &[String], base: EngineConfig) -> Result<SimConfig> {
    let mut config = SimConfig::new(base);
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = || {
            args.get(i + 1)
                .ok_or_else(|| anyhow!("sim: missing value for {}", flag))
        };
        match flag {
            "--seed" => config.engine.seed = parse_num(flag, value()?)?,
            "--level" => config.level = parse_num(flag, value()?)?,
            "--turns" => config.turns = parse_num(flag, value()?)?,
            "--width" => config.engine.width = parse_num(flag, value()?)?,
            "--height" => config.engine.height = parse_num(flag, value()?)?,
            "--profile" => config.profile_dir = Some(PathBuf::from(value()?)),
            other => return Err(anyhow!("sim: unknown argument: {}", other)),
        }
        i += 2;
    }
    config.engine.validate()?;
    Ok(config)
}

fn parse_num<T: std::str::FromStr>(flag: &str, v: &str) -> Result<T> {
    v.parse::<T>()
        .map_err(|_| anyhow!("sim: invalid {} value: {}", flag, v))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimSummary {
    pub turns: u32,
    pub level: u32,
    pub status: GameStatus,
    pub score: u32,
    pub currency: u64,
}

/// Run the simulation, writing JSON event lines to `out`.
///
/// `today` drives the daily reward when a profile directory is configured.
pub fn run_sim<W: Write>(config: &SimConfig, today: NaiveDate, out: &mut W) -> Result<SimSummary> {
    let mut store = match &config.profile_dir {
        Some(dir) => Some(FileStore::open(dir)?),
        None => None,
    };

    let mut session = Session::new(config.engine.clone())?;
    if let Some(store) = &store {
        if let Some(profile) = load_profile(store)? {
            session = session.with_profile(profile);
        }
        session.claim_daily_reward(today);
    }

    let mut level = config.level.max(1);
    session.new_game(level);
    let mut turns = 0;

    while turns < config.turns {
        match play_turn(&mut session) {
            Ok(report) => {
                turns += 1;
                if report.status == GameStatus::Won {
                    flush(&mut session, store.as_mut(), out)?;
                    level += 1;
                    session.new_game(level);
                } else if report.status.is_finished() {
                    break;
                }
            }
            Err(AutoplayError::NoValidSwap) => {
                if !unstick(&mut session) {
                    warn!(turns, "no valid swap and no shuffle left");
                    break;
                }
            }
            Err(e) => return Err(anyhow!("sim: {} ({})", e, e.code())),
        }
        flush(&mut session, store.as_mut(), out)?;
    }
    flush(&mut session, store.as_mut(), out)?;

    let summary = SimSummary {
        turns,
        level: session.level(),
        status: session.status(),
        score: session.score(),
        currency: session.profile().currency,
    };
    info!(?summary, "simulation finished");
    Ok(summary)
}

/// Shuffle a dead board, if a shuffle is left.
fn unstick<S: SymbolSource>(session: &mut Session<S>) -> bool {
    session.activate_booster(BoosterKind::Shuffle) == BoosterOutcome::Applied
}

fn flush<S: SymbolSource, W: Write>(
    session: &mut Session<S>,
    store: Option<&mut FileStore>,
    out: &mut W,
) -> Result<()> {
    for event in session.drain_events() {
        serde_json::to_writer(&mut *out, &event)?;
        out.write_all(b"\n")?;
    }
    if let (Some(store), Some(profile)) = (store, session.take_checkpoint()) {
        save_profile(store, &profile)?;
    }
    Ok(())
}
