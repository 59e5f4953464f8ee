//! Scoring module - per-pass points, level targets, rewards
//!
//! - A cascade pass scores `cleared * MATCH_POINTS * combo`, with `combo`
//!   counting passes from 1 within a turn.
//! - A bomb pass scores a flat `cleared * BOMB_POINTS`.
//! - Level `n` is won at `n * TARGET_SCORE_PER_LEVEL` points and pays
//!   `n * WIN_REWARD_PER_LEVEL` currency.

use crate::types::{BOMB_POINTS, MATCH_POINTS, TARGET_SCORE_PER_LEVEL, WIN_REWARD_PER_LEVEL};

/// Score for one cascade pass
pub fn match_score(cleared: usize, combo: u32) -> u32 {
    (cleared as u32)
        .saturating_mul(MATCH_POINTS)
        .saturating_mul(combo)
}

/// Score for the area cleared by a bomb (no combo)
pub fn bomb_score(cleared: usize) -> u32 {
    (cleared as u32).saturating_mul(BOMB_POINTS)
}

/// Score needed to win a level
pub fn target_score(level: u32) -> u32 {
    level.saturating_mul(TARGET_SCORE_PER_LEVEL)
}

/// Currency credited for winning a level
pub fn win_reward(level: u32) -> u64 {
    (level as u64).saturating_mul(WIN_REWARD_PER_LEVEL)
}
