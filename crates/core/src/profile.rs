//! Player profile: currency, booster inventory, daily reward
//!
//! The profile outlives individual games. Its serialized form uses the field
//! names the hosting app has always stored (`walletBalance`, `boosters`,
//! `lastRewardClaimedDate`); missing fields fall back to the defaults.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{BoosterKind, DeclineReason, DAILY_REWARD};

/// Per-booster counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Inventory {
    pub bomb: u32,
    pub shuffle: u32,
    pub extra_moves: u32,
    pub shield: u32,
}

impl Default for Inventory {
    /// Starting inventory: one of each, no shield
    fn default() -> Self {
        Self {
            bomb: 1,
            shuffle: 1,
            extra_moves: 1,
            shield: 0,
        }
    }
}

impl Inventory {
    /// All counts zero
    pub fn empty() -> Self {
        Self {
            bomb: 0,
            shuffle: 0,
            extra_moves: 0,
            shield: 0,
        }
    }

    pub fn count(&self, kind: BoosterKind) -> u32 {
        match kind {
            BoosterKind::Bomb => self.bomb,
            BoosterKind::Shuffle => self.shuffle,
            BoosterKind::ExtraMoves => self.extra_moves,
            BoosterKind::Shield => self.shield,
        }
    }

    fn slot_mut(&mut self, kind: BoosterKind) -> &mut u32 {
        match kind {
            BoosterKind::Bomb => &mut self.bomb,
            BoosterKind::Shuffle => &mut self.shuffle,
            BoosterKind::ExtraMoves => &mut self.extra_moves,
            BoosterKind::Shield => &mut self.shield,
        }
    }

    pub fn add(&mut self, kind: BoosterKind, amount: u32) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    /// Take one booster. Returns false (unchanged) when the count is zero.
    pub fn consume(&mut self, kind: BoosterKind) -> bool {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Result of a daily reward claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardOutcome {
    Claimed { amount: u64, balance: u64 },
    AlreadyClaimed,
}

/// Result of a shop purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased {
        booster: BoosterKind,
        count: u32,
        balance: u64,
    },
    /// Nothing changed; the reason is always `InsufficientFunds` here
    Declined(DeclineReason),
}

/// Persisted player state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(rename = "walletBalance")]
    pub currency: u64,
    pub boosters: Inventory,
    #[serde(rename = "lastRewardClaimedDate")]
    pub last_reward_date: Option<NaiveDate>,
}

impl Profile {
    pub fn credit(&mut self, amount: u64) -> u64 {
        self.currency = self.currency.saturating_add(amount);
        self.currency
    }

    /// Credit the daily reward unless it was already claimed on `today`.
    pub fn claim_daily_reward(&mut self, today: NaiveDate) -> RewardOutcome {
        if self.last_reward_date == Some(today) {
            return RewardOutcome::AlreadyClaimed;
        }
        self.last_reward_date = Some(today);
        let balance = self.credit(DAILY_REWARD);
        info!(%today, balance, "daily reward claimed");
        RewardOutcome::Claimed {
            amount: DAILY_REWARD,
            balance,
        }
    }

    /// Spend `price` on one booster of `kind`.
    pub fn buy_booster(&mut self, kind: BoosterKind, price: u64) -> PurchaseOutcome {
        if self.currency < price {
            return PurchaseOutcome::Declined(DeclineReason::InsufficientFunds);
        }
        self.currency -= price;
        self.boosters.add(kind, 1);
        info!(booster = kind.as_str(), price, balance = self.currency, "booster purchased");
        PurchaseOutcome::Purchased {
            booster: kind,
            count: self.boosters.count(kind),
            balance: self.currency,
        }
    }
}
