//! Reward-tier progression over a validated, strictly increasing tier table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoyaltyError {
    #[error("invalid tier table: no tiers configured")]
    EmptyTable,
    #[error("invalid tier table: tier {index} threshold {threshold} does not exceed {previous}")]
    NotIncreasing {
        index: usize,
        previous: u64,
        threshold: u64,
    },
    #[error("invalid tier table: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTier {
    pub id: String,
    pub title: String,
    pub threshold: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl RewardTier {
    pub fn new(id: &str, title: &str, threshold: u64, description: &str, icon: &str) -> Self {
        RewardTier {
            id: id.to_string(),
            title: title.to_string(),
            threshold,
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable(Vec<RewardTier>);

impl TierTable {
    pub fn new(tiers: Vec<RewardTier>) -> Result<Self, LoyaltyError> {
        if tiers.is_empty() {
            return Err(LoyaltyError::EmptyTable);
        }
        for (index, pair) in tiers.windows(2).enumerate() {
            if pair[1].threshold <= pair[0].threshold {
                return Err(LoyaltyError::NotIncreasing {
                    index: index + 1,
                    previous: pair[0].threshold,
                    threshold: pair[1].threshold,
                });
            }
        }
        Ok(TierTable(tiers))
    }

    pub fn from_json(json: &str) -> Result<Self, LoyaltyError> {
        let tiers: Vec<RewardTier> = serde_json::from_str(json)?;
        TierTable::new(tiers)
    }

    pub fn standard() -> Self {
        TierTable(vec![
            RewardTier::new("discount", "10% off", 200, "10% off your next ride", "percent"),
            RewardTier::new("free-ride", "Free ride", 1000, "One free ride up to 30 km", "car"),
            RewardTier::new("vip", "VIP", 2000, "Priority booking and support", "crown"),
        ])
    }

    pub fn tiers(&self) -> &[RewardTier] {
        &self.0
    }
}

pub fn is_unlocked(balance: u64, tier: &RewardTier) -> bool {
    balance >= tier.threshold
}

pub fn unlocked_flags(balance: u64, table: &TierTable) -> Vec<bool> {
    table.tiers().iter().map(|t| is_unlocked(balance, t)).collect()
}

/// First tier the balance has not reached yet.
pub fn next_tier(balance: u64, table: &TierTable) -> Option<&RewardTier> {
    table.tiers().iter().find(|t| t.threshold > balance)
}

/// Percentage of the way from the last reached tier to the next one, in
/// `[0, 100]`. A balance at or past the final threshold is 100.
pub fn progress(balance: u64, table: &TierTable) -> f64 {
    let tiers = table.tiers();
    let Some(next) = tiers.iter().position(|t| t.threshold > balance) else {
        return 100.0;
    };
    let base = match next {
        0 => 0,
        i => tiers[i - 1].threshold,
    };
    let span = tiers[next].threshold - base;
    let done = balance.saturating_sub(base);
    (done as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoyaltyStatus {
    pub balance: u64,
    pub progress: f64,
    pub unlocked: Vec<bool>,
    pub next_tier: Option<String>,
    pub points_to_next: u64,
}

impl LoyaltyStatus {
    pub fn compute(balance: u64, table: &TierTable) -> Self {
        let next = next_tier(balance, table);
        LoyaltyStatus {
            balance,
            progress: progress(balance, table),
            unlocked: unlocked_flags(balance, table),
            next_tier: next.map(|t| t.id.clone()),
            points_to_next: next.map_or(0, |t| t.threshold - balance),
        }
    }
}
