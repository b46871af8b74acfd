//! Household fee recalculation driven by change events.
//!
//! The listener keeps a disposable read model of per-household fees. It
//! always recomputes from current repository state, so replays, duplicates
//! and stale events converge on the same result.

pub mod listener;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dancu_core::HouseholdId;

pub use listener::FeeRecalculationListener;
pub use store::{FeeStore, InMemoryFeeStore};

/// Default sanitation fee: 6 000 VND per member per month.
pub const DEFAULT_MONTHLY_RATE_PER_MEMBER: u64 = 6_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    pub monthly_rate_per_member: u64,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            monthly_rate_per_member: DEFAULT_MONTHLY_RATE_PER_MEMBER,
        }
    }
}

impl FeePolicy {
    pub fn new(monthly_rate_per_member: u64) -> Self {
        Self {
            monthly_rate_per_member,
        }
    }

    pub fn monthly_amount(&self, member_count: usize) -> u64 {
        self.monthly_rate_per_member.saturating_mul(member_count as u64)
    }

    pub fn annual_amount(&self, member_count: usize) -> u64 {
        self.monthly_amount(member_count).saturating_mul(12)
    }
}

/// Fee read model for one live household. Amounts are VND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdFee {
    pub household_id: HouseholdId,
    pub member_count: usize,
    pub monthly_amount: u64,
    pub annual_amount: u64,
    pub recalculated_at: DateTime<Utc>,
}
