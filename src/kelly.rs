//! Kelly-criterion stake sizing.
//!
//! f* = (b*p - q) / b, where b is the net payout (decimal odds - 1),
//! p the win probability and q = 1 - p. Negative edges clamp to zero:
//! no stake is ever recommended against the edge.

use serde::{Deserialize, Serialize};

/// Sizing for one match under a fixed budget. `stake_amount` is a
/// currency value, rounded to 2 decimals, never above the budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StakeAdvice {
    pub stake_fraction: f64,
    pub stake_amount: f64,
}

/// Kelly fraction clamped to [0, +inf). `b <= 0` is degenerate (odds of
/// 1.0 or a corrupted record) and yields 0 rather than a division fault.
pub fn kelly_fraction(b: f64, p: f64) -> f64 {
    if b <= 0.0 || !b.is_finite() {
        return 0.0;
    }
    let q = 1.0 - p;
    ((b * p - q) / b).max(0.0)
}

/// Stake for one bet: fraction of budget, amount rounded for currency
/// display. Each match is advised independently; nothing here scales a
/// set of stakes down to the budget.
pub fn advise(b: f64, p: f64, budget: f64) -> StakeAdvice {
    let stake_fraction = kelly_fraction(b, p);
    StakeAdvice {
        stake_fraction,
        stake_amount: round2(stake_fraction * budget),
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
