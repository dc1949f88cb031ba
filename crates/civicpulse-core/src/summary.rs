//! Budget summary scalars.
//!
//! A handful of headline numbers the dashboard cards show. Mutation happens
//! through [`BudgetSummary::apply_drift`], which clamps on every step — the
//! invariants `0 <= allocated <= total` and `0 <= efficiency <= 100` hold no
//! matter how many ticks are applied.

use serde::{Deserialize, Serialize};

/// Headline budget figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_budget: f64,
    pub allocated_budget: f64,
    pub transactions: u64,
    /// 0..=100.
    pub efficiency_score: f64,
}

impl BudgetSummary {
    /// The figures every session starts with.
    pub fn seed() -> Self {
        Self {
            total_budget: 24_500_000.0,
            allocated_budget: 18_300_000.0,
            transactions: 1_245,
            efficiency_score: 87.3,
        }
    }

    /// Apply one drift step, clamping both scalars to their ranges.
    pub fn apply_drift(&mut self, budget_delta: f64, efficiency_delta: f64) {
        self.allocated_budget =
            (self.allocated_budget + budget_delta).clamp(0.0, self.total_budget);
        self.efficiency_score = (self.efficiency_score + efficiency_delta).clamp(0.0, 100.0);
    }

    /// Allocated share of the total budget, in percent.
    pub fn utilization_rate(&self) -> f64 {
        if self.total_budget <= 0.0 {
            return 0.0;
        }
        self.allocated_budget / self.total_budget * 100.0
    }

    /// Funds not yet allocated.
    pub fn unallocated(&self) -> f64 {
        self.total_budget - self.allocated_budget
    }
}

/// Format a currency amount with Indian-system digit grouping: the last three
/// digits form one group, every two digits after that another
/// (₹1,83,00,000).
pub fn format_inr(amount: f64) -> String {
    let n = amount.round().max(0.0) as u64;
    let digits = n.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("₹{},{tail}", groups.join(","))
}
