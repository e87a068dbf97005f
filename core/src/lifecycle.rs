//! Lifecycle stage classification.
//!
//! An ordered rule cascade over a client's age, revenue and balance.
//! The rules overlap, so evaluation order decides the label: the first
//! matching rule wins and `Stable Growth` is the fallback.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifecycleStage {
    #[serde(rename = "Start")]
    Start,
    #[serde(rename = "Aggressive Expansion")]
    AggressiveExpansion,
    #[serde(rename = "Maturity")]
    Maturity,
    #[serde(rename = "Decline")]
    Decline,
    #[serde(rename = "Stable Growth")]
    StableGrowth,
}

impl LifecycleStage {
    pub const ALL: [LifecycleStage; 5] = [
        Self::Start,
        Self::AggressiveExpansion,
        Self::Maturity,
        Self::Decline,
        Self::StableGrowth,
    ];

    /// The exact label written to the output tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start               => "Start",
            Self::AggressiveExpansion => "Aggressive Expansion",
            Self::Maturity            => "Maturity",
            Self::Decline             => "Decline",
            Self::StableGrowth        => "Stable Growth",
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The inputs one lifecycle decision looks at.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleInputs {
    pub age_years: f64,
    pub revenue: f64,
    pub balance: f64,
}

type Rule = (fn(&LifecycleInputs) -> bool, LifecycleStage);

/// ORDER MATTERS. Comparators are literal: `<=` on the young-age
/// bounds, `>` on the mature one.
const RULES: &[Rule] = &[
    (
        |c: &LifecycleInputs| c.age_years <= 2.0 && c.revenue < 500_000.0,
        LifecycleStage::Start,
    ),
    (
        |c: &LifecycleInputs| c.age_years <= 5.0 && c.revenue > 1_500_000.0 && c.balance < 0.0,
        LifecycleStage::AggressiveExpansion,
    ),
    (
        |c: &LifecycleInputs| c.age_years > 5.0 && c.revenue > 1_000_000.0 && c.balance > 100_000.0,
        LifecycleStage::Maturity,
    ),
    (
        |c: &LifecycleInputs| c.balance < -50_000.0 && c.revenue < 400_000.0,
        LifecycleStage::Decline,
    ),
];

pub fn classify_lifecycle(inputs: &LifecycleInputs) -> LifecycleStage {
    RULES
        .iter()
        .find(|(matches, _)| matches(inputs))
        .map(|(_, stage)| *stage)
        .unwrap_or(LifecycleStage::StableGrowth)
}
