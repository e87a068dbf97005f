//! Revenue concentration and dependency tiers.
//!
//! For every payee we group incoming amounts by payer. The share of the
//! largest single payer in the payee's total receipts is its revenue
//! concentration; hard thresholds on that share give the tier.

use crate::{
    transaction_generator::TransactionRecord,
    types::{Amount, ClientId},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

pub const HIGH_DEPENDENCY_THRESHOLD: f64 = 0.6;
pub const MEDIUM_DEPENDENCY_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DependencyTier {
    #[serde(rename = "High Dependency")]
    High,
    #[serde(rename = "Medium Dependency")]
    Medium,
    #[serde(rename = "Low Dependency")]
    Low,
}

impl DependencyTier {
    pub const ALL: [DependencyTier; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn label(&self) -> &'static str {
        match self {
            Self::High   => "High Dependency",
            Self::Medium => "Medium Dependency",
            Self::Low    => "Low Dependency",
        }
    }

    pub fn from_concentration(concentration: f64) -> Self {
        if concentration > HIGH_DEPENDENCY_THRESHOLD {
            Self::High
        } else if concentration > MEDIUM_DEPENDENCY_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for DependencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What one client received over the whole transaction table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub total_received: Amount,
    pub max_single_payer_received: Amount,
    pub distinct_payers: usize,
}

impl ReceiptSummary {
    /// Largest single payer's share of total receipts; 0 with no receipts.
    pub fn concentration(&self) -> f64 {
        if self.total_received > 0.0 {
            self.max_single_payer_received / self.total_received
        } else {
            0.0
        }
    }

    pub fn tier(&self) -> DependencyTier {
        DependencyTier::from_concentration(self.concentration())
    }
}

/// Group every transaction by (payee, payer) and fold each payee's
/// groups into a [`ReceiptSummary`].
///
/// Totals are summed from the per-payer subtotals in ascending payer
/// order, so the result is independent of hash ordering and the
/// largest subtotal can never exceed the total.
pub fn summarize_receipts(transactions: &[TransactionRecord]) -> BTreeMap<ClientId, ReceiptSummary> {
    let mut by_payee: BTreeMap<ClientId, BTreeMap<ClientId, Amount>> = BTreeMap::new();
    for t in transactions {
        *by_payee
            .entry(t.payee_id)
            .or_default()
            .entry(t.payer_id)
            .or_insert(0.0) += t.amount;
    }

    by_payee
        .into_iter()
        .map(|(payee, payers)| {
            let total_received: Amount = payers.values().sum();
            let max_single_payer_received = payers.values().copied().fold(0.0, f64::max);
            let summary = ReceiptSummary {
                total_received,
                max_single_payer_received,
                distinct_payers: payers.len(),
            };
            (payee, summary)
        })
        .collect()
}
