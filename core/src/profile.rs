//! Column augmentation of the client table.
//!
//! Joins the lifecycle and dependency derivations onto each client.
//! Pure: the same tables and as-of date always give the same profiles.

use crate::{
    calendar,
    client_generator::ClientRecord,
    dependency::{summarize_receipts, DependencyTier},
    lifecycle::{classify_lifecycle, LifecycleInputs, LifecycleStage},
    transaction_generator::TransactionRecord,
    types::Amount,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(flatten)]
    pub client: ClientRecord,
    pub age_years: f64,
    pub lifecycle_stage: LifecycleStage,
    pub total_received: Amount,
    pub max_single_payer_received: Amount,
    pub revenue_concentration: f64,
    pub dependency_tier: DependencyTier,
    /// Not part of the exported table.
    #[serde(skip)]
    pub distinct_payers: usize,
}

/// Derive every client's profile from the finished tables.
/// Clients with no incoming transactions get zero receipts and
/// land in `Low Dependency`.
pub fn derive_profiles(
    clients: &[ClientRecord],
    transactions: &[TransactionRecord],
    as_of: NaiveDate,
) -> Vec<ClientProfile> {
    let receipts = summarize_receipts(transactions);

    clients
        .iter()
        .map(|client| {
            let age_years = calendar::age_in_years(client.opened_on, as_of);
            let lifecycle_stage = classify_lifecycle(&LifecycleInputs {
                age_years,
                revenue: client.revenue,
                balance: client.balance,
            });
            let summary = receipts.get(&client.id).copied().unwrap_or_default();

            ClientProfile {
                client: client.clone(),
                age_years,
                lifecycle_stage,
                total_received: summary.total_received,
                max_single_payer_received: summary.max_single_payer_received,
                revenue_concentration: summary.concentration(),
                dependency_tier: summary.tier(),
                distinct_payers: summary.distinct_payers,
            }
        })
        .collect()
}
