//! The generation pipeline.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Config validation  (fails before any randomness is consumed)
//!   2. Client generation  (StageSlot::Clients stream)
//!   3. Transaction generation (StageSlot::Transactions stream)
//!   4. Profile derivation (pure, no randomness)
//!
//! RULES:
//!   - Each stage reads only the finished output of earlier stages.
//!   - All randomness flows through the RngBank.
//!   - Nothing is written to disk here; see output.rs.

use crate::{
    calendar::{DateProvider, UniformDates},
    client_generator::ClientGenerator,
    config::GeneratorConfig,
    dependency::DependencyTier,
    error::GenResult,
    lifecycle::LifecycleStage,
    profile::{derive_profiles, ClientProfile},
    rng::{RngBank, StageSlot},
    transaction_generator::{TransactionGenerator, TransactionRecord},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Both finished tables of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub clients: Vec<ClientProfile>,
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub clients: usize,
    pub transactions: usize,
    pub transaction_volume: f64,
    pub clients_without_receipts: usize,
    pub mean_distinct_payers: f64,
    pub lifecycle_counts: BTreeMap<LifecycleStage, usize>,
    pub dependency_counts: BTreeMap<DependencyTier, usize>,
}

impl Dataset {
    pub fn summary(&self) -> RunSummary {
        let mut lifecycle_counts: BTreeMap<_, _> =
            LifecycleStage::ALL.iter().map(|s| (*s, 0usize)).collect();
        let mut dependency_counts: BTreeMap<_, _> =
            DependencyTier::ALL.iter().map(|t| (*t, 0usize)).collect();
        let mut clients_without_receipts = 0;
        let mut payer_links = 0;

        for p in &self.clients {
            *lifecycle_counts.entry(p.lifecycle_stage).or_insert(0) += 1;
            *dependency_counts.entry(p.dependency_tier).or_insert(0) += 1;
            if p.total_received == 0.0 {
                clients_without_receipts += 1;
            }
            payer_links += p.distinct_payers;
        }

        let mean_distinct_payers = if self.clients.is_empty() {
            0.0
        } else {
            payer_links as f64 / self.clients.len() as f64
        };

        RunSummary {
            clients: self.clients.len(),
            transactions: self.transactions.len(),
            transaction_volume: self.transactions.iter().map(|t| t.amount).sum(),
            clients_without_receipts,
            mean_distinct_payers,
            lifecycle_counts,
            dependency_counts,
        }
    }
}

pub struct Pipeline {
    config: GeneratorConfig,
    rng_bank: RngBank,
    dates: Box<dyn DateProvider>,
}

impl Pipeline {
    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng_bank: RngBank::new(seed),
            dates: Box::new(UniformDates),
        }
    }

    /// Pipeline over the small test config.
    pub fn build_test(seed: u64) -> Self {
        Self::new(GeneratorConfig::default_test(), seed)
    }

    /// Replace the opening-date provider.
    pub fn with_date_provider(mut self, dates: Box<dyn DateProvider>) -> Self {
        self.dates = dates;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run every stage. `as_of` is "today": opening dates are drawn
    /// relative to it and client ages are measured up to it.
    pub fn run(&mut self, as_of: NaiveDate) -> GenResult<Dataset> {
        self.config.validate()?;
        log::info!(
            "pipeline: seed={} clients={} transactions={} as_of={as_of}",
            self.rng_bank.master_seed(),
            self.config.num_clients,
            self.config.num_transactions
        );

        let sectors = self.config.sector_table()?;
        let types = self.config.transaction_type_table()?;

        let mut rng = self.rng_bank.for_stage(StageSlot::Clients);
        let clients = ClientGenerator::new(&self.config, &sectors)
            .generate(&mut rng, self.dates.as_mut(), as_of)?;

        let mut rng = self.rng_bank.for_stage(StageSlot::Transactions);
        let transactions =
            TransactionGenerator::new(&self.config, &sectors, &types).generate(&clients, &mut rng)?;

        log::info!("pipeline: classifying {} clients", clients.len());
        let profiles = derive_profiles(&clients, &transactions, as_of);

        Ok(Dataset { clients: profiles, transactions })
    }
}
