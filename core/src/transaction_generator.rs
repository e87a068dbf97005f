//! Transaction population generation.
//!
//! Every transaction links two distinct existing clients. Its amount
//! multiplies a uniform base value by the payer's sector weight, the
//! type's value multiplier and the month's seasonality weight.

use crate::{
    calendar,
    client_generator::ClientRecord,
    config::GeneratorConfig,
    error::{GenError, GenResult},
    rng::StageRng,
    sampler::{uniform, WeightedTable},
    types::{positive_cents, Amount, ClientId},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const BASE_AMOUNT_RANGE: (f64, f64) = (50.0, 10_000.0);

/// Upper bound on payee redraws for a single transaction. With two or
/// more clients the expected number of redraws is below one.
pub const MAX_PAYEE_REDRAWS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub payer_id: ClientId,
    pub payee_id: ClientId,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: String,
    pub occurred_on: NaiveDate,
}

pub struct TransactionGenerator<'a> {
    config: &'a GeneratorConfig,
    sectors: &'a WeightedTable,
    types: &'a WeightedTable,
}

impl<'a> TransactionGenerator<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        sectors: &'a WeightedTable,
        types: &'a WeightedTable,
    ) -> Self {
        Self { config, sectors, types }
    }

    pub fn generate(
        &self,
        clients: &[ClientRecord],
        rng: &mut StageRng,
    ) -> GenResult<Vec<TransactionRecord>> {
        let n = self.config.num_transactions;
        if n == 0 {
            log::info!("transactions: none requested");
            return Ok(Vec::new());
        }

        let ids: Vec<ClientId> = clients.iter().map(|c| c.id).collect();
        let sector_by_id: HashMap<ClientId, &str> =
            clients.iter().map(|c| (c.id, c.sector.as_str())).collect();
        if sector_by_id.len() < 2 {
            return Err(GenError::InsufficientEntities { available: sector_by_id.len() });
        }

        let kinds = self.types.draw_batch(rng, n);
        let mut transactions = Vec::with_capacity(n);
        let mut volume = 0.0;

        for kind in kinds {
            let (payer_id, payee_id) = draw_counterparties(&ids, rng)?;

            let sector_weight = sector_by_id
                .get(&payer_id)
                .and_then(|sector| self.sectors.weight_of(sector))
                .unwrap_or(1.0);
            let type_multiplier = self.config.type_multiplier(&kind);

            let occurred_on =
                calendar::uniform_date(rng, self.config.window_start, self.config.window_end);
            let season_weight = self.config.seasonality(occurred_on.month());

            let base = uniform(rng, BASE_AMOUNT_RANGE.0, BASE_AMOUNT_RANGE.1);
            let amount = positive_cents(base * sector_weight * type_multiplier * season_weight);
            volume += amount;

            transactions.push(TransactionRecord {
                payer_id,
                payee_id,
                amount,
                kind,
                occurred_on,
            });
        }

        log::info!(
            "transactions: generated {n} transactions between {} and {}",
            self.config.window_start,
            self.config.window_end
        );
        log::debug!("transactions: total volume {volume:.2}");
        Ok(transactions)
    }
}

/// Uniform payer, then uniform payee redrawn until it differs.
fn draw_counterparties(ids: &[ClientId], rng: &mut StageRng) -> GenResult<(ClientId, ClientId)> {
    let pick = |rng: &mut StageRng| ids[rng.next_u64_below(ids.len() as u64) as usize];

    let payer = pick(rng);
    for _ in 0..MAX_PAYEE_REDRAWS {
        let payee = pick(rng);
        if payee != payer {
            return Ok((payer, payee));
        }
    }
    Err(GenError::InsufficientEntities { available: ids.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StageSlot};

    #[test]
    fn two_clients_always_pair_up() {
        let mut rng = RngBank::new(21).for_stage(StageSlot::Transactions);
        for _ in 0..1_000 {
            let (payer, payee) = draw_counterparties(&[1, 2], &mut rng).unwrap();
            assert_ne!(payer, payee);
        }
    }

    #[test]
    fn duplicated_single_id_hits_the_cap() {
        let mut rng = RngBank::new(21).for_stage(StageSlot::Transactions);
        let err = draw_counterparties(&[7, 7], &mut rng).unwrap_err();
        assert!(matches!(err, GenError::InsufficientEntities { available: 2 }));
    }

    #[test]
    fn single_client_is_insufficient() {
        let config = GeneratorConfig::default_test();
        let sectors = config.sector_table().unwrap();
        let types = config.transaction_type_table().unwrap();
        let lone = ClientRecord {
            id: 1,
            sector: "Commerce".into(),
            opened_on: config.window_start,
            balance: 0.0,
            revenue: 10_000.0,
            reference_date: config.window_end,
        };
        let mut rng = RngBank::new(1).for_stage(StageSlot::Transactions);
        let err = TransactionGenerator::new(&config, &sectors, &types)
            .generate(&[lone], &mut rng)
            .unwrap_err();
        assert!(matches!(err, GenError::InsufficientEntities { available: 1 }));
    }
}
