//! Client population generation.
//!
//! Each client gets a weighted sector, an opening date, a balance and a
//! revenue figure. Magnitudes scale with the sector weight, and revenue
//! tracks the balance whenever the balance is positive.

use crate::{
    calendar::{self, DateProvider},
    config::GeneratorConfig,
    error::GenResult,
    rng::StageRng,
    sampler::{uniform, WeightedTable},
    types::{positive_cents, round_cents, Amount, ClientId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const BALANCE_RANGE: (f64, f64) = (-50_000.0, 500_000.0);
pub const REVENUE_TO_BALANCE_RANGE: (f64, f64) = (1.5, 10.0);
pub const UNFUNDED_REVENUE_RANGE: (f64, f64) = (10_000.0, 2_000_000.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub sector: String,
    pub opened_on: NaiveDate,
    pub balance: Amount,
    pub revenue: Amount,
    pub reference_date: NaiveDate,
}

pub struct ClientGenerator<'a> {
    config: &'a GeneratorConfig,
    sectors: &'a WeightedTable,
}

impl<'a> ClientGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig, sectors: &'a WeightedTable) -> Self {
        Self { config, sectors }
    }

    /// Generate `num_clients` records with ids `1..=num_clients`.
    /// Opening dates fall between the configured number of years
    /// before `as_of`.
    pub fn generate(
        &self,
        rng: &mut StageRng,
        dates: &mut dyn DateProvider,
        as_of: NaiveDate,
    ) -> GenResult<Vec<ClientRecord>> {
        let (oldest, newest) = self.config.opening_window_years;
        let opened_from = calendar::years_before(as_of, oldest)?;
        let opened_to = calendar::years_before(as_of, newest)?;

        let n = self.config.num_clients;
        let mut clients = Vec::with_capacity(n);

        for i in 0..n {
            let sector = self.sectors.draw(rng).to_string();
            let weight = self.sectors.weight_of(&sector).unwrap_or(1.0);
            let opened_on = dates.date_between(rng, opened_from, opened_to);
            let (balance, revenue) = Self::draw_financials(rng, weight);

            clients.push(ClientRecord {
                id: (i + 1) as ClientId,
                sector,
                opened_on,
                balance,
                revenue,
                reference_date: self.config.window_end,
            });
        }

        log::info!("clients: generated {n} clients opened between {opened_from} and {opened_to}");
        Ok(clients)
    }

    /// Balance scaled by the sector weight; revenue either a multiple
    /// of a positive balance or an independent sector-scaled draw.
    fn draw_financials(rng: &mut StageRng, sector_weight: f64) -> (Amount, Amount) {
        let balance = round_cents(uniform(rng, BALANCE_RANGE.0, BALANCE_RANGE.1) * sector_weight);
        let revenue = if balance > 0.0 {
            let factor = uniform(rng, REVENUE_TO_BALANCE_RANGE.0, REVENUE_TO_BALANCE_RANGE.1);
            (balance * factor).abs()
        } else {
            uniform(rng, UNFUNDED_REVENUE_RANGE.0, UNFUNDED_REVENUE_RANGE.1) * sector_weight
        };
        (balance, positive_cents(revenue))
    }
}
