use crate::{
    error::{GenError, GenResult},
    sampler::WeightedTable,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Furthest back an opening date may be drawn, in years.
pub const MAX_OPENING_WINDOW_YEARS: u32 = 200;

/// Every tunable of a generation run.
///
/// Passed by reference into each stage; nothing mutates it once the
/// pipeline starts. Missing fields in a JSON file fall back to
/// [`GeneratorConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub num_clients: usize,
    pub num_transactions: usize,
    /// First day a transaction may occur on (inclusive).
    pub window_start: NaiveDate,
    /// Last day a transaction may occur on (inclusive). Also every
    /// client's `reference_date`.
    pub window_end: NaiveDate,
    /// Opening dates are drawn between `.0` and `.1` years before the
    /// as-of date.
    pub opening_window_years: (u32, u32),
    pub sector_weights: Vec<(String, f64)>,
    pub transaction_type_weights: Vec<(String, f64)>,
    pub transaction_type_value_multiplier: HashMap<String, f64>,
    pub seasonality_by_month: BTreeMap<u32, f64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_clients: 6_000,
            num_transactions: 60_000,
            window_start: ymd(2015, 1, 1),
            window_end: ymd(2023, 12, 31),
            opening_window_years: (10, 1),
            sector_weights: labelled(&[
                ("Commerce", 3.0),
                ("Manufacturing", 4.0),
                ("Services", 2.5),
                ("Telecom", 1.8),
                ("Health", 1.2),
                ("Agro", 0.7),
                ("Other", 0.5),
            ]),
            transaction_type_weights: labelled(&[
                ("PIX", 0.65),
                ("TED", 0.10),
                ("BOLETO", 0.20),
                ("SISTEMCO", 0.05),
            ]),
            transaction_type_value_multiplier: labelled(&[
                ("PIX", 0.8),
                ("TED", 1.2),
                ("BOLETO", 1.5),
                ("SISTEMCO", 1.0),
            ])
            .into_iter()
            .collect(),
            seasonality_by_month: [
                (1, 0.8), (2, 0.7), (3, 0.9), (4, 1.0), (5, 1.1), (6, 1.2),
                (7, 1.1), (8, 1.0), (9, 1.1), (10, 1.3), (11, 1.4), (12, 1.6),
            ]
            .into(),
        }
    }
}

impl GeneratorConfig {
    /// Load a JSON config file. Fields absent from the file keep
    /// their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Config with the default weights and a small population,
    /// for use in tests.
    pub fn default_test() -> Self {
        Self {
            num_clients: 50,
            num_transactions: 500,
            window_start: ymd(2022, 1, 1),
            window_end: ymd(2023, 12, 31),
            ..Self::default()
        }
    }

    /// Reject anything the generators cannot honour.
    /// Runs before any randomness is consumed.
    pub fn validate(&self) -> GenResult<()> {
        if self.num_clients == 0 {
            return Err(GenError::invalid_config("num_clients must be > 0"));
        }
        if self.num_transactions > 0 && self.num_clients < 2 {
            return Err(GenError::invalid_config(format!(
                "num_transactions = {} requires num_clients >= 2, got {}",
                self.num_transactions, self.num_clients
            )));
        }
        if self.num_clients > u32::MAX as usize {
            return Err(GenError::invalid_config("num_clients exceeds the client id range"));
        }
        if self.window_start > self.window_end {
            return Err(GenError::invalid_config(format!(
                "window_start {} is after window_end {}",
                self.window_start, self.window_end
            )));
        }
        let (oldest, newest) = self.opening_window_years;
        if oldest <= newest {
            return Err(GenError::invalid_config(format!(
                "opening_window_years ({oldest}, {newest}): the first bound must be strictly older"
            )));
        }
        if oldest > MAX_OPENING_WINDOW_YEARS {
            return Err(GenError::invalid_config(format!(
                "opening_window_years ({oldest}, {newest}): at most {MAX_OPENING_WINDOW_YEARS} years back"
            )));
        }

        self.sector_table()?;
        self.transaction_type_table()?;

        for (kind, multiplier) in &self.transaction_type_value_multiplier {
            if !multiplier.is_finite() || *multiplier <= 0.0 {
                return Err(GenError::invalid_config(format!(
                    "value multiplier for '{kind}' must be > 0, got {multiplier}"
                )));
            }
        }
        for (month, weight) in &self.seasonality_by_month {
            if !(1..=12).contains(month) {
                return Err(GenError::invalid_config(format!(
                    "seasonality month {month} is outside 1..=12"
                )));
            }
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(GenError::invalid_config(format!(
                    "seasonality weight for month {month} must be > 0, got {weight}"
                )));
            }
        }
        Ok(())
    }

    pub fn sector_table(&self) -> GenResult<WeightedTable> {
        WeightedTable::new("sector_weights", &self.sector_weights)
    }

    pub fn transaction_type_table(&self) -> GenResult<WeightedTable> {
        WeightedTable::new("transaction_type_weights", &self.transaction_type_weights)
    }

    /// Value multiplier for a transaction type; 1.0 when unlisted.
    pub fn type_multiplier(&self, kind: &str) -> f64 {
        self.transaction_type_value_multiplier
            .get(kind)
            .copied()
            .unwrap_or(1.0)
    }

    /// Seasonality weight for a calendar month; 1.0 when unlisted.
    pub fn seasonality(&self, month: u32) -> f64 {
        self.seasonality_by_month.get(&month).copied().unwrap_or(1.0)
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    // Only called with literal calendar dates above.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn labelled(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
    pairs.iter().map(|(l, w)| (l.to_string(), *w)).collect()
}
