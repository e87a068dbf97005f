//! Weighted categorical sampling and bounded uniform draws.
//!
//! Weights are relative mass: they need not sum to 1, but must be
//! finite and non-negative, and the table as a whole must carry
//! some mass. A zero weight is legal and simply never drawn.

use crate::{
    error::{GenError, GenResult},
    rng::StageRng,
};

/// A validated discrete distribution over string labels.
#[derive(Debug, Clone)]
pub struct WeightedTable {
    labels: Vec<String>,
    weights: Vec<f64>,
    /// Running sum of `weights`; last element is the total mass.
    cumulative: Vec<f64>,
}

impl WeightedTable {
    /// Build a table from `(label, weight)` entries.
    /// `name` only appears in error messages.
    pub fn new(name: &str, entries: &[(String, f64)]) -> GenResult<Self> {
        if entries.is_empty() {
            return Err(GenError::invalid_config(format!("weight table '{name}' is empty")));
        }

        let mut labels = Vec::with_capacity(entries.len());
        let mut weights = Vec::with_capacity(entries.len());
        let mut cumulative = Vec::with_capacity(entries.len());
        let mut total = 0.0;

        for (label, weight) in entries {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(GenError::invalid_config(format!(
                    "weight table '{name}': weight for '{label}' must be finite and >= 0, got {weight}"
                )));
            }
            if labels.contains(label) {
                return Err(GenError::invalid_config(format!(
                    "weight table '{name}': duplicate label '{label}'"
                )));
            }
            total += weight;
            labels.push(label.clone());
            weights.push(*weight);
            cumulative.push(total);
        }

        if total <= 0.0 {
            return Err(GenError::invalid_config(format!(
                "weight table '{name}' has zero total mass"
            )));
        }

        Ok(Self { labels, weights, cumulative })
    }

    fn total(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Draw one label with probability proportional to its weight.
    pub fn draw(&self, rng: &mut StageRng) -> &str {
        let roll = rng.next_f64() * self.total();
        // First bucket whose running sum exceeds the roll. Zero-weight
        // buckets share their predecessor's running sum and are skipped.
        let idx = self.cumulative.partition_point(|&c| c <= roll);
        match self.labels.get(idx) {
            Some(label) => label.as_str(),
            // roll landed exactly on the total through rounding;
            // fall back to the last label that carries mass.
            None => {
                let last = self
                    .weights
                    .iter()
                    .rposition(|&w| w > 0.0)
                    .unwrap_or(self.labels.len() - 1);
                self.labels[last].as_str()
            }
        }
    }

    /// Draw `n` labels in one batch.
    pub fn draw_batch(&self, rng: &mut StageRng, n: usize) -> Vec<String> {
        (0..n).map(|_| self.draw(rng).to_string()).collect()
    }

    pub fn weight_of(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.weights[i])
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Draw a float uniformly in [low, high).
pub fn uniform(rng: &mut StageRng, low: f64, high: f64) -> f64 {
    rng.uniform(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StageSlot};

    fn entries(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(l, w)| (l.to_string(), *w)).collect()
    }

    #[test]
    fn empty_table_rejected() {
        let err = WeightedTable::new("sectors", &[]).unwrap_err();
        assert!(matches!(err, GenError::InvalidConfiguration { .. }));
    }

    #[test]
    fn all_zero_table_rejected() {
        let err = WeightedTable::new("sectors", &entries(&[("A", 0.0), ("B", 0.0)])).unwrap_err();
        assert!(matches!(err, GenError::InvalidConfiguration { .. }));
    }

    #[test]
    fn negative_weight_rejected() {
        let err = WeightedTable::new("sectors", &entries(&[("A", 1.0), ("B", -0.5)])).unwrap_err();
        assert!(matches!(err, GenError::InvalidConfiguration { .. }));
    }

    #[test]
    fn nan_weight_rejected() {
        let err = WeightedTable::new("sectors", &entries(&[("A", f64::NAN)])).unwrap_err();
        assert!(matches!(err, GenError::InvalidConfiguration { .. }));
    }

    #[test]
    fn zero_weight_label_never_drawn() {
        let table = WeightedTable::new("sectors", &entries(&[("A", 1.0), ("B", 0.0)])).unwrap();
        let mut rng = RngBank::new(3).for_stage(StageSlot::Clients);
        for _ in 0..20_000 {
            assert_eq!(table.draw(&mut rng), "A");
        }
    }

    #[test]
    fn leading_zero_weight_label_never_drawn() {
        let table = WeightedTable::new("sectors", &entries(&[("Z", 0.0), ("A", 2.0)])).unwrap();
        let mut rng = RngBank::new(4).for_stage(StageSlot::Clients);
        assert!(table.draw_batch(&mut rng, 5_000).iter().all(|l| l == "A"));
    }

    #[test]
    fn weight_lookup() {
        let table = WeightedTable::new("types", &entries(&[("PIX", 0.65), ("TED", 0.10)])).unwrap();
        assert_eq!(table.weight_of("TED"), Some(0.10));
        assert_eq!(table.weight_of("DOC"), None);
        assert_eq!(table.labels().len(), 2);
    }
}
