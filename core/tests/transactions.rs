//! Transaction generation tests.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use synthledger_core::{config::GeneratorConfig, error::GenError, pipeline::Pipeline};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

#[test]
fn generates_requested_transaction_count() {
    let mut pipeline = Pipeline::build_test(42);
    let dataset = pipeline.run(as_of()).unwrap();
    assert_eq!(dataset.transactions.len(), 500);
}

#[test]
fn payer_and_payee_are_distinct_existing_clients() {
    let mut pipeline = Pipeline::build_test(8);
    let dataset = pipeline.run(as_of()).unwrap();

    let n = dataset.clients.len() as u32;
    for t in &dataset.transactions {
        assert_ne!(t.payer_id, t.payee_id, "self-transfer generated: {t:?}");
        assert!((1..=n).contains(&t.payer_id), "unknown payer {}", t.payer_id);
        assert!((1..=n).contains(&t.payee_id), "unknown payee {}", t.payee_id);
    }
}

#[test]
fn two_clients_are_enough() {
    let mut config = GeneratorConfig::default_test();
    config.num_clients = 2;
    config.num_transactions = 1_000;

    let mut pipeline = Pipeline::new(config, 17);
    let dataset = pipeline.run(as_of()).unwrap();

    assert_eq!(dataset.transactions.len(), 1_000);
    assert!(dataset.transactions.iter().all(|t| t.payer_id != t.payee_id));
}

#[test]
fn amounts_are_positive_and_bounded_by_the_factor_product() {
    let config = GeneratorConfig::default_test();
    // 10_000 × heaviest sector × largest multiplier × peak season
    let ceiling = 10_000.0 * 4.0 * 1.5 * 1.6;

    let mut pipeline = Pipeline::new(config, 31);
    let dataset = pipeline.run(as_of()).unwrap();

    for t in &dataset.transactions {
        assert!(t.amount > 0.0, "amount must be > 0: {t:?}");
        assert!(t.amount <= ceiling, "amount {} above ceiling {ceiling}", t.amount);
        assert_eq!((t.amount * 100.0).round() / 100.0, t.amount, "amount not rounded to cents");
    }
}

#[test]
fn tiny_sector_weight_keeps_amounts_and_revenue_positive() {
    let mut config = GeneratorConfig::default_test();
    config.sector_weights = vec![("Tiny".into(), 1e-9)];

    let mut pipeline = Pipeline::new(config, 12);
    let dataset = pipeline.run(as_of()).unwrap();

    for p in &dataset.clients {
        assert!(p.client.revenue >= 0.01, "revenue rounded away: {:?}", p.client);
    }
    for t in &dataset.transactions {
        assert!(t.amount >= 0.01, "amount rounded away: {t:?}");
    }
}

#[test]
fn dates_fall_inside_the_window() {
    let config = GeneratorConfig::default_test();
    let (start, end) = (config.window_start, config.window_end);

    let mut pipeline = Pipeline::new(config, 64);
    let dataset = pipeline.run(as_of()).unwrap();

    for t in &dataset.transactions {
        assert!(t.occurred_on >= start && t.occurred_on <= end,
            "{} outside [{start}, {end}]", t.occurred_on);
    }
}

#[test]
fn amount_is_the_product_of_all_factors() {
    // One sector, one type, flat seasonality except December.
    let mut config = GeneratorConfig::default_test();
    config.num_transactions = 5_000;
    config.sector_weights = vec![("Only".into(), 2.0)];
    config.transaction_type_weights = vec![("WIRE".into(), 1.0)];
    config.transaction_type_value_multiplier = [("WIRE".to_string(), 3.0)].into();
    config.seasonality_by_month = (1..=11).map(|m| (m, 1.0)).chain([(12, 2.0)]).collect();

    let mut pipeline = Pipeline::new(config, 2);
    let dataset = pipeline.run(as_of()).unwrap();

    for t in &dataset.transactions {
        let season = if t.occurred_on.month() == 12 { 2.0 } else { 1.0 };
        let factor = 2.0 * 3.0 * season;
        let base = t.amount / factor;
        assert!(base >= 50.0 - 0.01 && base <= 10_000.0 + 0.01,
            "implied base {base} outside [50, 10000] for {t:?}");
    }
}

#[test]
fn unlisted_type_falls_back_to_unit_multiplier() {
    let mut config = GeneratorConfig::default_test();
    config.sector_weights = vec![("Only".into(), 1.0)];
    config.transaction_type_weights = vec![("DOC".into(), 1.0)];
    config.seasonality_by_month.clear();

    let mut pipeline = Pipeline::new(config, 4);
    let dataset = pipeline.run(as_of()).unwrap();

    for t in &dataset.transactions {
        assert_eq!(t.kind, "DOC");
        assert!(t.amount >= 50.0 && t.amount <= 10_000.0, "{t:?}");
    }
}

#[test]
fn type_frequencies_follow_popularity_weights() {
    let mut config = GeneratorConfig::default_test();
    config.num_transactions = 100_000;
    let expected: HashMap<String, f64> = config.transaction_type_weights.iter().cloned().collect();

    let mut pipeline = Pipeline::new(config, 2024);
    let dataset = pipeline.run(as_of()).unwrap();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in &dataset.transactions {
        *counts.entry(t.kind.as_str()).or_default() += 1;
    }

    let total: f64 = expected.values().sum();
    for (kind, weight) in &expected {
        let observed = counts.get(kind.as_str()).copied().unwrap_or(0) as f64 / 100_000.0;
        let target = weight / total;
        assert!((observed - target).abs() < 0.02,
            "{kind}: observed share {observed:.4}, expected {target:.4} ± 0.02");
    }
}

#[test]
fn zero_transactions_with_one_client_is_fine() {
    let mut config = GeneratorConfig::default_test();
    config.num_clients = 1;
    config.num_transactions = 0;

    let mut pipeline = Pipeline::new(config, 1);
    let dataset = pipeline.run(as_of()).unwrap();
    assert_eq!(dataset.clients.len(), 1);
    assert!(dataset.transactions.is_empty());
}

#[test]
fn one_client_with_transactions_is_rejected_up_front() {
    let mut config = GeneratorConfig::default_test();
    config.num_clients = 1;

    let mut pipeline = Pipeline::new(config, 1);
    let err = pipeline.run(as_of()).unwrap_err();
    assert!(matches!(err, GenError::InvalidConfiguration { .. }), "got {err}");
}
