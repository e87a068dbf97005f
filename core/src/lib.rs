//! Synthetic client/transaction dataset generation.
//!
//! A seeded, one-shot batch pipeline: generate a client table, generate
//! transactions between those clients, then derive lifecycle stages and
//! revenue-concentration tiers from the finished tables.

pub mod calendar;
pub mod client_generator;
pub mod config;
pub mod dependency;
pub mod error;
pub mod lifecycle;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod rng;
pub mod sampler;
pub mod transaction_generator;
pub mod types;
