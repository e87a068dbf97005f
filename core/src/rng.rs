//! Seeded random streams for the generation stages.
//!
//! A run has one master seed. Client and transaction generation each
//! draw from a separate `Pcg64Mcg` stream derived from it, so the
//! client table depends only on the seed and the client settings, and
//! asking for more transactions leaves it untouched. No other source
//! of randomness is used anywhere in the crate.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Odd 64-bit constant that spreads consecutive slot numbers apart.
const SLOT_SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

/// The random stream owned by one pipeline stage.
pub struct StageRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StageRng {
    /// Stream for `slot` under `master_seed`.
    pub fn new(master_seed: u64, slot: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(master_seed ^ slot.wrapping_mul(SLOT_SPREAD)),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Unbiased index in `[0, n)`. `n` must be positive.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        self.inner.gen_range(0..n)
    }

    /// Float in `[low, high)`; `low` when the range is empty.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

/// Hands out stage RNGs for a single run.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_stage(&self, slot: StageSlot) -> StageRng {
        StageRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Slot numbers feed the stream derivation, so existing values are
/// fixed. New stages take the next free number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StageSlot {
    Clients = 0,
    Transactions = 1,
}

impl StageSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Transactions => "transactions",
        }
    }
}
