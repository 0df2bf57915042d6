//! Deterministic random number generation.
//!
//! RULE: nothing in the crate calls a platform RNG directly. Every
//! shuffle and spin flows through a GameRng, seeded from entropy in
//! production and from a fixed seed in tests, so a seeded casino replays
//! the exact same rounds.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct GameRng {
    inner: Pcg64Mcg,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { inner: Pcg64Mcg::from_entropy() }
    }

    /// Derive an independent stream for a stable consumer slot. Slot
    /// indices must never be reassigned once handed out.
    pub fn derive(seed: u64, slot: u64) -> Self {
        Self::seeded(seed ^ slot.wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli trial: true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Fisher-Yates shuffle, in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_u64_below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }

    /// Pick an index with probability proportional to its weight.
    pub fn pick_weighted(&mut self, weights: &[u32]) -> usize {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        assert!(total > 0, "weights must not all be zero");
        let mut roll = self.next_u64_below(total);
        for (index, &weight) in weights.iter().enumerate() {
            if roll < u64::from(weight) {
                return index;
            }
            roll -= u64::from(weight);
        }
        weights.len() - 1
    }
}
