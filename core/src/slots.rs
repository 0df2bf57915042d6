//! Slot machine outcomes. Pure: reels and payouts are a stateless
//! transform over the configured symbol table; the ledger wiring for a
//! one-shot round lives in the casino facade.
//!
//! Rounding policy: payouts are integer chips and every fractional
//! multiplier floors, so the remainder stays with the house.

use crate::config::SlotsConfig;
use crate::rng::GameRng;
use crate::types::Chips;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Combo {
    /// Three of a kind.
    Triple,
    /// Two of a symbol carrying a flat pair bonus (sevens, diamonds).
    PairBonus,
    /// Any other two of a kind: half the symbol value.
    Pair,
    Miss,
}

/// What a single spin produced.
#[derive(Debug, Clone, Serialize)]
pub struct SpinResult {
    pub reels: [String; 3],
    pub combo: Combo,
    /// Gross payout in chips; zero on a miss.
    pub payout: Chips,
    pub net_gain: i64,
}

/// Spin three reels: independent weighted draws over the symbol table.
pub fn spin(config: &SlotsConfig, rng: &mut GameRng) -> [usize; 3] {
    let weights: Vec<u32> = config.symbols.iter().map(|s| s.weight).collect();
    let a = rng.pick_weighted(&weights);
    let b = rng.pick_weighted(&weights);
    let c = rng.pick_weighted(&weights);
    [a, b, c]
}

/// Score a spin against the payout table.
pub fn evaluate(config: &SlotsConfig, reels: [usize; 3], stake: Chips) -> (Combo, Chips) {
    let [a, b, c] = reels;
    if a == b && b == c {
        let symbol = &config.symbols[a];
        let bonus = symbol.triple_bonus.unwrap_or(config.default_triple_bonus);
        let multiplier = u64::from(symbol.value) * u64::from(bonus);
        return (Combo::Triple, scale(stake, multiplier, 1));
    }
    if let Some(index) = pair_index(reels) {
        let symbol = &config.symbols[index];
        if let Some(flat) = symbol.pair_bonus {
            return (Combo::PairBonus, scale(stake, u64::from(flat), 1));
        }
        return (Combo::Pair, scale(stake, u64::from(symbol.value), 2));
    }
    (Combo::Miss, 0)
}

/// Spin and score in one step.
pub fn play(config: &SlotsConfig, rng: &mut GameRng, stake: Chips) -> SpinResult {
    let reels = spin(config, rng);
    let (combo, payout) = evaluate(config, reels, stake);
    SpinResult {
        reels: reels.map(|i| config.symbols[i].name.clone()),
        combo,
        payout,
        net_gain: payout as i64 - stake as i64,
    }
}

/// Index of the symbol appearing exactly twice, if any.
fn pair_index([a, b, c]: [usize; 3]) -> Option<usize> {
    if a == b || a == c {
        Some(a)
    } else if b == c {
        Some(b)
    } else {
        None
    }
}

/// stake * numerator / denominator in u128, floored, clamped to Chips.
fn scale(stake: Chips, numerator: u64, denominator: u64) -> Chips {
    let raw = (stake as u128 * numerator as u128) / denominator as u128;
    raw.min(Chips::MAX as u128) as Chips
}
