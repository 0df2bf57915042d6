//! Runtime configuration for the casino core.
//!
//! Defaults carry the house rules the tables were tuned for; a JSON file
//! can override any field at startup. `validate` reports configuration
//! problems instead of panicking so a runner can print them and refuse
//! to start.

use crate::error::CasinoResult;
use crate::types::Chips;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CasinoConfig {
    pub starting_balance: Chips,
    pub daily_bonus: Chips,
    pub min_stake: Chips,
    pub max_stake: Chips,
    /// Cooldown seconds per action kind. Kinds absent here are never
    /// rate limited.
    pub cooldown_secs: HashMap<String, u64>,
    pub blackjack: BlackjackConfig,
    pub slots: SlotsConfig,
    pub roulette: RouletteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackjackConfig {
    /// Gross payout ratio for a natural: 2.5 pays 3:2 on top of the
    /// returned stake. Fractions floor when applied to a stake.
    pub natural_payout: f64,
    pub dealer_hits_soft_17: bool,
    /// Age in seconds after which an unresolved session is forfeited by
    /// the expiry sweep.
    pub max_session_secs: u64,
}

/// One reel symbol: payout value and relative draw weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelSymbol {
    pub name: String,
    pub value: u32,
    pub weight: u32,
    /// Triple bonus override; triples of other symbols use the default.
    #[serde(default)]
    pub triple_bonus: Option<u32>,
    /// Flat stake multiplier when exactly two of this symbol land.
    #[serde(default)]
    pub pair_bonus: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotsConfig {
    pub symbols: Vec<ReelSymbol>,
    pub default_triple_bonus: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteConfig {
    pub straight_payout: u32,
    pub even_money_payout: u32,
    pub dozen_payout: u32,
    pub column_payout: u32,
}

impl Default for CasinoConfig {
    fn default() -> Self {
        Self {
            starting_balance: 10_000,
            daily_bonus: 1_000,
            min_stake: 10,
            max_stake: 10_000,
            cooldown_secs: [
                ("game".to_string(), 3),
                ("balance".to_string(), 5),
                ("daily".to_string(), 86_400),
                ("leaderboard".to_string(), 10),
                ("stats".to_string(), 5),
            ]
            .into(),
            blackjack: BlackjackConfig::default(),
            slots: SlotsConfig::default(),
            roulette: RouletteConfig::default(),
        }
    }
}

impl Default for BlackjackConfig {
    fn default() -> Self {
        Self {
            natural_payout: 2.5,
            dealer_hits_soft_17: true,
            max_session_secs: 300,
        }
    }
}

impl Default for SlotsConfig {
    fn default() -> Self {
        let symbol = |name: &str, value: u32, weight: u32| ReelSymbol {
            name: name.to_string(),
            value,
            weight,
            triple_bonus: None,
            pair_bonus: None,
        };
        let mut seven = symbol("seven", 25, 1);
        seven.triple_bonus = Some(10);
        seven.pair_bonus = Some(10);
        let mut diamond = symbol("diamond", 15, 2);
        diamond.triple_bonus = Some(8);
        diamond.pair_bonus = Some(8);
        let mut bell = symbol("bell", 8, 7);
        bell.triple_bonus = Some(6);
        Self {
            symbols: vec![
                symbol("cherry", 2, 30),
                symbol("lemon", 3, 25),
                symbol("orange", 4, 20),
                symbol("grape", 5, 15),
                bell,
                diamond,
                seven,
            ],
            default_triple_bonus: 4,
        }
    }
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            straight_payout: 35,
            even_money_payout: 1,
            dozen_payout: 2,
            column_payout: 2,
        }
    }
}

impl CasinoConfig {
    /// Load a config document from `path`. Missing fields fall back to
    /// the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> CasinoResult<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Collect configuration problems. An empty list means the config is
    /// usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.min_stake == 0 {
            issues.push("min_stake must be positive".to_string());
        }
        if self.min_stake >= self.max_stake {
            issues.push("min_stake must be less than max_stake".to_string());
        }
        if self.slots.symbols.is_empty() {
            issues.push("slots.symbols must not be empty".to_string());
        }
        if self.slots.symbols.iter().all(|s| s.weight == 0) {
            issues.push("slots symbols must have a positive total weight".to_string());
        }
        if self.blackjack.natural_payout < 1.0 {
            issues.push("blackjack.natural_payout must return at least the stake".to_string());
        }
        issues
    }
}
