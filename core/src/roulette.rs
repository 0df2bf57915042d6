//! European roulette: the wheel, the bet grammar, and payouts.
//!
//! Single-zero wheel, 0 through 36. Zero loses every outside bet; only a
//! straight bet on 0 collects.

use crate::config::RouletteConfig;
use crate::rng::GameRng;
use crate::types::Chips;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const WHEEL_SLOTS: u8 = 37;

const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Green,
    Red,
    Black,
}

pub fn color_of(number: u8) -> Color {
    if number == 0 {
        Color::Green
    } else if RED_NUMBERS.contains(&number) {
        Color::Red
    } else {
        Color::Black
    }
}

/// A single roulette wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouletteBet {
    Straight(u8),
    Red,
    Black,
    Even,
    Odd,
    High,
    Low,
    /// 1, 2 or 3: the dozens 1-12, 13-24, 25-36.
    Dozen(u8),
    /// 1, 2 or 3, counted from the number 1 column.
    Column(u8),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized roulette bet '{0}'")]
pub struct ParseBetError(pub String);

impl RouletteBet {
    /// Whether `number` wins this bet.
    pub fn wins(self, number: u8) -> bool {
        match self {
            RouletteBet::Straight(n) => n == number,
            _ if number == 0 => false,
            RouletteBet::Red => color_of(number) == Color::Red,
            RouletteBet::Black => color_of(number) == Color::Black,
            RouletteBet::Even => number % 2 == 0,
            RouletteBet::Odd => number % 2 == 1,
            RouletteBet::High => (19..=36).contains(&number),
            RouletteBet::Low => (1..=18).contains(&number),
            RouletteBet::Dozen(d) => {
                let low = (d - 1) * 12 + 1;
                (low..=low + 11).contains(&number)
            }
            RouletteBet::Column(c) => number % 3 == c % 3,
        }
    }

    /// Winnings multiplier; the stake itself comes back on top.
    pub fn payout_multiplier(self, config: &RouletteConfig) -> u32 {
        match self {
            RouletteBet::Straight(_) => config.straight_payout,
            RouletteBet::Red
            | RouletteBet::Black
            | RouletteBet::Even
            | RouletteBet::Odd
            | RouletteBet::High
            | RouletteBet::Low => config.even_money_payout,
            RouletteBet::Dozen(_) => config.dozen_payout,
            RouletteBet::Column(_) => config.column_payout,
        }
    }
}

impl FromStr for RouletteBet {
    type Err = ParseBetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Ok(number) = lowered.parse::<u8>() {
            if number <= 36 {
                return Ok(RouletteBet::Straight(number));
            }
            return Err(ParseBetError(lowered));
        }
        match lowered.as_str() {
            "red" => Ok(RouletteBet::Red),
            "black" => Ok(RouletteBet::Black),
            "even" => Ok(RouletteBet::Even),
            "odd" => Ok(RouletteBet::Odd),
            "high" => Ok(RouletteBet::High),
            "low" => Ok(RouletteBet::Low),
            "1st12" => Ok(RouletteBet::Dozen(1)),
            "2nd12" => Ok(RouletteBet::Dozen(2)),
            "3rd12" => Ok(RouletteBet::Dozen(3)),
            "col1" => Ok(RouletteBet::Column(1)),
            "col2" => Ok(RouletteBet::Column(2)),
            "col3" => Ok(RouletteBet::Column(3)),
            _ => Err(ParseBetError(lowered)),
        }
    }
}

impl fmt::Display for RouletteBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouletteBet::Straight(n) => write!(f, "{n}"),
            RouletteBet::Red => write!(f, "red"),
            RouletteBet::Black => write!(f, "black"),
            RouletteBet::Even => write!(f, "even"),
            RouletteBet::Odd => write!(f, "odd"),
            RouletteBet::High => write!(f, "high"),
            RouletteBet::Low => write!(f, "low"),
            RouletteBet::Dozen(1) => write!(f, "1st12"),
            RouletteBet::Dozen(2) => write!(f, "2nd12"),
            RouletteBet::Dozen(_) => write!(f, "3rd12"),
            RouletteBet::Column(c) => write!(f, "col{c}"),
        }
    }
}

/// Spin the wheel.
pub fn spin(rng: &mut GameRng) -> u8 {
    rng.next_u64_below(u64::from(WHEEL_SLOTS)) as u8
}

/// Result of one resolved roulette round.
#[derive(Debug, Clone, Serialize)]
pub struct SpinOutcome {
    pub number: u8,
    pub color: Color,
    pub bet: RouletteBet,
    pub won: bool,
    /// Gross payout: stake * (multiplier + 1) on a win, zero otherwise.
    pub payout: Chips,
    pub net_gain: i64,
}

/// Spin and resolve one wager.
pub fn play(
    config: &RouletteConfig,
    rng: &mut GameRng,
    bet: RouletteBet,
    stake: Chips,
) -> SpinOutcome {
    let number = spin(rng);
    let won = bet.wins(number);
    let payout = if won {
        stake.saturating_mul(u64::from(bet.payout_multiplier(config)) + 1)
    } else {
        0
    };
    SpinOutcome {
        number,
        color: color_of(number),
        bet,
        won,
        payout,
        net_gain: payout as i64 - stake as i64,
    }
}
