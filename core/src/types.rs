//! Shared primitive types used across the entire crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable chat-platform user identifier.
pub type UserId = u64;

/// A virtual-currency amount. Balances are never negative, so all money
/// travels as unsigned chips; net results use `i64` where a loss must show.
pub type Chips = u64;

/// Identifier of an in-progress multi-step game round.
pub type SessionId = String;

/// The games the house runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Slots,
    Roulette,
    Blackjack,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Slots => write!(f, "slots"),
            GameKind::Roulette => write!(f, "roulette"),
            GameKind::Blackjack => write!(f, "blackjack"),
        }
    }
}
