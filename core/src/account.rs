//! Per-user account state and the named statistic counters.
//!
//! All counters are monotone: nothing here ever decrements except the
//! balance (through the ledger) and the current win streak, which resets
//! on a loss. Removing an account entirely is the ledger's admin reset.

use crate::types::{Chips, GameKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub balance: Chips,
    pub total_staked: Chips,
    /// Gross payouts received on winning rounds.
    pub total_won: Chips,
    pub games_played: u64,
    pub last_daily_claim: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    #[serde(default)]
    pub stats: PlayerStats,
}

impl Account {
    pub fn fresh(starting_balance: Chips, now: DateTime<Utc>) -> Self {
        Self {
            balance: starting_balance,
            total_staked: 0,
            total_won: 0,
            games_played: 0,
            last_daily_claim: None,
            created_at: now,
            last_active: now,
            stats: PlayerStats::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlayerStats {
    pub slots_played: u64,
    pub slots_won: u64,
    pub roulette_played: u64,
    pub roulette_won: u64,
    pub blackjack_played: u64,
    pub blackjack_won: u64,
    /// Cumulative net gains on winning rounds.
    pub total_winnings: u64,
    /// Cumulative forfeited stakes on losing rounds.
    pub total_losses: u64,
    pub biggest_win: u64,
    pub biggest_loss: u64,
    pub current_streak: u64,
    pub best_streak: u64,
}

/// Names for the additive counters a caller may bump through
/// `Ledger::update_stat`. Streaks are not additive and move only through
/// the win/loss bookkeeping on settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    SlotsPlayed,
    SlotsWon,
    RoulettePlayed,
    RouletteWon,
    BlackjackPlayed,
    BlackjackWon,
    TotalWinnings,
    TotalLosses,
}

impl StatKey {
    pub fn played(game: GameKind) -> Self {
        match game {
            GameKind::Slots => StatKey::SlotsPlayed,
            GameKind::Roulette => StatKey::RoulettePlayed,
            GameKind::Blackjack => StatKey::BlackjackPlayed,
        }
    }

    pub fn won(game: GameKind) -> Self {
        match game {
            GameKind::Slots => StatKey::SlotsWon,
            GameKind::Roulette => StatKey::RouletteWon,
            GameKind::Blackjack => StatKey::BlackjackWon,
        }
    }
}

impl PlayerStats {
    /// Add `delta` to the named counter. A winnings or losses delta also
    /// raises the matching biggest-win/biggest-loss high-water mark when
    /// the single delta beats it.
    pub fn bump(&mut self, key: StatKey, delta: u64) {
        match key {
            StatKey::SlotsPlayed => self.slots_played = self.slots_played.saturating_add(delta),
            StatKey::SlotsWon => self.slots_won = self.slots_won.saturating_add(delta),
            StatKey::RoulettePlayed => {
                self.roulette_played = self.roulette_played.saturating_add(delta)
            }
            StatKey::RouletteWon => self.roulette_won = self.roulette_won.saturating_add(delta),
            StatKey::BlackjackPlayed => {
                self.blackjack_played = self.blackjack_played.saturating_add(delta)
            }
            StatKey::BlackjackWon => self.blackjack_won = self.blackjack_won.saturating_add(delta),
            StatKey::TotalWinnings => {
                self.total_winnings = self.total_winnings.saturating_add(delta);
                if delta > self.biggest_win {
                    self.biggest_win = delta;
                }
            }
            StatKey::TotalLosses => {
                self.total_losses = self.total_losses.saturating_add(delta);
                if delta > self.biggest_loss {
                    self.biggest_loss = delta;
                }
            }
        }
    }

    pub fn record_win(&mut self) {
        self.current_streak = self.current_streak.saturating_add(1);
        if self.current_streak > self.best_streak {
            self.best_streak = self.current_streak;
        }
    }

    pub fn record_loss(&mut self) {
        self.current_streak = 0;
    }
}

/// Process-wide aggregate counters, persisted with the user accounts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalStats {
    pub total_games: u64,
    pub total_bets: u64,
    pub total_payouts: u64,
}
