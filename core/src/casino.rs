//! The casino facade: wiring between the rate limiter, the ledger, and
//! the games. This is the surface a command-dispatch layer calls.
//!
//! RULE: every public action gates on the rate limiter first, validates
//! the stake second, and only then touches the ledger. Nothing mutates
//! before a denial.

use crate::account::{Account, GlobalStats};
use crate::blackjack::{BlackjackView, SessionEngine};
use crate::clock::Clock;
use crate::config::CasinoConfig;
use crate::error::{CasinoError, CasinoResult};
use crate::ledger::{Ledger, LeaderboardEntry, RoundOutcome};
use crate::rate_limiter::RateLimiter;
use crate::rng::GameRng;
use crate::roulette::{self, RouletteBet, SpinOutcome};
use crate::slots::{self, SpinResult};
use crate::store::JsonStore;
use crate::sync;
use crate::types::{Chips, GameKind, SessionId, UserId};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Action kinds the rate limiter gates. These match the cooldown keys in
/// the config.
pub mod actions {
    pub const GAME: &str = "game";
    pub const BALANCE: &str = "balance";
    pub const DAILY: &str = "daily";
    pub const LEADERBOARD: &str = "leaderboard";
    pub const STATS: &str = "stats";
}

/// RNG stream slots. Append only; reordering reseeds existing streams.
const RNG_SLOT_BLACKJACK: u64 = 0;
const RNG_SLOT_TABLE: u64 = 1;

/// A resolved one-shot slots round.
#[derive(Debug, Clone, Serialize)]
pub struct SlotsRound {
    pub stake: Chips,
    pub spin: SpinResult,
    pub balance: Chips,
}

/// A resolved one-shot roulette round.
#[derive(Debug, Clone, Serialize)]
pub struct RouletteRound {
    pub stake: Chips,
    pub outcome: SpinOutcome,
    pub balance: Chips,
}

pub struct Casino {
    config: CasinoConfig,
    ledger: Arc<Ledger>,
    limiter: RateLimiter,
    blackjack: SessionEngine,
    /// Feeds the one-shot games (slots reels, roulette wheel).
    rng: Mutex<GameRng>,
}

impl Casino {
    /// Wire a casino from config. `store` owns the durable document; a
    /// `seed` pins every shuffle and spin (tests, replays), `None` draws
    /// from entropy.
    pub fn open(config: CasinoConfig, store: JsonStore, clock: Clock, seed: Option<u64>) -> Self {
        let ledger = Arc::new(Ledger::new(store, config.starting_balance, clock.clone()));
        let rng_for = |slot: u64| match seed {
            Some(seed) => GameRng::derive(seed, slot),
            None => GameRng::from_entropy(),
        };
        let blackjack = SessionEngine::new(
            ledger.clone(),
            config.blackjack.clone(),
            clock.clone(),
            rng_for(RNG_SLOT_BLACKJACK),
        );
        let limiter = RateLimiter::new(&config.cooldown_secs, clock);
        Self {
            ledger,
            limiter,
            blackjack,
            rng: Mutex::new(rng_for(RNG_SLOT_TABLE)),
            config,
        }
    }

    // ── Economy ───────────────────────────────────────────────────

    pub fn balance(&self, user: UserId) -> CasinoResult<Account> {
        self.gate(user, actions::BALANCE)?;
        self.ledger.get_or_create(user)
    }

    /// Claim the daily bonus. The ledger's 24-hour window is the
    /// authority; the `daily` cooldown kind mirrors it for callers that
    /// want a cheap pre-check.
    pub fn claim_daily(&self, user: UserId) -> CasinoResult<Chips> {
        self.gate(user, actions::DAILY)?;
        self.ledger.claim_daily(user, self.config.daily_bonus)
    }

    pub fn leaderboard(&self, user: UserId, limit: usize) -> CasinoResult<Vec<LeaderboardEntry>> {
        self.gate(user, actions::LEADERBOARD)?;
        Ok(self.ledger.leaderboard(limit))
    }

    pub fn stats(&self, user: UserId) -> CasinoResult<Account> {
        self.gate(user, actions::STATS)?;
        self.ledger.get_or_create(user)
    }

    pub fn rank(&self, user: UserId) -> usize {
        self.ledger.rank(user)
    }

    pub fn global_stats(&self) -> GlobalStats {
        self.ledger.global_stats()
    }

    // ── Games ─────────────────────────────────────────────────────

    pub fn play_slots(&self, user: UserId, stake: Chips) -> CasinoResult<SlotsRound> {
        self.gate(user, actions::GAME)?;
        self.check_stake(stake)?;
        self.ledger.open_round(user, GameKind::Slots, stake)?;
        let spin = {
            let mut rng = sync::lock(&self.rng);
            slots::play(&self.config.slots, &mut rng, stake)
        };
        let outcome = if spin.payout > 0 {
            RoundOutcome::Win { payout: spin.payout }
        } else {
            RoundOutcome::Loss
        };
        let account = self
            .ledger
            .settle_round(user, GameKind::Slots, stake, outcome)?;
        Ok(SlotsRound {
            stake,
            spin,
            balance: account.balance,
        })
    }

    pub fn play_roulette(
        &self,
        user: UserId,
        stake: Chips,
        bet: RouletteBet,
    ) -> CasinoResult<RouletteRound> {
        self.gate(user, actions::GAME)?;
        self.check_stake(stake)?;
        self.ledger.open_round(user, GameKind::Roulette, stake)?;
        let outcome = {
            let mut rng = sync::lock(&self.rng);
            roulette::play(&self.config.roulette, &mut rng, bet, stake)
        };
        let round = if outcome.won {
            RoundOutcome::Win { payout: outcome.payout }
        } else {
            RoundOutcome::Loss
        };
        let account = self
            .ledger
            .settle_round(user, GameKind::Roulette, stake, round)?;
        Ok(RouletteRound {
            stake,
            outcome,
            balance: account.balance,
        })
    }

    pub fn blackjack_start(&self, user: UserId, stake: Chips) -> CasinoResult<BlackjackView> {
        self.gate(user, actions::GAME)?;
        self.check_stake(stake)?;
        self.blackjack.start(user, stake)
    }

    /// In-round actions are not rate limited; they belong to a round the
    /// `game` gate already admitted.
    pub fn blackjack_hit(&self, session_id: &str) -> CasinoResult<BlackjackView> {
        self.blackjack.hit(session_id)
    }

    pub fn blackjack_stand(&self, session_id: &str) -> CasinoResult<BlackjackView> {
        self.blackjack.stand(session_id)
    }

    // ── Housekeeping ──────────────────────────────────────────────

    /// Periodic sweep: forfeit abandoned blackjack sessions and evict
    /// elapsed cooldown entries. Returns the expired session ids.
    pub fn sweep(&self) -> Vec<SessionId> {
        let evicted = self.limiter.sweep();
        if evicted > 0 {
            log::debug!("rate limiter sweep evicted {evicted} entries");
        }
        self.blackjack.sweep_expired()
    }

    pub fn config(&self) -> &CasinoConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn sessions(&self) -> &SessionEngine {
        &self.blackjack
    }

    // ── Internals ─────────────────────────────────────────────────

    fn gate(&self, user: UserId, action: &str) -> CasinoResult<()> {
        if self.limiter.allow(user, action) {
            Ok(())
        } else {
            Err(CasinoError::RateLimited {
                remaining: self.limiter.remaining_cooldown(user, action),
            })
        }
    }

    fn check_stake(&self, stake: Chips) -> CasinoResult<()> {
        if stake < self.config.min_stake || stake > self.config.max_stake {
            return Err(CasinoError::InvalidStake {
                stake,
                min: self.config.min_stake,
                max: self.config.max_stake,
            });
        }
        Ok(())
    }
}
