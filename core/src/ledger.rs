//! The ledger: atomic balance and statistics store.
//!
//! CONTRACT:
//!   - Operations on the same account never interleave their
//!     read-modify-write: a per-account operation lock serializes them.
//!   - Operations on different accounts only meet at the disk write,
//!     which a single writer lock orders.
//!   - Every mutation persists write-through: the new document is on
//!     disk before the in-memory state changes. A failed write surfaces
//!     as `Persistence` and commits nothing, so memory and disk never
//!     diverge.
//!
//! Lock order, held only in this sequence: account op lock, writer,
//! shards in index order. Readers take shard locks alone.

use crate::account::{Account, GlobalStats, StatKey};
use crate::clock::Clock;
use crate::error::{CasinoError, CasinoResult};
use crate::store::{JsonStore, LedgerDocument};
use crate::sync;
use crate::types::{Chips, GameKind, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

const SHARD_COUNT: usize = 16;

/// How a finished wagered round settles against the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Gross payout credited back, stake included.
    Win { payout: Chips },
    /// The stake stays with the house.
    Loss,
    /// The stake comes back, nothing else moves.
    Push,
}

/// One row of the balance ordering.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user: UserId,
    pub balance: Chips,
    pub total_won: Chips,
    pub games_played: u64,
    pub created_at: DateTime<Utc>,
}

pub struct Ledger {
    starting_balance: Chips,
    clock: Clock,
    /// Per-account operation locks, held for a whole read-modify-write
    /// including the disk write it triggers.
    op_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
    /// Committed account state, sharded by user id hash. Shard locks are
    /// held only for short reads and the post-persist commit.
    shards: Vec<RwLock<HashMap<UserId, Account>>>,
    globals: Mutex<GlobalStats>,
    /// Orders disk writes; the full-document snapshot is taken under
    /// this lock so later writes always contain earlier commits.
    writer: Mutex<JsonStore>,
}

impl Ledger {
    /// Load the store's document and build the ledger over it.
    pub fn new(store: JsonStore, starting_balance: Chips, clock: Clock) -> Self {
        let doc = store.load();
        let mut maps: Vec<HashMap<UserId, Account>> =
            (0..SHARD_COUNT).map(|_| HashMap::new()).collect();
        for (user, account) in doc.users {
            maps[shard_index(user)].insert(user, account);
        }
        log::info!(
            "ledger loaded: {} account(s), {} game(s) on record",
            maps.iter().map(HashMap::len).sum::<usize>(),
            doc.global_stats.total_games
        );
        Self {
            starting_balance,
            clock,
            op_locks: Mutex::new(HashMap::new()),
            shards: maps.into_iter().map(RwLock::new).collect(),
            globals: Mutex::new(doc.global_stats),
            writer: Mutex::new(store),
        }
    }

    // ── Accounts ──────────────────────────────────────────────────

    /// Fetch a snapshot of the user's account, creating it with the
    /// starting balance on first reference. Refreshes last-active.
    pub fn get_or_create(&self, user: UserId) -> CasinoResult<Account> {
        self.mutate(user, |account, _, _| Ok(account.clone()))
    }

    /// Remove `amount` from the balance and accrue it to total staked.
    /// Returns false and moves no money when the balance is short.
    pub fn debit(&self, user: UserId, amount: Chips) -> CasinoResult<bool> {
        self.mutate(user, |account, _, _| {
            if account.balance < amount {
                return Ok(false);
            }
            account.balance -= amount;
            account.total_staked = account.total_staked.saturating_add(amount);
            Ok(true)
        })
    }

    /// Add `amount` to the balance. Zero is a permitted no-op; negative
    /// adjustments go through `debit`.
    pub fn credit(&self, user: UserId, amount: Chips) -> CasinoResult<()> {
        self.mutate(user, |account, _, _| {
            account.balance = account.balance.saturating_add(amount);
            Ok(())
        })
    }

    /// Add `delta` to a named counter, maintaining the biggest-win/loss
    /// high-water marks.
    pub fn update_stat(&self, user: UserId, key: StatKey, delta: u64) -> CasinoResult<()> {
        self.mutate(user, |account, _, _| {
            account.stats.bump(key, delta);
            Ok(())
        })
    }

    /// Admin reset: delete the account outright. The next reference
    /// recreates it fresh.
    pub fn reset_user(&self, user: UserId) -> CasinoResult<()> {
        let op_lock = self.op_lock(user);
        let _op = sync::lock(&op_lock);
        let writer = sync::lock(&self.writer);
        let globals = *sync::lock(&self.globals);
        let mut doc = self.snapshot(globals);
        doc.users.remove(&user);
        if let Err(err) = writer.save(&doc) {
            log::error!("ledger persist failed for user {user}: {err}");
            return Err(err);
        }
        sync::write(&self.shards[shard_index(user)]).remove(&user);
        log::info!("account {user} reset");
        Ok(())
    }

    // ── Daily bonus ───────────────────────────────────────────────

    /// True when the user has never claimed, or a full 24 hours have
    /// elapsed since the last claim.
    pub fn can_claim_daily(&self, user: UserId) -> bool {
        match self.read_account(user) {
            Some(account) => daily_remaining(&account, self.clock.now()).is_none(),
            None => true,
        }
    }

    /// Set the claim timestamp and credit the bonus as one durable unit.
    /// Returns the new balance.
    pub fn claim_daily(&self, user: UserId, amount: Chips) -> CasinoResult<Chips> {
        self.mutate(user, |account, _, now| {
            if let Some(remaining) = daily_remaining(account, now) {
                return Err(CasinoError::DailyNotReady { remaining });
            }
            account.last_daily_claim = Some(now);
            account.balance = account.balance.saturating_add(amount);
            Ok(account.balance)
        })
    }

    // ── Wagered rounds ────────────────────────────────────────────

    /// Open a wagered round: one durable transaction covering the stake
    /// debit, the played counters, and the global games/bets tallies.
    pub fn open_round(&self, user: UserId, game: GameKind, stake: Chips) -> CasinoResult<()> {
        self.mutate(user, |account, globals, _| {
            if account.balance < stake {
                return Err(CasinoError::InsufficientFunds {
                    stake,
                    balance: account.balance,
                });
            }
            account.balance -= stake;
            account.total_staked = account.total_staked.saturating_add(stake);
            account.games_played = account.games_played.saturating_add(1);
            account.stats.bump(StatKey::played(game), 1);
            globals.total_games = globals.total_games.saturating_add(1);
            globals.total_bets = globals.total_bets.saturating_add(stake);
            Ok(())
        })
    }

    /// Settle a round opened with `open_round`: payout credit, win/loss
    /// statistics, streaks, and the global payout tally in one durable
    /// transaction. Returns the account after settlement.
    pub fn settle_round(
        &self,
        user: UserId,
        game: GameKind,
        stake: Chips,
        outcome: RoundOutcome,
    ) -> CasinoResult<Account> {
        self.mutate(user, |account, globals, _| {
            match outcome {
                RoundOutcome::Win { payout } => {
                    debug_assert!(payout >= stake, "a win returns at least the stake");
                    account.balance = account.balance.saturating_add(payout);
                    account.total_won = account.total_won.saturating_add(payout);
                    account.stats.bump(StatKey::won(game), 1);
                    account.stats.bump(StatKey::TotalWinnings, payout.saturating_sub(stake));
                    account.stats.record_win();
                    globals.total_payouts = globals.total_payouts.saturating_add(payout);
                }
                RoundOutcome::Loss => {
                    account.stats.bump(StatKey::TotalLosses, stake);
                    account.stats.record_loss();
                }
                RoundOutcome::Push => {
                    account.balance = account.balance.saturating_add(stake);
                    globals.total_payouts = globals.total_payouts.saturating_add(stake);
                }
            }
            Ok(account.clone())
        })
    }

    // ── Rankings and aggregates ───────────────────────────────────

    /// Top `limit` accounts by balance. Ties resolve by first-seen order
    /// (creation time, then user id) so repeated calls are stable.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut rows = self.rows();
        rows.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.user.cmp(&b.user))
        });
        rows.truncate(limit);
        rows
    }

    /// 1-based position in the full balance ordering. A user with no
    /// account ranks after every registered one.
    pub fn rank(&self, user: UserId) -> usize {
        let rows = self.leaderboard(usize::MAX);
        rows.iter()
            .position(|row| row.user == user)
            .map(|i| i + 1)
            .unwrap_or(rows.len() + 1)
    }

    pub fn global_stats(&self) -> GlobalStats {
        *sync::lock(&self.globals)
    }

    pub fn user_count(&self) -> usize {
        self.shards.iter().map(|s| sync::read(s).len()).sum()
    }

    /// Write a timestamped copy of the live document next to it.
    pub fn backup(&self) -> CasinoResult<Option<PathBuf>> {
        let writer = sync::lock(&self.writer);
        let globals = *sync::lock(&self.globals);
        let doc = self.snapshot(globals);
        let stamp = self.clock.now().format("%Y%m%d_%H%M%S").to_string();
        writer.backup(&doc, &stamp)
    }

    // ── Internals ─────────────────────────────────────────────────

    /// Run `op` against the user's account under the account's operation
    /// lock, persist the resulting document, then commit to memory. `op`
    /// sees working copies; when it errors nothing is committed.
    fn mutate<T>(
        &self,
        user: UserId,
        op: impl FnOnce(&mut Account, &mut GlobalStats, DateTime<Utc>) -> CasinoResult<T>,
    ) -> CasinoResult<T> {
        let op_lock = self.op_lock(user);
        let _op = sync::lock(&op_lock);

        let now = self.clock.now();
        let mut account = self
            .read_account(user)
            .unwrap_or_else(|| Account::fresh(self.starting_balance, now));
        account.last_active = now;

        let writer = sync::lock(&self.writer);
        let mut globals = *sync::lock(&self.globals);
        let value = op(&mut account, &mut globals, now)?;

        let mut doc = self.snapshot(globals);
        doc.users.insert(user, account.clone());
        if let Err(err) = writer.save(&doc) {
            log::error!("ledger persist failed for user {user}: {err}");
            return Err(err);
        }

        // Disk accepted the document; commit to memory.
        *sync::lock(&self.globals) = globals;
        sync::write(&self.shards[shard_index(user)]).insert(user, account);
        Ok(value)
    }

    fn op_lock(&self, user: UserId) -> Arc<Mutex<()>> {
        let mut locks = sync::lock(&self.op_locks);
        locks.entry(user).or_default().clone()
    }

    fn read_account(&self, user: UserId) -> Option<Account> {
        sync::read(&self.shards[shard_index(user)]).get(&user).cloned()
    }

    /// A full document over the committed shards.
    fn snapshot(&self, globals: GlobalStats) -> LedgerDocument {
        let mut users = BTreeMap::new();
        for shard in &self.shards {
            for (id, account) in sync::read(shard).iter() {
                users.insert(*id, account.clone());
            }
        }
        LedgerDocument {
            users,
            global_stats: globals,
        }
    }

    fn rows(&self) -> Vec<LeaderboardEntry> {
        let mut rows = Vec::new();
        for shard in &self.shards {
            for (id, account) in sync::read(shard).iter() {
                rows.push(LeaderboardEntry {
                    user: *id,
                    balance: account.balance,
                    total_won: account.total_won,
                    games_played: account.games_played,
                    created_at: account.created_at,
                });
            }
        }
        rows
    }
}

fn shard_index(user: UserId) -> usize {
    let mut hasher = DefaultHasher::new();
    user.hash(&mut hasher);
    (hasher.finish() as usize) % SHARD_COUNT
}

/// Time left until the next daily claim, or None when claiming is open.
fn daily_remaining(account: &Account, now: DateTime<Utc>) -> Option<std::time::Duration> {
    let last = account.last_daily_claim?;
    let window = Duration::hours(24);
    let elapsed = now - last;
    if elapsed >= window {
        None
    } else {
        Some((window - elapsed).to_std().unwrap_or_default())
    }
}
