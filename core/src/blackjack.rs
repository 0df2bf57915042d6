//! The blackjack session engine.
//!
//! One session per in-progress round, keyed by a generated id. All
//! operations on a session run under its mutex end to end, including the
//! ledger calls they trigger; a finished session leaves the active table
//! in the same step that set its outcome, so a repeat hit or stand on
//! the id reports `SessionNotFound`.
//!
//! Sessions are deliberately not persisted: the stake debit is durable
//! before the session exists, so a crash mid-round forfeits the stake
//! rather than losing or duplicating it.

use crate::cards::{self, Card};
use crate::clock::Clock;
use crate::config::BlackjackConfig;
use crate::error::{CasinoError, CasinoResult};
use crate::ledger::{Ledger, RoundOutcome};
use crate::rng::GameRng;
use crate::sync;
use crate::types::{Chips, GameKind, SessionId, UserId};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlackjackOutcome {
    PlayerBlackjack,
    DealerBlackjack,
    PlayerBust,
    DealerBust,
    PlayerWins,
    DealerWins,
    Push,
    /// Abandoned past the session age limit; settles as a loss.
    Expired,
}

struct Session {
    id: SessionId,
    owner: UserId,
    stake: Chips,
    draw_pile: Vec<Card>,
    player_hand: Vec<Card>,
    dealer_hand: Vec<Card>,
    phase: Phase,
    outcome: Option<BlackjackOutcome>,
    opened_at: DateTime<Utc>,
}

impl Session {
    fn draw(&mut self) -> Card {
        // a 52-card pile cannot run dry within one round
        self.draw_pile.pop().expect("draw pile exhausted")
    }
}

/// Public state of a round, safe to hand to a rendering layer. The
/// dealer's hole card and total stay concealed while the round is live.
#[derive(Debug, Clone, Serialize)]
pub struct BlackjackView {
    pub session_id: SessionId,
    pub phase: Phase,
    pub stake: Chips,
    pub player_hand: Vec<Card>,
    pub player_value: u32,
    /// Visible dealer cards; the hole card is omitted while playing.
    pub dealer_hand: Vec<Card>,
    pub dealer_value: Option<u32>,
    pub dealer_concealed: bool,
    pub outcome: Option<BlackjackOutcome>,
    /// Gross amount credited back (stake included), once finished.
    pub payout: Option<Chips>,
    pub net_gain: Option<i64>,
}

pub struct SessionEngine {
    ledger: Arc<Ledger>,
    config: BlackjackConfig,
    clock: Clock,
    rng: Mutex<GameRng>,
    sessions: DashMap<SessionId, Arc<Mutex<Session>>>,
}

impl SessionEngine {
    pub fn new(ledger: Arc<Ledger>, config: BlackjackConfig, clock: Clock, rng: GameRng) -> Self {
        Self {
            ledger,
            config,
            clock,
            rng: Mutex::new(rng),
            sessions: DashMap::new(),
        }
    }

    /// Start a round: debit the stake, deal, and resolve naturals
    /// immediately. Only a round with no natural enters the active
    /// table.
    pub fn start(&self, user: UserId, stake: Chips) -> CasinoResult<BlackjackView> {
        let pile = {
            let mut rng = sync::lock(&self.rng);
            cards::shuffled_pile(&mut rng)
        };
        self.start_with_pile(user, stake, pile)
    }

    /// Deterministic entry point for tests and replays: supply the pile
    /// cards are drawn from. Cards come off the back, player first.
    pub fn start_with_pile(
        &self,
        user: UserId,
        stake: Chips,
        pile: Vec<Card>,
    ) -> CasinoResult<BlackjackView> {
        assert!(pile.len() >= 4, "pile must cover the opening deal");
        self.ledger.open_round(user, GameKind::Blackjack, stake)?;

        let mut session = Session {
            id: Uuid::new_v4().to_string(),
            owner: user,
            stake,
            draw_pile: pile,
            player_hand: Vec::new(),
            dealer_hand: Vec::new(),
            phase: Phase::Playing,
            outcome: None,
            opened_at: self.clock.now(),
        };
        let p1 = session.draw();
        let p2 = session.draw();
        session.player_hand.extend([p1, p2]);
        let d1 = session.draw();
        let d2 = session.draw();
        session.dealer_hand.extend([d1, d2]);

        let player_natural = cards::is_natural(&session.player_hand);
        let dealer_natural = cards::is_natural(&session.dealer_hand);
        if player_natural || dealer_natural {
            let outcome = match (player_natural, dealer_natural) {
                (true, true) => BlackjackOutcome::Push,
                (true, false) => BlackjackOutcome::PlayerBlackjack,
                _ => BlackjackOutcome::DealerBlackjack,
            };
            return self.settle(&mut session, outcome);
        }

        log::debug!(
            "blackjack start: session={} user={user} stake={stake}",
            session.id
        );
        let view = view_of(&session, None);
        self.sessions
            .insert(session.id.clone(), Arc::new(Mutex::new(session)));
        Ok(view)
    }

    /// Draw one card to the player's hand. Busting settles the round as
    /// a loss and removes the session in the same step.
    pub fn hit(&self, session_id: &str) -> CasinoResult<BlackjackView> {
        let cell = self.session_cell(session_id)?;
        let mut session = sync::lock(&cell);
        if session.phase != Phase::Playing {
            return Err(CasinoError::SessionNotFound { id: session_id.to_string() });
        }
        let card = session.draw();
        session.player_hand.push(card);
        if cards::hand_value(&session.player_hand) > 21 {
            return self.settle(&mut session, BlackjackOutcome::PlayerBust);
        }
        Ok(view_of(&session, None))
    }

    /// Run the dealer under the house policy, compare totals, and settle.
    pub fn stand(&self, session_id: &str) -> CasinoResult<BlackjackView> {
        let cell = self.session_cell(session_id)?;
        let mut session = sync::lock(&cell);
        if session.phase != Phase::Playing {
            return Err(CasinoError::SessionNotFound { id: session_id.to_string() });
        }
        while cards::dealer_should_hit(&session.dealer_hand, self.config.dealer_hits_soft_17) {
            let card = session.draw();
            session.dealer_hand.push(card);
        }
        let player = cards::hand_value(&session.player_hand);
        let dealer = cards::hand_value(&session.dealer_hand);
        let outcome = if dealer > 21 {
            BlackjackOutcome::DealerBust
        } else if player > dealer {
            BlackjackOutcome::PlayerWins
        } else if dealer > player {
            BlackjackOutcome::DealerWins
        } else {
            BlackjackOutcome::Push
        };
        self.settle(&mut session, outcome)
    }

    /// Forfeit sessions older than the configured age limit. Expiry
    /// applies the loss path: the stake stays forfeited and loss stats
    /// record, exactly as if the player had lost the hand. Returns the
    /// expired session ids.
    pub fn sweep_expired(&self) -> Vec<SessionId> {
        let horizon = self.clock.now() - Duration::seconds(self.config.max_session_secs as i64);
        // Clone the cells out first: settling removes from the map, and
        // map shard locks must not be held across a session mutex.
        let candidates: Vec<(SessionId, Arc<Mutex<Session>>)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut expired = Vec::new();
        for (id, cell) in candidates {
            let mut session = sync::lock(&cell);
            if session.phase != Phase::Playing || session.opened_at > horizon {
                continue;
            }
            match self.settle(&mut session, BlackjackOutcome::Expired) {
                Ok(_) => {
                    log::info!("blackjack session {id} expired; stake forfeited");
                    expired.push(id);
                }
                Err(err) => log::warn!("expiry settlement failed for {id}: {err}"),
            }
        }
        expired
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Terminal transition: settle with the ledger first (durable), then
    /// mark the session finished and drop it from the table. A failed
    /// settlement leaves the session live and retryable.
    fn settle(
        &self,
        session: &mut Session,
        outcome: BlackjackOutcome,
    ) -> CasinoResult<BlackjackView> {
        let round = match outcome {
            BlackjackOutcome::PlayerBlackjack => RoundOutcome::Win {
                payout: natural_payout(session.stake, self.config.natural_payout),
            },
            BlackjackOutcome::DealerBust | BlackjackOutcome::PlayerWins => RoundOutcome::Win {
                payout: session.stake.saturating_mul(2),
            },
            BlackjackOutcome::Push => RoundOutcome::Push,
            BlackjackOutcome::DealerBlackjack
            | BlackjackOutcome::PlayerBust
            | BlackjackOutcome::DealerWins
            | BlackjackOutcome::Expired => RoundOutcome::Loss,
        };
        self.ledger
            .settle_round(session.owner, GameKind::Blackjack, session.stake, round)?;

        session.phase = Phase::Finished;
        session.outcome = Some(outcome);
        self.sessions.remove(&session.id);

        let payout = match round {
            RoundOutcome::Win { payout } => payout,
            RoundOutcome::Push => session.stake,
            RoundOutcome::Loss => 0,
        };
        log::debug!(
            "blackjack settle: session={} outcome={outcome:?} payout={payout}",
            session.id
        );
        Ok(view_of(session, Some(payout)))
    }

    /// Clone the Arc out of the map guard before locking the session, so
    /// no map shard lock is held across the session mutex.
    fn session_cell(&self, id: &str) -> CasinoResult<Arc<Mutex<Session>>> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CasinoError::SessionNotFound { id: id.to_string() })
    }
}

fn view_of(session: &Session, payout: Option<Chips>) -> BlackjackView {
    let playing = session.phase == Phase::Playing;
    let dealer_hand: Vec<Card> = if playing {
        session.dealer_hand.iter().skip(1).copied().collect()
    } else {
        session.dealer_hand.clone()
    };
    BlackjackView {
        session_id: session.id.clone(),
        phase: session.phase,
        stake: session.stake,
        player_value: cards::hand_value(&session.player_hand),
        player_hand: session.player_hand.clone(),
        dealer_value: (!playing).then(|| cards::hand_value(&session.dealer_hand)),
        dealer_hand,
        dealer_concealed: playing,
        outcome: session.outcome,
        payout,
        net_gain: payout.map(|p| p as i64 - session.stake as i64),
    }
}

/// Gross natural payout: stake times the configured ratio, floored.
fn natural_payout(stake: Chips, ratio: f64) -> Chips {
    let bps = (ratio * 10_000.0).round() as u128;
    ((stake as u128 * bps) / 10_000) as Chips
}
