//! casino-core: virtual-currency ledger, game session engine, and
//! action rate limiting for a chat-platform casino.
//!
//! The crate is the stateful core behind a bot-style frontend. The
//! [`ledger::Ledger`] owns balances and statistics with write-through
//! persistence to a single JSON document, [`blackjack::SessionEngine`]
//! runs the multi-step rounds, and [`rate_limiter::RateLimiter`] gates
//! how often a user may act. The [`casino::Casino`] facade wires them in
//! the order a dispatch layer expects: rate limit, stake validation,
//! ledger, game.
//!
//! Slots and roulette are stateless transforms ([`slots`], [`roulette`])
//! that the facade settles against the ledger in one-shot rounds.

pub mod account;
pub mod blackjack;
pub mod cards;
pub mod casino;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod rate_limiter;
pub mod rng;
pub mod roulette;
pub mod slots;
pub mod store;
mod sync;
pub mod types;

pub use casino::Casino;
pub use error::{CasinoError, CasinoResult};
