use crate::types::{Chips, SessionId};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CasinoError {
    #[error("insufficient funds: stake {stake} exceeds balance {balance}")]
    InsufficientFunds { stake: Chips, balance: Chips },

    #[error("rate limited: retry in {remaining:?}")]
    RateLimited { remaining: Duration },

    #[error("session '{id}' not found")]
    SessionNotFound { id: SessionId },

    #[error("stake {stake} outside allowed range [{min}, {max}]")]
    InvalidStake { stake: Chips, min: Chips, max: Chips },

    #[error("daily bonus not ready: {remaining:?} left")]
    DailyNotReady { remaining: Duration },

    #[error("persistence failure: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CasinoResult<T> = Result<T, CasinoError>;
