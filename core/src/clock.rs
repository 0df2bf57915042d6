//! Time source - the system clock in production, a manually advanced
//! clock in tests. Daily-bonus windows and cooldowns are boundary
//! sensitive; tests step a manual clock instead of sleeping.

use crate::sync;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Clock {
    source: Arc<Source>,
}

enum Source {
    System,
    Manual(Mutex<DateTime<Utc>>),
}

impl Clock {
    pub fn system() -> Self {
        Self { source: Arc::new(Source::System) }
    }

    /// A clock frozen at `start` that only moves through `advance`.
    pub fn manual(start: DateTime<Utc>) -> Self {
        Self { source: Arc::new(Source::Manual(Mutex::new(start))) }
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self.source.as_ref() {
            Source::System => Utc::now(),
            Source::Manual(at) => *sync::lock(at),
        }
    }

    /// Step a manual clock forward. Panics on the system clock - callers
    /// only advance clocks they created with `manual`.
    pub fn advance(&self, by: Duration) {
        match self.source.as_ref() {
            Source::System => panic!("advance() called on the system clock"),
            Source::Manual(at) => {
                let mut at = sync::lock(at);
                *at = *at + by;
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}
