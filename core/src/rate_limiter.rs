//! Per-user action cooldowns.
//!
//! State is memory-only; a restart clears every cooldown (allowed
//! cold-start behavior). A denied attempt never touches the recorded
//! timestamp, so hammering a command cannot extend its own cooldown.

use crate::clock::Clock;
use crate::types::UserId;
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;

pub struct RateLimiter {
    cooldowns: HashMap<String, Duration>,
    last_action: DashMap<(UserId, String), DateTime<Utc>>,
    clock: Clock,
}

impl RateLimiter {
    pub fn new(cooldown_secs: &HashMap<String, u64>, clock: Clock) -> Self {
        let cooldowns = cooldown_secs
            .iter()
            .map(|(kind, &secs)| (kind.clone(), Duration::seconds(secs as i64)))
            .collect();
        Self {
            cooldowns,
            last_action: DashMap::new(),
            clock,
        }
    }

    /// True when the action may run now; the attempt time is recorded
    /// only on success. Unknown action kinds are never limited.
    pub fn allow(&self, user: UserId, action: &str) -> bool {
        let Some(&cooldown) = self.cooldowns.get(action) else {
            return true;
        };
        let now = self.clock.now();
        match self.last_action.entry((user, action.to_string())) {
            Entry::Occupied(mut entry) => {
                if now - *entry.get() >= cooldown {
                    entry.insert(now);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    /// Time left before the action is allowed again. Zero when ready.
    pub fn remaining_cooldown(&self, user: UserId, action: &str) -> std::time::Duration {
        let Some(&cooldown) = self.cooldowns.get(action) else {
            return std::time::Duration::ZERO;
        };
        let Some(last) = self
            .last_action
            .get(&(user, action.to_string()))
            .map(|entry| *entry.value())
        else {
            return std::time::Duration::ZERO;
        };
        let elapsed = self.clock.now() - last;
        (cooldown - elapsed).to_std().unwrap_or(std::time::Duration::ZERO)
    }

    /// Evict entries whose cooldown has fully elapsed. Purely a memory
    /// bound: an entry still inside its cooldown is never dropped.
    /// Returns the number evicted.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.last_action.len();
        self.last_action.retain(|key, last| {
            match self.cooldowns.get(&key.1) {
                Some(&cooldown) => now - *last < cooldown,
                // A kind no longer configured never limits anything.
                None => false,
            }
        });
        before.saturating_sub(self.last_action.len())
    }

    /// Admin: clear every cooldown for one user.
    pub fn reset_user(&self, user: UserId) {
        self.last_action.retain(|key, _| key.0 != user);
    }

    /// Admin: clear one action's cooldown for one user.
    pub fn reset_action(&self, user: UserId, action: &str) {
        self.last_action.remove(&(user, action.to_string()));
    }

    /// The configured cooldown for an action kind, if it has one.
    pub fn cooldown_for(&self, action: &str) -> Option<std::time::Duration> {
        self.cooldowns
            .get(action)
            .and_then(|d| d.to_std().ok())
    }

    pub fn tracked_entries(&self) -> usize {
        self.last_action.len()
    }
}
