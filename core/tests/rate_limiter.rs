//! Rate limiter boundaries: denial never resets the clock, sweeps never
//! free an active cooldown early, unknown kinds pass.

use casino_core::clock::Clock;
use casino_core::rate_limiter::RateLimiter;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::time::Duration as StdDuration;

const USER: u64 = 7;

fn build_limiter() -> (RateLimiter, Clock) {
    let clock = Clock::manual(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
    let cooldowns: HashMap<String, u64> =
        [("game".to_string(), 3), ("daily".to_string(), 86_400)].into();
    (RateLimiter::new(&cooldowns, clock.clone()), clock)
}

#[test]
fn second_call_inside_the_cooldown_is_denied() {
    let (limiter, clock) = build_limiter();
    assert!(limiter.allow(USER, "game"));
    assert!(!limiter.allow(USER, "game"));

    clock.advance(Duration::seconds(2));
    assert!(!limiter.allow(USER, "game"));

    clock.advance(Duration::seconds(1));
    assert!(limiter.allow(USER, "game"));
}

#[test]
fn a_denied_attempt_does_not_reset_the_clock() {
    let (limiter, clock) = build_limiter();
    assert!(limiter.allow(USER, "game"));

    clock.advance(Duration::seconds(2));
    assert!(!limiter.allow(USER, "game"));

    // one more second from the original grant, not from the denial
    clock.advance(Duration::seconds(1));
    assert!(limiter.allow(USER, "game"));
}

#[test]
fn unknown_action_kinds_are_never_limited() {
    let (limiter, _) = build_limiter();
    for _ in 0..5 {
        assert!(limiter.allow(USER, "emote"));
    }
    assert_eq!(limiter.remaining_cooldown(USER, "emote"), StdDuration::ZERO);
}

#[test]
fn remaining_cooldown_counts_down_to_zero() {
    let (limiter, clock) = build_limiter();
    assert_eq!(limiter.remaining_cooldown(USER, "game"), StdDuration::ZERO);

    assert!(limiter.allow(USER, "game"));
    assert_eq!(limiter.remaining_cooldown(USER, "game"), StdDuration::from_secs(3));

    clock.advance(Duration::seconds(1));
    assert_eq!(limiter.remaining_cooldown(USER, "game"), StdDuration::from_secs(2));

    clock.advance(Duration::seconds(2));
    assert_eq!(limiter.remaining_cooldown(USER, "game"), StdDuration::ZERO);
}

#[test]
fn users_and_kinds_are_independent() {
    let (limiter, _) = build_limiter();
    assert!(limiter.allow(USER, "game"));
    assert!(limiter.allow(USER, "daily"));
    assert!(limiter.allow(USER + 1, "game"));
    assert!(!limiter.allow(USER, "game"));
    assert!(!limiter.allow(USER + 1, "game"));
}

#[test]
fn sweep_evicts_only_elapsed_entries() {
    let (limiter, clock) = build_limiter();
    assert!(limiter.allow(USER, "game"));
    assert!(limiter.allow(USER, "daily"));
    assert_eq!(limiter.tracked_entries(), 2);

    clock.advance(Duration::seconds(5));
    let evicted = limiter.sweep();
    assert_eq!(evicted, 1);
    assert_eq!(limiter.tracked_entries(), 1);

    // the daily cooldown is still enforced after the sweep
    assert!(!limiter.allow(USER, "daily"));
    assert!(limiter.remaining_cooldown(USER, "daily") > StdDuration::ZERO);
    // the evicted game entry was already past its cooldown anyway
    assert!(limiter.allow(USER, "game"));
}

#[test]
fn admin_resets_clear_cooldowns() {
    let (limiter, _) = build_limiter();
    assert!(limiter.allow(USER, "game"));
    assert!(limiter.allow(USER, "daily"));

    limiter.reset_action(USER, "game");
    assert!(limiter.allow(USER, "game"));
    assert!(!limiter.allow(USER, "daily"));

    limiter.reset_user(USER);
    assert!(limiter.allow(USER, "daily"));
    assert!(limiter.allow(USER, "game"));
}

#[test]
fn cooldown_for_reports_configuration() {
    let (limiter, _) = build_limiter();
    assert_eq!(limiter.cooldown_for("game"), Some(StdDuration::from_secs(3)));
    assert_eq!(limiter.cooldown_for("emote"), None);
}
