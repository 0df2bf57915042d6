//! Facade control flow: rate limit first, stake validation second, and
//! only then the ledger.

use casino_core::casino::Casino;
use casino_core::clock::Clock;
use casino_core::config::CasinoConfig;
use casino_core::error::CasinoError;
use casino_core::roulette::RouletteBet;
use casino_core::store::JsonStore;
use chrono::{Duration, TimeZone, Utc};

const USER: u64 = 7;

fn build_casino(config: CasinoConfig) -> (Casino, Clock) {
    let clock = Clock::manual(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
    let casino = Casino::open(config, JsonStore::in_memory(), clock.clone(), Some(11));
    (casino, clock)
}

#[test]
fn a_second_game_inside_the_cooldown_is_rejected_before_the_ledger() {
    let (casino, clock) = build_casino(CasinoConfig::default());

    casino.play_slots(USER, 100).expect("first spin");
    assert_eq!(casino.global_stats().total_games, 1);

    let err = casino.play_slots(USER, 100).unwrap_err();
    assert!(matches!(err, CasinoError::RateLimited { .. }));
    assert_eq!(casino.global_stats().total_games, 1);

    clock.advance(Duration::seconds(3));
    casino.play_slots(USER, 100).expect("after cooldown");
    assert_eq!(casino.global_stats().total_games, 2);
}

#[test]
fn stakes_outside_the_configured_range_never_reach_the_ledger() {
    let (casino, clock) = build_casino(CasinoConfig::default());

    let err = casino.play_slots(USER, 5).unwrap_err();
    assert!(matches!(err, CasinoError::InvalidStake { stake: 5, min: 10, max: 10_000 }));

    clock.advance(Duration::seconds(3));
    let err = casino.play_roulette(USER, 10_001, RouletteBet::Red).unwrap_err();
    assert!(matches!(err, CasinoError::InvalidStake { .. }));

    clock.advance(Duration::seconds(3));
    let err = casino.blackjack_start(USER, 0).unwrap_err();
    assert!(matches!(err, CasinoError::InvalidStake { .. }));

    assert_eq!(casino.global_stats().total_games, 0);
    assert_eq!(casino.ledger().user_count(), 0);
}

#[test]
fn insufficient_funds_surface_with_the_current_balance() {
    let config = CasinoConfig { starting_balance: 50, ..CasinoConfig::default() };
    let (casino, _) = build_casino(config);

    let err = casino.play_slots(USER, 100).unwrap_err();
    assert!(matches!(
        err,
        CasinoError::InsufficientFunds { stake: 100, balance: 50 }
    ));
}

#[test]
fn slots_rounds_reconcile_the_reported_balance() {
    let (casino, clock) = build_casino(CasinoConfig::default());
    let mut expected = 10_000i64;

    for _ in 0..10 {
        let round = casino.play_slots(USER, 100).expect("spin");
        expected += round.spin.net_gain;
        assert_eq!(round.balance as i64, expected);
        clock.advance(Duration::seconds(3));
    }

    let account = casino.stats(USER).expect("stats");
    assert_eq!(account.stats.slots_played, 10);
    assert_eq!(account.games_played, 10);
}

#[test]
fn roulette_rounds_settle_win_or_loss_against_the_ledger() {
    let (casino, clock) = build_casino(CasinoConfig::default());

    let round = casino
        .play_roulette(USER, 100, RouletteBet::Red)
        .expect("spin");
    assert_eq!(
        round.balance as i64,
        10_000 + round.outcome.net_gain
    );

    clock.advance(Duration::seconds(3));
    let account = casino.stats(USER).expect("stats");
    assert_eq!(account.stats.roulette_played, 1);
    let won = round.outcome.won;
    assert_eq!(account.stats.roulette_won, u64::from(won));
}

#[test]
fn blackjack_round_reconciles_whatever_the_deal_was() {
    let (casino, _) = build_casino(CasinoConfig::default());

    let start = casino.blackjack_start(USER, 100).expect("start");
    let finished = if start.payout.is_some() {
        start
    } else {
        // in-round actions are not rate limited
        casino.blackjack_stand(&start.session_id).expect("stand")
    };

    let payout = finished.payout.expect("finished round");
    let account = casino.ledger().get_or_create(USER).expect("account");
    assert_eq!(account.balance, 10_000 - 100 + payout);
    assert_eq!(account.stats.blackjack_played, 1);
    assert_eq!(casino.sessions().active_sessions(), 0);

    assert!(matches!(
        casino.blackjack_hit(&finished.session_id),
        Err(CasinoError::SessionNotFound { .. })
    ));
}

#[test]
fn daily_bonus_claims_once_per_window_through_the_facade() {
    let mut config = CasinoConfig::default();
    // leave the 24h window to the ledger, not the limiter pre-check
    config.cooldown_secs.remove("daily");
    let (casino, clock) = build_casino(config);

    let balance = casino.claim_daily(USER).expect("claim");
    assert_eq!(balance, 11_000);

    let err = casino.claim_daily(USER).unwrap_err();
    assert!(matches!(err, CasinoError::DailyNotReady { .. }));

    clock.advance(Duration::hours(24));
    assert_eq!(casino.claim_daily(USER).expect("claim"), 12_000);
}

#[test]
fn balance_and_leaderboard_views_pass_through() {
    let (casino, clock) = build_casino(CasinoConfig::default());

    let account = casino.balance(USER).expect("balance");
    assert_eq!(account.balance, 10_000);

    clock.advance(Duration::seconds(30));
    let rows = casino.leaderboard(USER, 10).expect("leaderboard");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user, USER);
    assert_eq!(casino.rank(USER), 1);
}

#[test]
fn housekeeping_sweep_runs_clean_on_an_idle_casino() {
    let (casino, clock) = build_casino(CasinoConfig::default());
    casino.play_slots(USER, 100).expect("spin");
    clock.advance(Duration::hours(1));
    assert!(casino.sweep().is_empty());
    assert_eq!(casino.limiter().tracked_entries(), 0);
}
