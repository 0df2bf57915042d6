//! table-runner: headless workload driver for the casino core.
//!
//! Spins up a pool of simulated players that hammer a shared ledger
//! with slots, roulette, and blackjack rounds, then prints an
//! end-of-run summary.
//!
//! Usage:
//!   table-runner --players 8 --rounds 50 --data casino.json
//!   table-runner --seed 7 --rounds 200 --json

use anyhow::Result;
use casino_core::casino::{actions, Casino};
use casino_core::clock::Clock;
use casino_core::config::CasinoConfig;
use casino_core::error::CasinoError;
use casino_core::rng::GameRng;
use casino_core::roulette::RouletteBet;
use casino_core::store::JsonStore;
use casino_core::CasinoResult;
use std::env;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let players = parse_arg(&args, "--players", 8u64);
    let rounds = parse_arg(&args, "--rounds", 50u32);
    let stake = parse_arg(&args, "--stake", 100u64);
    let game_cooldown = parse_arg(&args, "--game-cooldown", 0u64);
    let json = args.iter().any(|a| a == "--json");
    let seed = args
        .windows(2)
        .find(|w| w[0] == "--seed")
        .and_then(|w| w[1].parse::<u64>().ok());
    let data = args
        .windows(2)
        .find(|w| w[0] == "--data")
        .map(|w| w[1].as_str())
        .unwrap_or("casino.json");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    let mut config = match config_path {
        Some(path) => CasinoConfig::from_file(path)?,
        None => CasinoConfig::default(),
    };
    for issue in config.validate() {
        log::warn!("config: {issue}");
    }
    // The workload hammers the tables; a per-round cooldown would spend
    // the whole run sleeping. Override it for the benchmark loop.
    config
        .cooldown_secs
        .insert(actions::GAME.to_string(), game_cooldown);

    if !json {
        println!("table-runner");
        println!("  players: {players}");
        println!("  rounds:  {rounds}");
        println!("  stake:   {stake}");
        println!("  data:    {data}");
        match seed {
            Some(seed) => println!("  seed:    {seed}"),
            None => println!("  seed:    entropy"),
        }
        println!();
    }

    let casino = Casino::open(config, JsonStore::open(data), Clock::system(), seed);

    thread::scope(|scope| {
        for player in 0..players {
            let casino = &casino;
            scope.spawn(move || run_player(casino, 1_000 + player, rounds, stake));
        }
    });

    let expired = casino.sweep();
    if !expired.is_empty() {
        log::info!("swept {} abandoned session(s)", expired.len());
    }

    print_summary(&casino, json)?;
    casino.ledger().backup()?;
    Ok(())
}

fn run_player(casino: &Casino, user: u64, rounds: u32, stake: u64) {
    let mut rng = GameRng::seeded(user);
    let mut denied = 0u32;

    for round in 0..rounds {
        match play_round(casino, user, stake, round, &mut rng) {
            Ok(()) => {}
            Err(CasinoError::RateLimited { remaining }) => {
                denied += 1;
                thread::sleep(remaining.min(Duration::from_millis(250)));
            }
            Err(CasinoError::InsufficientFunds { .. }) => {
                // broke: try the daily bonus, otherwise leave the table
                if casino.claim_daily(user).is_err() {
                    log::info!("player {user} is out of chips after {round} rounds");
                    break;
                }
            }
            Err(other) => {
                log::warn!("player {user}: {other}");
                break;
            }
        }
    }

    if denied > 0 {
        log::debug!("player {user}: {denied} rate-limited attempts");
    }
}

fn play_round(
    casino: &Casino,
    user: u64,
    stake: u64,
    round: u32,
    rng: &mut GameRng,
) -> CasinoResult<()> {
    match round % 3 {
        0 => casino.play_slots(user, stake).map(|_| ()),
        1 => casino
            .play_roulette(user, stake, random_bet(rng))
            .map(|_| ()),
        _ => {
            let mut view = casino.blackjack_start(user, stake)?;
            // naive strategy: draw to 17, then stand
            while view.payout.is_none() && view.player_value < 17 {
                view = casino.blackjack_hit(&view.session_id)?;
            }
            if view.payout.is_none() {
                casino.blackjack_stand(&view.session_id)?;
            }
            Ok(())
        }
    }
}

fn random_bet(rng: &mut GameRng) -> RouletteBet {
    match rng.next_u64_below(6) {
        0 => RouletteBet::Straight(rng.next_u64_below(37) as u8),
        1 => RouletteBet::Red,
        2 => RouletteBet::Black,
        3 => RouletteBet::Even,
        4 => RouletteBet::Dozen(rng.next_u64_below(3) as u8 + 1),
        _ => RouletteBet::Column(rng.next_u64_below(3) as u8 + 1),
    }
}

fn print_summary(casino: &Casino, json: bool) -> Result<()> {
    let globals = casino.global_stats();
    let leaderboard = casino.ledger().leaderboard(10);

    if json {
        let summary = serde_json::json!({
            "users": casino.ledger().user_count(),
            "global_stats": globals,
            "leaderboard": leaderboard,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("=== RUN SUMMARY ===");
    println!("  users:         {}", casino.ledger().user_count());
    println!("  total games:   {}", globals.total_games);
    println!("  total bets:    {}", globals.total_bets);
    println!("  total payouts: {}", globals.total_payouts);
    if globals.total_bets > 0 {
        let hold = (globals.total_bets as f64 - globals.total_payouts as f64)
            / globals.total_bets as f64
            * 100.0;
        println!("  house hold:    {hold:.1}%");
    }

    println!();
    println!("=== LEADERBOARD ===");
    for (i, row) in leaderboard.iter().enumerate() {
        println!(
            "  {:>2}. user {:>6}  balance {:>8}  games {:>4}",
            i + 1,
            row.user,
            row.balance,
            row.games_played
        );
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
