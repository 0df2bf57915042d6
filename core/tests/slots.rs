//! Slots payout table over the default symbol configuration.
//!
//! Default symbol order: cherry(0) lemon(1) orange(2) grape(3) bell(4)
//! diamond(5) seven(6).

use casino_core::config::SlotsConfig;
use casino_core::rng::GameRng;
use casino_core::slots::{self, Combo};

const CHERRY: usize = 0;
const LEMON: usize = 1;
const ORANGE: usize = 2;
const BELL: usize = 4;
const DIAMOND: usize = 5;
const SEVEN: usize = 6;

fn config() -> SlotsConfig {
    SlotsConfig::default()
}

#[test]
fn triple_sevens_pay_two_hundred_fifty_times() {
    let (combo, payout) = slots::evaluate(&config(), [SEVEN, SEVEN, SEVEN], 10);
    assert_eq!(combo, Combo::Triple);
    assert_eq!(payout, 2_500); // 25 * 10 = 250x
}

#[test]
fn premium_triples_use_their_bonus_multipliers() {
    let cfg = config();
    assert_eq!(slots::evaluate(&cfg, [DIAMOND, DIAMOND, DIAMOND], 10).1, 1_200); // 120x
    assert_eq!(slots::evaluate(&cfg, [BELL, BELL, BELL], 10).1, 480); // 48x
}

#[test]
fn ordinary_triples_pay_four_times_their_value() {
    let (combo, payout) = slots::evaluate(&config(), [CHERRY, CHERRY, CHERRY], 10);
    assert_eq!(combo, Combo::Triple);
    assert_eq!(payout, 80); // 2 * 4 = 8x

    assert_eq!(slots::evaluate(&config(), [ORANGE, ORANGE, ORANGE], 10).1, 160); // 16x
}

#[test]
fn bonus_pairs_beat_the_generic_pair_payout() {
    let cfg = config();
    for reels in [[SEVEN, SEVEN, CHERRY], [SEVEN, CHERRY, SEVEN], [CHERRY, SEVEN, SEVEN]] {
        let (combo, payout) = slots::evaluate(&cfg, reels, 10);
        assert_eq!(combo, Combo::PairBonus);
        assert_eq!(payout, 100); // flat 10x
    }
    let (combo, payout) = slots::evaluate(&cfg, [DIAMOND, LEMON, DIAMOND], 10);
    assert_eq!(combo, Combo::PairBonus);
    assert_eq!(payout, 80); // flat 8x
}

#[test]
fn generic_pairs_pay_half_the_symbol_value_floored() {
    let cfg = config();
    let (combo, payout) = slots::evaluate(&cfg, [CHERRY, CHERRY, LEMON], 10);
    assert_eq!(combo, Combo::Pair);
    assert_eq!(payout, 10); // 2 / 2 = 1x: payout equals the stake

    // lemon pair at 1.5x floors the fraction
    let (_, payout) = slots::evaluate(&cfg, [LEMON, LEMON, CHERRY], 25);
    assert_eq!(payout, 37); // floor(25 * 3 / 2)
}

#[test]
fn three_distinct_symbols_miss() {
    let (combo, payout) = slots::evaluate(&config(), [CHERRY, LEMON, ORANGE], 10);
    assert_eq!(combo, Combo::Miss);
    assert_eq!(payout, 0);
}

#[test]
fn spins_stay_inside_the_symbol_table_and_replay_under_a_seed() {
    let cfg = config();
    let mut rng = GameRng::seeded(99);
    for _ in 0..200 {
        let reels = slots::spin(&cfg, &mut rng);
        assert!(reels.iter().all(|&i| i < cfg.symbols.len()));
    }

    let mut a = GameRng::seeded(7);
    let mut b = GameRng::seeded(7);
    for _ in 0..20 {
        assert_eq!(slots::spin(&cfg, &mut a), slots::spin(&cfg, &mut b));
    }
}

#[test]
fn play_reports_net_gain_against_the_stake() {
    let cfg = config();
    let mut rng = GameRng::seeded(3);
    for _ in 0..50 {
        let result = slots::play(&cfg, &mut rng, 40);
        assert_eq!(result.net_gain, result.payout as i64 - 40);
        if result.combo == Combo::Miss {
            assert_eq!(result.payout, 0);
        } else {
            assert!(result.payout > 0);
        }
    }
}
