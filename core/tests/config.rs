//! Configuration defaults, file loading, and validation.

use casino_core::config::CasinoConfig;
use std::fs;

#[test]
fn defaults_describe_the_standard_house() {
    let config = CasinoConfig::default();
    assert_eq!(config.starting_balance, 10_000);
    assert_eq!(config.daily_bonus, 1_000);
    assert_eq!(config.min_stake, 10);
    assert_eq!(config.max_stake, 10_000);
    assert_eq!(config.cooldown_secs.get("game"), Some(&3));
    assert_eq!(config.cooldown_secs.get("daily"), Some(&86_400));
    assert_eq!(config.blackjack.natural_payout, 2.5);
    assert!(config.blackjack.dealer_hits_soft_17);
    assert_eq!(config.slots.symbols.len(), 7);
    assert_eq!(config.roulette.straight_payout, 35);
    assert!(config.validate().is_empty());
}

#[test]
fn partial_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "starting_balance": 500, "min_stake": 5 }"#).unwrap();

    let config = CasinoConfig::from_file(&path).expect("load");
    assert_eq!(config.starting_balance, 500);
    assert_eq!(config.min_stake, 5);
    assert_eq!(config.max_stake, 10_000);
    assert_eq!(config.blackjack.natural_payout, 2.5);
}

#[test]
fn full_roundtrip_through_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    let original = CasinoConfig::default();
    fs::write(&path, serde_json::to_string_pretty(&original).unwrap()).unwrap();

    let loaded = CasinoConfig::from_file(&path).expect("load");
    assert_eq!(loaded.starting_balance, original.starting_balance);
    assert_eq!(loaded.cooldown_secs, original.cooldown_secs);
    assert_eq!(loaded.slots.symbols.len(), original.slots.symbols.len());
}

#[test]
fn validation_flags_broken_limits() {
    let config = CasinoConfig {
        min_stake: 0,
        ..CasinoConfig::default()
    };
    assert!(config.validate().iter().any(|i| i.contains("min_stake")));

    let config = CasinoConfig {
        min_stake: 500,
        max_stake: 100,
        ..CasinoConfig::default()
    };
    assert!(config
        .validate()
        .iter()
        .any(|i| i.contains("less than max_stake")));

    let mut config = CasinoConfig::default();
    config.slots.symbols.clear();
    assert!(!config.validate().is_empty());

    let mut config = CasinoConfig::default();
    config.blackjack.natural_payout = 0.5;
    assert!(config
        .validate()
        .iter()
        .any(|i| i.contains("natural_payout")));
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(CasinoConfig::from_file("/definitely/not/here.json").is_err());
}
