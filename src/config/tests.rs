//! Tests for the configuration module.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::loader::overrides_from;
use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let config = EngineConfig::default();
    assert_eq!(config.board_size, 12);
    assert_eq!(config.cache_capacity, 200_000);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.seed, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_difficulty_defaults() {
    let config = EngineConfig::default();

    let easy = config.difficulty(Difficulty::Easy);
    assert_eq!(easy.search_depth, 1);
    assert_eq!(easy.candidate_limit, 22);
    assert!(easy.forced_block_probability.abs() < f64::EPSILON);
    assert!(!easy.iterative_deepening);
    assert!((easy.time_budget().as_secs_f64() - 0.6).abs() < 1e-9);

    let medium = config.difficulty(Difficulty::Medium);
    assert_eq!(medium.search_depth, 2);
    assert!((medium.forced_block_probability - 0.8).abs() < f64::EPSILON);
    assert!(!medium.iterative_deepening);

    let hard = config.difficulty(Difficulty::Hard);
    assert_eq!(hard.search_depth, 5);
    assert!((hard.forced_block_probability - 1.0).abs() < f64::EPSILON);
    assert!(hard.iterative_deepening);
}

#[test]
fn test_parse_difficulty() {
    assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
    assert_eq!(" Medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
    assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert_eq!(
        "nightmare".parse::<Difficulty>(),
        Err(EngineError::UnknownMode("nightmare".into()))
    );
    assert_eq!(Difficulty::Hard.to_string(), "hard");
}

#[test]
fn test_toml_partial_override() {
    let config: EngineConfig = toml::from_str(
        r#"
        board_size = 15
        seed = 7

        [hard]
        search_depth = 4
        time_budget_secs = 2.5
        candidate_limit = 12
        forced_block_probability = 1.0
        iterative_deepening = true
        "#,
    )
    .unwrap();

    assert_eq!(config.board_size, 15);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.cache_capacity, 200_000);
    assert_eq!(config.hard.search_depth, 4);
    assert_eq!(config.hard.time_budget(), Duration::from_millis(2500));
    assert_eq!(config.easy, DifficultyConfig::easy());
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = EngineConfig {
        board_size: 4,
        ..EngineConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    config.board_size = 12;
    config.cache_capacity = 0;
    assert!(config.validate().is_err());

    config.cache_capacity = 10;
    config.medium.forced_block_probability = 1.5;
    assert!(config.validate().is_err());

    config.medium = DifficultyConfig::medium();
    config.easy.search_depth = 0;
    assert!(config.validate().is_err());

    config.easy = DifficultyConfig::easy();
    config.hard.time_budget_secs = f64::NAN;
    assert!(config.validate().is_err());

    config.hard = DifficultyConfig::hard();
    config.hard.candidate_limit = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_env_overrides() {
    let config = overrides_from(
        EngineConfig::default(),
        lookup(&[
            ("CARO_BOARD_SIZE", "15"),
            ("CARO_CACHE_CAPACITY", "5000"),
            ("CARO_LOG_LEVEL", "debug"),
            ("CARO_SEED", "42"),
        ]),
    );
    assert_eq!(config.board_size, 15);
    assert_eq!(config.cache_capacity, 5000);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.seed, Some(42));
}

#[test]
fn test_env_override_ignores_garbage() {
    let config = overrides_from(
        EngineConfig::default(),
        lookup(&[("CARO_BOARD_SIZE", "twelve")]),
    );
    assert_eq!(config.board_size, 12);
}

#[test]
fn test_load_from_missing_path() {
    let err = load_from_path(Path::new("/nonexistent/caro.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_load_from_path_parse_error() {
    let path = std::env::temp_dir().join(format!("caro-config-test-{}.toml", std::process::id()));
    std::fs::write(&path, "board_size = \"big\"").unwrap();
    let err = load_from_path(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
