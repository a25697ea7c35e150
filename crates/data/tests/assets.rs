use pacerace_data::{load_credits, load_race_config, load_rules, RaceConfig};
use std::path::PathBuf;

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

#[test]
fn shipped_config_matches_defaults() {
    let config = load_race_config(&assets_root()).expect("load config");
    assert_eq!(config, RaceConfig::default());
}

#[test]
fn shipped_rules_have_sections() {
    let rules = load_rules(&assets_root()).expect("load rules");
    let titles = rules.titles();
    assert_eq!(titles.first(), Some(&"Objective"));
    assert!(titles.contains(&"Checkpoints"));
    assert!(titles.contains(&"Motivation"));
}

#[test]
fn shipped_credits_are_readable() {
    let credits = load_credits(&assets_root()).expect("load credits");
    assert!(credits.starts_with("Pace Race"));
}
