use crate::schema::{RaceConfig, RuleBook, RuleSection};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const RACE_CONFIG_FILE: &str = "race.json";
pub const RULES_FILE: &str = "rules.txt";
pub const CREDITS_FILE: &str = "credits.txt";

/// Reads `race.json` from `dir`. A missing file yields the built-in
/// defaults; fields absent from the file keep their default values.
pub fn load_race_config(dir: &Path) -> anyhow::Result<RaceConfig> {
    let path = dir.join(RACE_CONFIG_FILE);
    let config: RaceConfig = if path.exists() {
        load_json(&path)?
    } else {
        RaceConfig::default()
    };
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

/// Splits the rules text into sections separated by two blank lines. Each
/// section is titled by its first line with colons removed.
pub fn parse_rules(raw: &str) -> RuleBook {
    let normalized = raw.replace("\r\n", "\n");
    let sections = normalized
        .split("\n\n\n")
        .map(str::trim)
        .filter(|section| !section.is_empty())
        .map(|section| {
            let title = section
                .lines()
                .next()
                .unwrap_or_default()
                .replace(':', "")
                .trim()
                .to_string();
            RuleSection {
                title,
                body: section.to_string(),
            }
        })
        .collect();
    RuleBook { sections }
}

pub fn load_rules(dir: &Path) -> anyhow::Result<RuleBook> {
    let raw = load_text(&dir.join(RULES_FILE))?;
    Ok(parse_rules(&raw))
}

pub fn load_credits(dir: &Path) -> anyhow::Result<String> {
    load_text(&dir.join(CREDITS_FILE))
}

fn load_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
