mod plain;

use anyhow::{bail, Context, Result};
use pacerace_autoplay::{write_json, write_text, HarnessConfig, Simulator};
use pacerace_core::{
    choose_identities, Board, Headless, ParticipantView, Presenter, Prompt, PromptError, Race,
    RaceError, RaceEvent,
};
use pacerace_data::load_race_config;
use plain::PlainPresenter;
use std::path::{Path, PathBuf};

const DEFAULT_SEED: u64 = 0xC0FFEE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Auto,
    Stats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    command: Command,
    seed: Option<u64>,
    assets: PathBuf,
    plain: bool,
    humans: Option<Vec<String>>,
    races: Option<u32>,
    batch: Option<u32>,
    out: Option<PathBuf>,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions> {
    let mut command = Command::Play;
    let mut seed = std::env::var("PACERACE_SEED")
        .ok()
        .and_then(|value| value.parse::<u64>().ok());
    let mut assets = PathBuf::from("assets");
    let mut plain = false;
    let mut humans = None;
    let mut races = None;
    let mut batch = None;
    let mut out = None;
    let mut idx = 0usize;
    while idx < args.len() {
        let arg = args[idx].as_str();
        let value = args.get(idx + 1);
        match arg {
            "play" if idx == 0 => command = Command::Play,
            "auto" if idx == 0 => command = Command::Auto,
            "stats" if idx == 0 => command = Command::Stats,
            "--plain" => plain = true,
            "--seed" | "--assets" | "--humans" | "--races" | "--batch" | "--out" => {
                let Some(value) = value else {
                    bail!("{arg} needs a value");
                };
                match arg {
                    "--seed" => {
                        seed = Some(
                            value
                                .parse::<u64>()
                                .with_context(|| format!("invalid seed '{value}'"))?,
                        )
                    }
                    "--assets" => assets = PathBuf::from(value),
                    "--humans" => {
                        humans = Some(
                            value
                                .split(',')
                                .map(str::trim)
                                .filter(|name| !name.is_empty())
                                .map(str::to_string)
                                .collect(),
                        )
                    }
                    "--races" => races = Some(parse_count(arg, value)?),
                    "--batch" => batch = Some(parse_count(arg, value)?),
                    _ => out = Some(PathBuf::from(value)),
                }
                idx += 1;
            }
            other => bail!("unknown argument '{other}'"),
        }
        idx += 1;
    }
    Ok(CliOptions {
        command,
        seed,
        assets,
        plain,
        humans,
        races,
        batch,
        out,
    })
}

fn parse_count(flag: &str, value: &str) -> Result<u32> {
    let count = value
        .parse::<u32>()
        .with_context(|| format!("{flag} expects a positive number, got '{value}'"))?;
    if count == 0 {
        bail!("{flag} must be at least 1");
    }
    Ok(count)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err:#}");
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };
    if options.command == Command::Play && !options.plain {
        let launch = pacerace_cui::LaunchOptions {
            seed: options.seed,
            assets: Some(options.assets.clone()),
        };
        if let Err(err) = pacerace_cui::run(launch) {
            eprintln!("cui launch error: {err:#}");
            std::process::exit(1);
        }
        return;
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let result = match options.command {
        Command::Play => run_plain(&options),
        Command::Auto => run_auto(&options),
        Command::Stats => run_stats(&options),
    };
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn usage() -> &'static str {
    "usage: pacerace [play|auto|stats] [--seed N] [--assets DIR] [--plain] \
     [--humans NAME,...] [--races N] [--batch N] [--out PATH]"
}

fn run_plain(options: &CliOptions) -> Result<()> {
    let config = load_race_config(&options.assets).context("load race config")?;
    let seed = options.seed.unwrap_or(DEFAULT_SEED);
    let mut presenter = PlainPresenter::new(pacerace_cui::METRES_PER_UNIT);
    let humans = match options.humans.clone() {
        Some(humans) => humans,
        None => match choose_identities(&mut presenter, &config.identities, config.lanes) {
            Ok(humans) => humans,
            Err(PromptError::Interrupted) => return Ok(()),
            Err(err) => return Err(err).context("identity selection"),
        },
    };
    let mut race = Race::new(config, &humans, seed).context("start race")?;
    println!("race seed {seed}");
    match race.run(&mut presenter) {
        Ok(standings) => {
            print_standings(&standings, race.round());
            Ok(())
        }
        Err(RaceError::Interrupted) => {
            println!("race abandoned after round {}", race.round());
            Ok(())
        }
        Err(err) => Err(err).context("race failed"),
    }
}

/// Prints every event as it happens; a policy-only race never prompts.
struct EventPrinter;

impl Presenter for EventPrinter {
    fn choose(&mut self, prompt: &Prompt) -> Result<usize, PromptError> {
        Headless.choose(prompt)
    }

    fn show_board(&mut self, _board: &Board) {}

    fn notify(&mut self, event: &RaceEvent) {
        match event {
            RaceEvent::RoundCompleted { .. } => println!("{}", event.describe()),
            _ => println!("  {}", event.describe()),
        }
    }
}

fn run_auto(options: &CliOptions) -> Result<()> {
    let config = load_race_config(&options.assets).context("load race config")?;
    let seed = options.seed.unwrap_or(DEFAULT_SEED);
    let races = options.races.unwrap_or(1);
    for offset in 0..u64::from(races) {
        let race_seed = seed.wrapping_add(offset);
        println!("== race seed {race_seed} ==");
        let mut race = Race::new(config.clone(), &[], race_seed).context("start race")?;
        let standings = race.run(&mut EventPrinter).context("race failed")?;
        print_standings(&standings, race.round());
    }
    Ok(())
}

fn run_stats(options: &CliOptions) -> Result<()> {
    let race = load_race_config(&options.assets).context("load race config")?;
    let mut config = HarnessConfig {
        race,
        ..HarnessConfig::default()
    };
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    if let Some(tables) = options.races {
        config.tables = tables;
    }
    if let Some(batch) = options.batch {
        config.batch = batch;
    }
    log::info!(
        "simulating {} tables x {} races from seed {}",
        config.tables,
        config.batch,
        config.seed
    );
    let report = Simulator::new(config).run().context("run simulation")?;
    println!("{}", report.to_text_report());
    if let Some(out) = options.out.as_deref() {
        write_reports(out, &report)?;
    }
    Ok(())
}

fn write_reports(out: &Path, report: &pacerace_autoplay::HarnessReport) -> Result<()> {
    let json = out.with_extension("json");
    let text = out.with_extension("txt");
    write_json(&json, report).with_context(|| format!("write {}", json.display()))?;
    write_text(&text, report).with_context(|| format!("write {}", text.display()))?;
    println!("reports written to {} and {}", json.display(), text.display());
    Ok(())
}

fn print_standings(standings: &[ParticipantView], rounds: u32) {
    println!("final standings after {rounds} rounds:");
    for (place, participant) in standings.iter().enumerate() {
        println!(
            "{:>2}. {:<7} {:>5}m{}",
            place + 1,
            participant.name,
            participant.position * pacerace_cui::METRES_PER_UNIT,
            if participant.finished { "" } else { " (dnf)" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn play_is_the_default_command() {
        let options = parse_cli_options(&args(&["--plain", "--seed", "9"])).expect("options");
        assert_eq!(options.command, Command::Play);
        assert!(options.plain);
        assert_eq!(options.seed, Some(9));
        assert_eq!(options.assets, PathBuf::from("assets"));
    }

    #[test]
    fn stats_flags_are_parsed() {
        let options = parse_cli_options(&args(&[
            "stats", "--races", "20", "--batch", "3", "--out", "target/risk",
        ]))
        .expect("options");
        assert_eq!(options.command, Command::Stats);
        assert_eq!(options.races, Some(20));
        assert_eq!(options.batch, Some(3));
        assert_eq!(options.out, Some(PathBuf::from("target/risk")));
    }

    #[test]
    fn humans_are_split_on_commas() {
        let options = parse_cli_options(&args(&["play", "--humans", "Red, blue,,"]))
            .expect("options");
        assert_eq!(
            options.humans,
            Some(vec!["Red".to_string(), "blue".to_string()])
        );
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse_cli_options(&args(&["--seed"])).is_err());
        assert!(parse_cli_options(&args(&["--seed", "fast"])).is_err());
        assert!(parse_cli_options(&args(&["--races", "0"])).is_err());
        assert!(parse_cli_options(&args(&["--turbo"])).is_err());
        assert!(parse_cli_options(&args(&["--plain", "stats"])).is_err());
    }

    #[test]
    fn report_paths_share_a_stem() {
        let out = Path::new("target/risk.out");
        assert_eq!(out.with_extension("json"), PathBuf::from("target/risk.json"));
        assert_eq!(out.with_extension("txt"), PathBuf::from("target/risk.txt"));
    }
}
