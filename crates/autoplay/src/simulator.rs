use crate::{HarnessConfig, HarnessError, HarnessReport, RiskCounts, RiskRow, SummaryStats};
use pacerace_core::{
    CheckpointTable, Headless, Outcome, Race, RaceConfig, RaceEvent, RngState,
};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

/// Checkpoint outcomes of a single race, keyed by threshold. Built only from
/// the events the race emits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceTally {
    pub rounds: u32,
    pub participants: usize,
    pub by_threshold: BTreeMap<u32, RiskCounts>,
    caught: HashSet<(u32, String)>,
}

impl RaceTally {
    pub fn record(&mut self, event: &RaceEvent) {
        let RaceEvent::Checkpoint {
            name,
            outcome,
            threshold: Some(threshold),
            ..
        } = event
        else {
            return;
        };
        let counts = self.by_threshold.entry(*threshold).or_default();
        match outcome {
            Outcome::Passed => counts.passed += 1,
            Outcome::Tired => counts.tired += 1,
            Outcome::Crab => {
                counts.crabs += 1;
                if self.caught.insert((*threshold, name.clone())) {
                    counts.caught += 1;
                }
            }
        }
    }
}

/// Draws one limit per location from the candidates.
pub fn random_table(
    locations: &[u32],
    limits: &[u32],
    rng: &mut RngState,
) -> Result<CheckpointTable, HarnessError> {
    if limits.is_empty() {
        return Err(HarnessError::Config("no candidate limits".to_string()));
    }
    if locations.is_empty() {
        return Err(HarnessError::Config("no checkpoint locations".to_string()));
    }
    let pairs: Vec<(u32, u32)> = locations
        .iter()
        .map(|location| {
            let index = rng.pick_index(limits.len()).unwrap_or(0);
            (*location, limits[index])
        })
        .collect();
    Ok(CheckpointTable::new(&pairs)?)
}

/// Runs a policy-only race to completion and tallies its checkpoint events.
pub fn run_race(config: &RaceConfig, seed: u64) -> Result<RaceTally, HarnessError> {
    let mut race = Race::new(config.clone(), &[], seed)?;
    let mut tally = RaceTally::default();
    while !race.is_over() {
        let report = race.play_round(&mut Headless)?;
        for event in &report.events {
            tally.record(event);
        }
    }
    tally.rounds = race.round();
    tally.participants = race.participants().count();
    Ok(tally)
}

#[derive(Debug)]
pub struct Simulator {
    pub config: HarnessConfig,
    rng: RngState,
}

impl Simulator {
    pub fn new(config: HarnessConfig) -> Self {
        let rng = RngState::from_seed(config.seed);
        Self { config, rng }
    }

    pub fn run(&mut self) -> Result<HarnessReport, HarnessError> {
        let started = Instant::now();
        self.config.race.validate()?;
        let mut counts: BTreeMap<(u32, u32), RiskCounts> = BTreeMap::new();
        let mut total_rounds = 0u64;

        for table_index in 0..self.config.tables {
            let table = random_table(
                &self.config.locations,
                &self.config.candidate_limits,
                &mut self.rng,
            )?;
            let race_config = RaceConfig {
                checkpoints: table.clone(),
                ..self.config.race.clone()
            };
            race_config
                .validate()
                .map_err(|err| HarnessError::Config(format!("table {table_index}: {err}")))?;
            log::debug!("table {table_index}: {:?}", table);

            for checkpoint in table.iter() {
                let entry = counts
                    .entry((checkpoint.threshold, checkpoint.limit))
                    .or_default();
                entry.exposures += u64::from(self.config.batch) * race_config.lanes as u64;
            }
            for _ in 0..self.config.batch {
                let seed = self.rng.next_u64();
                let tally = run_race(&race_config, seed)?;
                total_rounds += u64::from(tally.rounds);
                for (threshold, race_counts) in &tally.by_threshold {
                    let Some(limit) = table.limit_at(*threshold) else {
                        continue;
                    };
                    counts
                        .entry((*threshold, limit))
                        .or_default()
                        .absorb(race_counts);
                }
            }
        }

        let mut rows = Vec::new();
        let mut locations = self.config.locations.clone();
        locations.sort_unstable();
        locations.dedup();
        let mut limits = self.config.candidate_limits.clone();
        limits.sort_unstable();
        limits.dedup();
        for location in &locations {
            for limit in &limits {
                let entry = counts.get(&(*location, *limit)).copied().unwrap_or_default();
                rows.push(RiskRow::new(*location, *limit, entry));
            }
        }

        let races = self.config.races();
        log::info!(
            "harness finished: {races} races over {} tables",
            self.config.tables
        );
        Ok(HarnessReport {
            seed: self.config.seed,
            tables: self.config.tables,
            batch: self.config.batch,
            races,
            rows,
            summary: SummaryStats {
                total_rounds,
                wall_time_ms: started.elapsed().as_millis() as u64,
            },
        })
    }
}
