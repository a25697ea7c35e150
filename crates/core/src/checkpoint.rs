//! Checkpoint crossings and the speed-limit penalty.
//!
//! `assess` is pure: the same position, movement, table and stamina count
//! always produce the same verdict. `resolve_checkpoint` applies a verdict
//! to a participant.

use crate::{ConfigError, Participant, RaceConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkpoint {
    pub threshold: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CheckpointTable {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointTable {
    pub fn new(pairs: &[(u32, u32)]) -> Result<Self, ConfigError> {
        let mut checkpoints: Vec<Checkpoint> = pairs
            .iter()
            .map(|(threshold, limit)| Checkpoint {
                threshold: *threshold,
                limit: *limit,
            })
            .collect();
        checkpoints.sort_by_key(|checkpoint| checkpoint.threshold);
        let table = Self { checkpoints };
        table.validate_entries()?;
        Ok(table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn limit_at(&self, threshold: u32) -> Option<u32> {
        self.checkpoints
            .iter()
            .find(|checkpoint| checkpoint.threshold == threshold)
            .map(|checkpoint| checkpoint.limit)
    }

    /// First checkpoint in `(position, position + movement]`, lowest
    /// threshold first.
    pub fn first_crossing(&self, position: u32, movement: u32) -> Option<Checkpoint> {
        let end = position.saturating_add(movement);
        self.checkpoints
            .iter()
            .filter(|checkpoint| position < checkpoint.threshold && checkpoint.threshold <= end)
            .min_by_key(|checkpoint| checkpoint.threshold)
            .copied()
    }

    pub fn validate(&self, course_length: u32) -> Result<(), ConfigError> {
        self.validate_entries()?;
        for checkpoint in &self.checkpoints {
            if checkpoint.threshold == 0 || checkpoint.threshold > course_length {
                return Err(ConfigError::CheckpointOutOfCourse {
                    threshold: checkpoint.threshold,
                    course_length,
                });
            }
        }
        Ok(())
    }

    fn validate_entries(&self) -> Result<(), ConfigError> {
        let mut seen = Vec::with_capacity(self.checkpoints.len());
        for checkpoint in &self.checkpoints {
            if checkpoint.limit == 0 {
                return Err(ConfigError::ZeroCheckpointLimit {
                    threshold: checkpoint.threshold,
                });
            }
            if seen.contains(&checkpoint.threshold) {
                return Err(ConfigError::DuplicateCheckpoint {
                    threshold: checkpoint.threshold,
                });
            }
            seen.push(checkpoint.threshold);
        }
        Ok(())
    }
}

impl Default for CheckpointTable {
    fn default() -> Self {
        Self {
            checkpoints: vec![
                Checkpoint {
                    threshold: 25,
                    limit: 7,
                },
                Checkpoint {
                    threshold: 50,
                    limit: 7,
                },
                Checkpoint {
                    threshold: 75,
                    limit: 6,
                },
                Checkpoint {
                    threshold: 87,
                    limit: 5,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Outcome {
    Passed,
    Tired,
    Crab,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Tired => "Tired",
            Self::Crab => "Crab",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub outcome: Outcome,
    pub crossing: Option<Checkpoint>,
    pub excess: u32,
    pub position: u32,
    /// Stamina leaving the pile: the excess when tired, everything on a crab.
    pub stamina_cost: u32,
}

pub fn assess(
    position: u32,
    movement: u32,
    table: &CheckpointTable,
    stamina: u32,
    course_length: u32,
) -> Assessment {
    let advanced = position.saturating_add(movement).min(course_length);
    let crossing = table.first_crossing(position, movement);
    let Some(checkpoint) = crossing else {
        return Assessment {
            outcome: Outcome::Passed,
            crossing,
            excess: 0,
            position: advanced,
            stamina_cost: 0,
        };
    };
    if movement <= checkpoint.limit {
        return Assessment {
            outcome: Outcome::Passed,
            crossing,
            excess: 0,
            position: advanced,
            stamina_cost: 0,
        };
    }
    let excess = movement - checkpoint.limit;
    if stamina > excess {
        Assessment {
            outcome: Outcome::Tired,
            crossing,
            excess,
            position: advanced,
            stamina_cost: excess,
        }
    } else {
        Assessment {
            outcome: Outcome::Crab,
            crossing,
            excess,
            position: checkpoint.threshold - 1,
            stamina_cost: stamina,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckpointReport {
    pub outcome: Outcome,
    pub threshold: Option<u32>,
    pub limit: Option<u32>,
    pub movement: u32,
    pub from: u32,
    pub to: u32,
    pub stamina_paid: u32,
    pub friction_added: usize,
    pub stamina_debt: u32,
}

pub fn resolve_checkpoint(
    participant: &mut Participant,
    movement: u32,
    config: &RaceConfig,
) -> CheckpointReport {
    let from = participant.position;
    let stamina = participant.store.stamina();
    let assessment = assess(
        from,
        movement,
        &config.checkpoints,
        stamina,
        config.course_length,
    );
    let mut report = CheckpointReport {
        outcome: assessment.outcome,
        threshold: assessment.crossing.map(|checkpoint| checkpoint.threshold),
        limit: assessment.crossing.map(|checkpoint| checkpoint.limit),
        movement,
        from,
        to: assessment.position,
        stamina_paid: 0,
        friction_added: 0,
        stamina_debt: 0,
    };
    match assessment.outcome {
        Outcome::Passed => {
            participant.stats.passed += u32::from(assessment.crossing.is_some());
        }
        Outcome::Tired => {
            let payment = participant.store.spend_stamina(assessment.stamina_cost);
            report.stamina_paid = payment.paid;
            participant.stats.tired += 1;
            participant.stats.stamina_spent += payment.paid;
        }
        Outcome::Crab => {
            let rate = participant.rate;
            report.stamina_paid = participant.store.wipe_stamina();
            let penalty = config.crab_penalty(rate);
            // the pile is already empty, so the whole penalty becomes debt
            report.stamina_debt = penalty.saturating_sub(participant.store.stamina());
            report.friction_added = config.crab_friction_cards(rate);
            participant.store.add_friction(report.friction_added);
            participant.rate = config.min_rate;
            participant.caught_penalty = true;
            participant.stats.crabs += 1;
            participant.stats.stamina_debt += report.stamina_debt;
            log::debug!(
                "{} caught a crab at {} (rate {rate}, excess {})",
                participant.name(),
                assessment.position + 1,
                assessment.excess
            );
        }
    }
    participant.position = assessment.position;
    report
}
