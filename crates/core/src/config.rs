use crate::{Card, CheckpointTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("rate range {min}..={max} is empty")]
    EmptyRateRange { min: u8, max: u8 },
    #[error("cards_per_rate has {found} entries, rate range needs {expected}")]
    CardsPerRateMismatch { expected: usize, found: usize },
    #[error("rate {rate} requires zero cards")]
    ZeroCardsRequired { rate: u8 },
    #[error("rate {rate} requires fewer cards than the rate below it")]
    DecreasingCardsPerRate { rate: u8 },
    #[error("hand limit must be positive")]
    ZeroHandLimit,
    #[error("course length must be positive")]
    ZeroCourseLength,
    #[error("starting deck has no playable cards")]
    EmptyDeck,
    #[error("pace card value must be positive")]
    ZeroPaceCard,
    #[error("checkpoint at {threshold} lies outside the course (1..={course_length})")]
    CheckpointOutOfCourse { threshold: u32, course_length: u32 },
    #[error("checkpoint at {threshold} has a zero speed limit")]
    ZeroCheckpointLimit { threshold: u32 },
    #[error("checkpoint at {threshold} is listed twice")]
    DuplicateCheckpoint { threshold: u32 },
    #[error("probability {value} for {field} is outside [0, 1]")]
    InvalidProbability { field: String, value: f64 },
    #[error("wildcard range {min}..={max} is empty")]
    EmptyWildcardRange { min: u32, max: u32 },
    #[error("{identities} identities cannot fill {lanes} lanes")]
    NotEnoughIdentities { identities: usize, lanes: usize },
    #[error("lane count must be positive")]
    ZeroLanes,
    #[error("crab_stamina_penalty has {found} entries, rate range needs {expected}")]
    CrabPenaltyMismatch { expected: usize, found: usize },
    #[error("unknown identity: {0}")]
    UnknownIdentity(String),
    #[error("identity chosen twice: {0}")]
    DuplicateIdentity(String),
    #[error("{chosen} participants chosen but only {lanes} lanes exist")]
    TooManyParticipants { chosen: usize, lanes: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub color: String,
}

impl Identity {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeckRule {
    pub pace_values: Vec<u8>,
    pub instability: usize,
    pub stamina: usize,
}

impl DeckRule {
    pub fn draw_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self.pace_values.iter().map(|v| Card::Pace(*v)).collect();
        cards.extend(std::iter::repeat(Card::Instability).take(self.instability));
        cards
    }
}

impl Default for DeckRule {
    fn default() -> Self {
        Self {
            pace_values: vec![1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3],
            instability: 3,
            stamina: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AggressionProfile {
    pub location: u32,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyRule {
    pub aggression: Vec<AggressionProfile>,
    pub default_aggression: f64,
    /// Stamina that must remain after a risky payment before `near_finish`.
    pub safety_buffer: u32,
    /// Fraction of the course after which the policy turns reckless.
    pub near_finish: f64,
    pub low_stamina_below: u32,
    pub low_stamina_factor: f64,
    pub motivation_probability: f64,
    pub motivation_threshold: u32,
    pub motivation_threshold_near_finish: u32,
    /// Fewer stamina than this with a fatigue card in hand keeps the rate low.
    pub fatigue_guard: u32,
}

impl Default for PolicyRule {
    fn default() -> Self {
        Self {
            aggression: vec![
                AggressionProfile {
                    location: 25,
                    probability: 0.10,
                },
                AggressionProfile {
                    location: 50,
                    probability: 0.20,
                },
                AggressionProfile {
                    location: 75,
                    probability: 0.40,
                },
                AggressionProfile {
                    location: 85,
                    probability: 0.85,
                },
            ],
            default_aggression: 0.40,
            safety_buffer: 2,
            near_finish: 0.8,
            low_stamina_below: 4,
            low_stamina_factor: 0.6,
            motivation_probability: 0.5,
            motivation_threshold: 4,
            motivation_threshold_near_finish: 1,
            fatigue_guard: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BonusRule {
    pub catch_up: u32,
    pub catch_up_count: usize,
    pub drafting: u32,
    pub drafting_cost: u32,
    pub drafting_gap: u32,
}

impl Default for BonusRule {
    fn default() -> Self {
        Self {
            catch_up: 1,
            catch_up_count: 2,
            drafting: 2,
            drafting_cost: 1,
            drafting_gap: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RaceConfig {
    pub course_length: u32,
    pub lanes: usize,
    pub hand_limit: usize,
    pub min_rate: u8,
    pub max_rate: u8,
    /// Playable cards required per turn, indexed by `rate - min_rate`.
    pub cards_per_rate: Vec<usize>,
    pub deck: DeckRule,
    pub wildcard_min: u32,
    pub wildcard_max: u32,
    pub wildcard_estimate: u32,
    pub checkpoints: CheckpointTable,
    /// Stamina debt recorded on a crab, indexed by `rate - min_rate`.
    pub crab_stamina_penalty: Vec<u32>,
    pub recovery_per_round: usize,
    pub policy: PolicyRule,
    pub bonus: BonusRule,
    pub identities: Vec<Identity>,
    pub max_rounds: u32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            course_length: 100,
            lanes: 6,
            hand_limit: 7,
            min_rate: 0,
            max_rate: 2,
            cards_per_rate: vec![1, 2, 4],
            deck: DeckRule::default(),
            wildcard_min: 1,
            wildcard_max: 2,
            wildcard_estimate: 2,
            checkpoints: CheckpointTable::default(),
            crab_stamina_penalty: vec![1, 1, 2],
            recovery_per_round: 2,
            policy: PolicyRule::default(),
            bonus: BonusRule::default(),
            identities: default_identities(),
            max_rounds: 500,
        }
    }
}

pub fn default_identities() -> Vec<Identity> {
    vec![
        Identity::new("Black", "black"),
        Identity::new("Red", "red"),
        Identity::new("Green", "green"),
        Identity::new("Brown", "brown"),
        Identity::new("Blue", "blue"),
        Identity::new("Purple", "purple"),
        Identity::new("Cyan", "cyan"),
        Identity::new("Yellow", "yellow"),
    ]
}

impl RaceConfig {
    pub fn rate_levels(&self) -> usize {
        usize::from(self.max_rate.saturating_sub(self.min_rate)) + 1
    }

    pub fn rate_in_range(&self, rate: u8) -> bool {
        (self.min_rate..=self.max_rate).contains(&rate)
    }

    pub fn cards_required(&self, rate: u8) -> usize {
        let offset = usize::from(rate.saturating_sub(self.min_rate));
        self.cards_per_rate
            .get(offset)
            .or_else(|| self.cards_per_rate.last())
            .copied()
            .unwrap_or(1)
    }

    pub fn crab_penalty(&self, rate: u8) -> u32 {
        let offset = usize::from(rate.saturating_sub(self.min_rate));
        self.crab_stamina_penalty
            .get(offset)
            .or_else(|| self.crab_stamina_penalty.last())
            .copied()
            .unwrap_or(0)
    }

    /// Friction cards dealt into the hand when a crab happens at `rate`.
    pub fn crab_friction_cards(&self, rate: u8) -> usize {
        if rate <= self.min_rate.saturating_add(1) {
            1
        } else {
            2
        }
    }

    pub fn near_finish_mark(&self) -> u32 {
        (f64::from(self.course_length) * self.policy.near_finish).round() as u32
    }

    pub fn aggression_for(&self, threshold: u32) -> f64 {
        self.policy
            .aggression
            .iter()
            .filter(|profile| profile.location <= threshold)
            .max_by_key(|profile| profile.location)
            .map(|profile| profile.probability)
            .unwrap_or(self.policy.default_aggression)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rate > self.max_rate {
            return Err(ConfigError::EmptyRateRange {
                min: self.min_rate,
                max: self.max_rate,
            });
        }
        let levels = self.rate_levels();
        if self.cards_per_rate.len() != levels {
            return Err(ConfigError::CardsPerRateMismatch {
                expected: levels,
                found: self.cards_per_rate.len(),
            });
        }
        if let Some(offset) = self.cards_per_rate.iter().position(|count| *count == 0) {
            return Err(ConfigError::ZeroCardsRequired {
                rate: self.min_rate + offset as u8,
            });
        }
        if let Some(offset) = self
            .cards_per_rate
            .windows(2)
            .position(|pair| pair[1] < pair[0])
        {
            return Err(ConfigError::DecreasingCardsPerRate {
                rate: self.min_rate + offset as u8 + 1,
            });
        }
        if self.crab_stamina_penalty.len() != levels {
            return Err(ConfigError::CrabPenaltyMismatch {
                expected: levels,
                found: self.crab_stamina_penalty.len(),
            });
        }
        if self.hand_limit == 0 {
            return Err(ConfigError::ZeroHandLimit);
        }
        if self.course_length == 0 {
            return Err(ConfigError::ZeroCourseLength);
        }
        if self.lanes == 0 {
            return Err(ConfigError::ZeroLanes);
        }
        if self.deck.pace_values.contains(&0) {
            return Err(ConfigError::ZeroPaceCard);
        }
        if self.deck.pace_values.is_empty() && self.deck.instability == 0 {
            return Err(ConfigError::EmptyDeck);
        }
        if self.wildcard_min == 0 || self.wildcard_min > self.wildcard_max {
            return Err(ConfigError::EmptyWildcardRange {
                min: self.wildcard_min,
                max: self.wildcard_max,
            });
        }
        self.checkpoints.validate(self.course_length)?;
        let policy = &self.policy;
        let mut probabilities = vec![
            ("default_aggression".to_string(), policy.default_aggression),
            ("low_stamina_factor".to_string(), policy.low_stamina_factor),
            (
                "motivation_probability".to_string(),
                policy.motivation_probability,
            ),
            ("near_finish".to_string(), policy.near_finish),
        ];
        for profile in &policy.aggression {
            probabilities.push((format!("aggression@{}", profile.location), profile.probability));
        }
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { field, value });
            }
        }
        let unique: HashSet<&str> = self.identities.iter().map(|id| id.name.as_str()).collect();
        if unique.len() < self.lanes {
            return Err(ConfigError::NotEnoughIdentities {
                identities: unique.len(),
                lanes: self.lanes,
            });
        }
        Ok(())
    }
}
