//! Risk-weighted choices for policy-driven participants.

use crate::{Card, Participant, RaceConfig, RngState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCandidate {
    pub rate: u8,
    pub estimate: u32,
    pub threshold: Option<u32>,
    pub limit: Option<u32>,
}

impl RateCandidate {
    pub fn is_safe(&self) -> bool {
        match self.limit {
            Some(limit) => self.estimate <= limit,
            None => true,
        }
    }
}

/// Indices of the playable hand cards, best first.
pub fn ranked_playable(hand: &[Card], config: &RaceConfig) -> Vec<usize> {
    let mut indices: Vec<usize> = hand
        .iter()
        .enumerate()
        .filter(|(_, card)| card.is_playable())
        .map(|(index, _)| index)
        .collect();
    indices.sort_by(|a, b| {
        let left = hand[*a].estimate(config.wildcard_estimate);
        let right = hand[*b].estimate(config.wildcard_estimate);
        right.cmp(&left)
    });
    indices
}

pub fn choose_cards(hand: &[Card], required: usize, config: &RaceConfig) -> Vec<usize> {
    ranked_playable(hand, config)
        .into_iter()
        .take(required)
        .collect()
}

/// Estimated distance for `rate`, or None when the hand cannot cover its
/// required card count.
pub fn estimate_for_rate(hand: &[Card], rate: u8, config: &RaceConfig) -> Option<u32> {
    let required = config.cards_required(rate);
    let ranked = ranked_playable(hand, config);
    if ranked.len() < required {
        return None;
    }
    Some(
        ranked
            .iter()
            .take(required)
            .map(|index| hand[*index].estimate(config.wildcard_estimate))
            .sum(),
    )
}

pub fn rate_candidates(participant: &Participant, config: &RaceConfig) -> Vec<RateCandidate> {
    let hand = &participant.store.hand;
    (config.min_rate..=config.max_rate)
        .rev()
        .filter_map(|rate| {
            let estimate = match estimate_for_rate(hand, rate, config) {
                Some(estimate) => estimate,
                None if rate == config.min_rate => 0,
                None => return None,
            };
            let crossing = config
                .checkpoints
                .first_crossing(participant.position, estimate);
            Some(RateCandidate {
                rate,
                estimate,
                threshold: crossing.map(|checkpoint| checkpoint.threshold),
                limit: crossing.map(|checkpoint| checkpoint.limit),
            })
        })
        .collect()
}

pub fn safety_buffer(position: u32, config: &RaceConfig) -> u32 {
    if position < config.near_finish_mark() {
        config.policy.safety_buffer
    } else {
        0
    }
}

pub fn choose_rate(participant: &Participant, config: &RaceConfig, rng: &mut RngState) -> u8 {
    let stamina = participant.store.stamina();
    if stamina == 0 {
        return config.min_rate;
    }
    let fatigued = participant.store.hand.contains(&Card::Stamina);
    if fatigued && stamina < config.policy.fatigue_guard {
        return config.min_rate;
    }

    let buffer = safety_buffer(participant.position, config);
    let mut best_safe = config.min_rate;
    let mut best_risky: Option<RateCandidate> = None;
    for candidate in rate_candidates(participant, config) {
        if candidate.is_safe() {
            best_safe = best_safe.max(candidate.rate);
            continue;
        }
        let limit = candidate.limit.unwrap_or(candidate.estimate);
        let cost = candidate.estimate.saturating_sub(limit).max(1);
        if stamina.saturating_sub(cost) < buffer || cost > stamina {
            continue;
        }
        if best_risky.map_or(true, |best| candidate.rate > best.rate) {
            best_risky = Some(candidate);
        }
    }

    let Some(risky) = best_risky.filter(|risky| risky.rate > best_safe) else {
        return best_safe;
    };
    let base = risky
        .threshold
        .map(|threshold| config.aggression_for(threshold))
        .unwrap_or(config.policy.default_aggression);
    let factor = if stamina >= config.policy.low_stamina_below {
        1.0
    } else {
        config.policy.low_stamina_factor
    };
    if rng.chance(base * factor) {
        log::debug!(
            "{} risks rate {} at checkpoint {:?}",
            participant.name(),
            risky.rate,
            risky.threshold
        );
        return risky.rate;
    }
    best_safe
}

pub fn motivation_threshold(position: u32, config: &RaceConfig) -> u32 {
    if position > config.near_finish_mark() {
        config.policy.motivation_threshold_near_finish
    } else {
        config.policy.motivation_threshold
    }
}

pub fn choose_motivation(participant: &Participant, config: &RaceConfig, rng: &mut RngState) -> bool {
    let threshold = motivation_threshold(participant.position, config);
    if participant.store.stamina() < threshold {
        return false;
    }
    rng.chance(config.policy.motivation_probability)
}
