use crate::{Outcome, RateChange, Upkeep};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RaceEvent {
    TurnStarted {
        name: String,
        round: u32,
        position: u32,
        rate: u8,
    },
    HandRefilled {
        name: String,
        drawn: usize,
        reshuffles: usize,
        fallback_cards: usize,
    },
    ClusteredHand {
        name: String,
        required: usize,
        playable: usize,
    },
    RateChanged { name: String, change: RateChange },
    CardsPlayed {
        name: String,
        cards: Vec<String>,
        distance: u32,
    },
    Checkpoint {
        name: String,
        outcome: Outcome,
        threshold: Option<u32>,
        limit: Option<u32>,
        movement: u32,
        from: u32,
        to: u32,
        stamina_paid: u32,
    },
    CardsDiscarded { name: String, count: usize },
    RateUpkeep { name: String, upkeep: Upkeep },
    CatchUp { name: String, from: u32, to: u32 },
    Drafting {
        name: String,
        ahead: String,
        from: u32,
        to: u32,
    },
    DraftingDeclined { name: String, ahead: String },
    Finished { name: String, round: u32 },
    RoundCompleted { round: u32 },
    RaceFinished { rounds: u32, podium: Vec<String> },
}

impl RaceEvent {
    pub fn describe(&self) -> String {
        match self {
            Self::TurnStarted {
                name,
                round,
                position,
                rate,
            } => format!("{name}: turn {round} at {position} (rate {rate})"),
            Self::HandRefilled {
                name,
                drawn,
                reshuffles,
                fallback_cards,
            } => {
                let mut line = format!("{name} drew {drawn}");
                if *reshuffles > 0 {
                    line.push_str(" after reshuffling");
                }
                if *fallback_cards > 0 {
                    line.push_str(&format!(" ({fallback_cards} fallback)"));
                }
                line
            }
            Self::ClusteredHand {
                name,
                required,
                playable,
            } => format!("{name} has a cluttered hand ({playable}/{required} playable), stalled"),
            Self::RateChanged { name, change } => match change {
                RateChange::Unchanged => format!("{name} holds the rate"),
                RateChange::Shifted { from, to } => format!("{name} shifts rate {from} -> {to}"),
                RateChange::Jumped { from, to } => {
                    format!("{name} jumps rate {from} -> {to} for 1 stamina")
                }
                RateChange::JumpFailed { from, target } => {
                    format!("{name} failed to jump {from} -> {target}: no stamina")
                }
            },
            Self::CardsPlayed {
                name,
                cards,
                distance,
            } => format!("{name} plays [{}] for {distance}", cards.join(", ")),
            Self::Checkpoint {
                name,
                outcome,
                threshold,
                limit,
                from,
                to,
                stamina_paid,
                ..
            } => match (threshold, limit) {
                (Some(threshold), Some(limit)) => format!(
                    "{name} {} checkpoint {threshold} (limit {limit}): {from} -> {to}, stamina -{stamina_paid}",
                    outcome.label()
                ),
                _ => format!("{name} moves {from} -> {to}"),
            },
            Self::CardsDiscarded { name, count } => format!("{name} discards {count}"),
            Self::RateUpkeep { name, upkeep } => match upkeep {
                Upkeep::None => format!("{name} keeps pace"),
                Upkeep::Recovered(count) => format!("{name} recovers {count} stamina"),
                Upkeep::Paid => format!("{name} pays 1 stamina to hold the sprint"),
                Upkeep::ForcedToMinimum => format!("{name} is out of stamina and eases off"),
            },
            Self::CatchUp { name, from, to } => format!("Change of Tides: {name} {from} -> {to}"),
            Self::Drafting {
                name,
                ahead,
                from,
                to,
            } => format!("Motivation: {name} drafts {ahead}, {from} -> {to}"),
            Self::DraftingDeclined { name, ahead } => {
                format!("{name} holds position behind {ahead}")
            }
            Self::Finished { name, round } => format!("{name} finished in round {round}"),
            Self::RoundCompleted { round } => format!("round {round} complete"),
            Self::RaceFinished { rounds, podium } => {
                format!("race over after {rounds} rounds: {}", podium.join(", "))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<RaceEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: RaceEvent) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RaceEvent> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
