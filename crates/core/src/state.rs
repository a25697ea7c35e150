use crate::{Card, CardStore, Identity, RaceConfig, RngState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Control {
    Human,
    Policy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaceStats {
    pub passed: u32,
    pub tired: u32,
    pub crabs: u32,
    pub clustered: u32,
    pub stamina_spent: u32,
    pub stamina_debt: u32,
    pub bonuses: u32,
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub identity: Identity,
    pub lane: usize,
    pub control: Control,
    pub position: u32,
    pub rate: u8,
    pub finished: bool,
    pub caught_penalty: bool,
    /// Completed turns. Skipped turns do not count.
    pub round: u32,
    pub store: CardStore,
    pub stats: RaceStats,
}

impl Participant {
    pub fn new(
        identity: Identity,
        lane: usize,
        control: Control,
        config: &RaceConfig,
        rng: &mut RngState,
    ) -> Self {
        Self {
            identity,
            lane,
            control,
            position: 0,
            rate: config.min_rate,
            finished: false,
            caught_penalty: false,
            round: 0,
            store: CardStore::new(&config.deck, rng),
            stats: RaceStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn is_human(&self) -> bool {
        self.control == Control::Human
    }

    pub fn mark_finished(&mut self, course_length: u32) -> bool {
        if !self.finished && self.position >= course_length {
            self.finished = true;
            return true;
        }
        false
    }

    /// Adds `amount` to the position without passing the course end.
    pub fn advance(&mut self, amount: u32, course_length: u32) -> u32 {
        let before = self.position;
        self.position = self.position.saturating_add(amount).min(course_length);
        self.position - before
    }

    pub fn snapshot(&self) -> ParticipantView {
        ParticipantView {
            name: self.identity.name.clone(),
            color: self.identity.color.clone(),
            lane: self.lane,
            control: self.control,
            position: self.position,
            rate: self.rate,
            finished: self.finished,
            caught_penalty: self.caught_penalty,
            round: self.round,
            hand: self.store.hand.clone(),
            stamina: self.store.stamina(),
            draw_pile: self.store.draw.len(),
            discard_pile: self.store.discard.len(),
            stats: self.stats,
        }
    }
}

/// Read-only copy of one participant for presenters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipantView {
    pub name: String,
    pub color: String,
    pub lane: usize,
    pub control: Control,
    pub position: u32,
    pub rate: u8,
    pub finished: bool,
    pub caught_penalty: bool,
    pub round: u32,
    pub hand: Vec<Card>,
    pub stamina: u32,
    pub draw_pile: usize,
    pub discard_pile: usize,
    pub stats: RaceStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    pub round: u32,
    pub course_length: u32,
    pub checkpoints: Vec<(u32, u32)>,
    pub participants: Vec<ParticipantView>,
}
