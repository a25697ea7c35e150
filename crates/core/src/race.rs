use crate::{
    Board, CheckpointReport, ConfigError, Control, EventBus, HumanPilot, Participant,
    ParticipantView, Pilot, PolicyPilot, Presenter, PromptError, RaceConfig, RaceEvent, RngState,
};
use thiserror::Error;

mod bonus;
mod roster;
mod turn;

pub use bonus::ranking;
pub use roster::build_roster;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RaceError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("rate {target} is outside {min}..={max}")]
    RateOutOfRange { target: u8, min: u8, max: u8 },
    #[error("choice {index} is outside the {options} offered options")]
    InvalidChoice { index: usize, options: usize },
    #[error("invalid card selection: {0}")]
    InvalidSelection(String),
    #[error("interrupted by user")]
    Interrupted,
    #[error("presenter error: {0}")]
    Presenter(String),
    #[error("race exceeded {0} rounds")]
    RoundLimit(u32),
    #[error("race is already over")]
    RaceOver,
    #[error("race has no participants")]
    EmptyRoster,
}

impl From<PromptError> for RaceError {
    fn from(value: PromptError) -> Self {
        match value {
            PromptError::Interrupted => Self::Interrupted,
            PromptError::Io(message) => Self::Presenter(message),
        }
    }
}

#[derive(Debug)]
pub struct Entrant {
    pub participant: Participant,
    pilot: Box<dyn Pilot>,
}

impl Entrant {
    pub fn new(participant: Participant) -> Self {
        let pilot: Box<dyn Pilot> = match participant.control {
            Control::Human => Box::new(HumanPilot),
            Control::Policy => Box::new(PolicyPilot),
        };
        Self { participant, pilot }
    }

    pub fn with_pilot(participant: Participant, pilot: Box<dyn Pilot>) -> Self {
        Self { participant, pilot }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Skipped { required: usize, playable: usize },
    Moved(CheckpointReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub name: String,
    pub outcome: TurnOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub round: u32,
    pub turns: Vec<TurnReport>,
    pub events: Vec<RaceEvent>,
    pub finished: bool,
}

#[derive(Debug)]
pub struct Race {
    pub config: RaceConfig,
    entrants: Vec<Entrant>,
    pub rng: RngState,
    pub events: EventBus,
    round: u32,
    over: bool,
}

impl Race {
    /// Builds a race from chosen human identities; remaining lanes are
    /// filled with policy-driven participants.
    pub fn new(config: RaceConfig, humans: &[String], seed: u64) -> Result<Self, RaceError> {
        Self::with_rng(config, humans, RngState::from_seed(seed))
    }

    pub fn with_rng(
        config: RaceConfig,
        humans: &[String],
        mut rng: RngState,
    ) -> Result<Self, RaceError> {
        config.validate()?;
        let participants = build_roster(&config, humans, &mut rng)?;
        Self::from_participants(config, participants, rng)
    }

    pub fn from_participants(
        config: RaceConfig,
        participants: Vec<Participant>,
        rng: RngState,
    ) -> Result<Self, RaceError> {
        Self::from_entrants(config, participants.into_iter().map(Entrant::new).collect(), rng)
    }

    pub fn from_entrants(
        config: RaceConfig,
        mut entrants: Vec<Entrant>,
        mut rng: RngState,
    ) -> Result<Self, RaceError> {
        config.validate()?;
        if entrants.is_empty() {
            return Err(RaceError::EmptyRoster);
        }
        for entrant in &mut entrants {
            entrant.participant.store.refill(config.hand_limit, &mut rng);
        }
        log::info!(
            "race ready: {} participants over {} units",
            entrants.len(),
            config.course_length
        );
        Ok(Self {
            config,
            entrants,
            rng,
            events: EventBus::default(),
            round: 0,
            over: false,
        })
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.entrants.iter().map(|entrant| &entrant.participant)
    }

    pub fn participant(&self, index: usize) -> Option<&Participant> {
        self.entrants.get(index).map(|entrant| &entrant.participant)
    }

    pub fn participant_mut(&mut self, index: usize) -> Option<&mut Participant> {
        self.entrants
            .get_mut(index)
            .map(|entrant| &mut entrant.participant)
    }

    pub fn board(&self) -> Board {
        Board {
            round: self.round,
            course_length: self.config.course_length,
            checkpoints: self
                .config
                .checkpoints
                .iter()
                .map(|checkpoint| (checkpoint.threshold, checkpoint.limit))
                .collect(),
            participants: self.participants().map(Participant::snapshot).collect(),
        }
    }

    /// Participants ordered by position, then rate, leader first.
    pub fn standings(&self) -> Vec<ParticipantView> {
        let participants: Vec<&Participant> = self.participants().collect();
        let keys: Vec<(u32, u8)> = participants
            .iter()
            .map(|participant| (participant.position, participant.rate))
            .collect();
        ranking(&keys)
            .into_iter()
            .map(|index| participants[index].snapshot())
            .collect()
    }

    pub fn play_round(
        &mut self,
        presenter: &mut dyn Presenter,
    ) -> Result<RoundReport, RaceError> {
        if self.over {
            return Err(RaceError::RaceOver);
        }
        if self.round >= self.config.max_rounds {
            return Err(RaceError::RoundLimit(self.config.max_rounds));
        }
        self.round += 1;
        for entrant in &mut self.entrants {
            entrant.participant.caught_penalty = false;
        }
        let mut turns = Vec::new();
        let mut events = Vec::new();
        for index in 0..self.entrants.len() {
            if self.entrants[index].participant.finished {
                continue;
            }
            presenter.show_board(&self.board());
            let report = self.play_turn(index, presenter)?;
            turns.push(report);
            self.flush_events(presenter, &mut events);
        }
        self.apply_bonuses(presenter)?;
        self.check_finish();
        self.events.push(RaceEvent::RoundCompleted { round: self.round });
        self.flush_events(presenter, &mut events);
        presenter.show_board(&self.board());
        log::info!("round {} complete", self.round);
        Ok(RoundReport {
            round: self.round,
            turns,
            events,
            finished: self.over,
        })
    }

    pub fn run(
        &mut self,
        presenter: &mut dyn Presenter,
    ) -> Result<Vec<ParticipantView>, RaceError> {
        while !self.over {
            self.play_round(presenter)?;
        }
        Ok(self.standings())
    }

    fn flush_events(&mut self, presenter: &mut dyn Presenter, sink: &mut Vec<RaceEvent>) {
        for event in self.events.drain() {
            presenter.notify(&event);
            sink.push(event);
        }
    }

    fn check_finish(&mut self) {
        let course_length = self.config.course_length;
        for entrant in &mut self.entrants {
            let participant = &mut entrant.participant;
            if participant.mark_finished(course_length) {
                self.events.push(RaceEvent::Finished {
                    name: participant.name().to_string(),
                    round: self.round,
                });
            }
        }
        if self.entrants.iter().all(|entrant| entrant.participant.finished) {
            self.over = true;
            let podium = self
                .standings()
                .into_iter()
                .map(|view| view.name)
                .collect();
            self.events.push(RaceEvent::RaceFinished {
                rounds: self.round,
                podium,
            });
            log::info!("race finished after {} rounds", self.round);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Headless, ScriptedPresenter};

    fn policy_only(seed: u64) -> Race {
        Race::new(RaceConfig::default(), &[], seed).expect("race")
    }

    #[test]
    fn initial_hands_are_drawn() {
        let race = policy_only(1);
        assert_eq!(race.participants().count(), 6);
        for participant in race.participants() {
            assert_eq!(participant.store.hand.len(), 7);
            assert_eq!(participant.position, 0);
        }
    }

    #[test]
    fn policy_race_runs_to_completion() {
        let mut race = policy_only(42);
        let standings = race.run(&mut Headless).expect("run");
        assert!(race.is_over());
        assert_eq!(standings.len(), 6);
        assert!(standings.iter().all(|view| view.finished));
        assert!(standings.iter().all(|view| view.position == 100));
    }

    #[test]
    fn finished_race_rejects_more_rounds() {
        let mut race = policy_only(3);
        race.run(&mut Headless).expect("run");
        assert_eq!(race.play_round(&mut Headless), Err(RaceError::RaceOver));
    }

    #[test]
    fn human_interrupt_ends_the_race() {
        let mut race =
            Race::new(RaceConfig::default(), &["Red".to_string()], 5).expect("race");
        let mut presenter = ScriptedPresenter::new([]);
        assert_eq!(
            race.play_round(&mut presenter),
            Err(RaceError::Interrupted)
        );
    }

    #[test]
    fn round_limit_is_enforced() {
        let config = RaceConfig {
            max_rounds: 1,
            ..RaceConfig::default()
        };
        let mut race = Race::new(config, &[], 8).expect("race");
        race.play_round(&mut Headless).expect("first round");
        assert_eq!(race.play_round(&mut Headless), Err(RaceError::RoundLimit(1)));
    }
}
