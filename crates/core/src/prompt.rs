//! The turn request surface: the engine asks, a presenter answers with an
//! index into the offered options.

use crate::{Board, Card, Identity, RaceEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PromptKind {
    Menu,
    Identity,
    Rate,
    Card,
    DiscardOffer,
    Discard,
    Motivation,
    Acknowledge,
}

/// How a presenter should lay the options out and which keys move through
/// them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PromptLayout {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnContext {
    pub name: String,
    pub color: String,
    pub position: u32,
    pub rate: u8,
    pub hand: Vec<Card>,
    pub stamina: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub layout: PromptLayout,
    pub title: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub context: Option<TurnContext>,
}

impl Prompt {
    pub fn vertical(kind: PromptKind, title: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            kind,
            layout: PromptLayout::Vertical,
            title: title.into(),
            options,
            context: None,
        }
    }

    pub fn horizontal(kind: PromptKind, title: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            layout: PromptLayout::Horizontal,
            ..Self::vertical(kind, title, options)
        }
    }

    pub fn with_context(mut self, context: TurnContext) -> Self {
        self.context = Some(context);
        self
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("interrupted by user")]
    Interrupted,
    #[error("presenter failure: {0}")]
    Io(String),
}

/// The presentation collaborator. `choose` blocks until the user picks one
/// of `prompt.options`.
pub trait Presenter {
    fn choose(&mut self, prompt: &Prompt) -> Result<usize, PromptError>;

    fn show_board(&mut self, _board: &Board) {}

    fn notify(&mut self, _event: &RaceEvent) {}
}

/// Presenter for races without humans. Any prompt is an integration bug.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Presenter for Headless {
    fn choose(&mut self, prompt: &Prompt) -> Result<usize, PromptError> {
        Err(PromptError::Io(format!(
            "headless presenter cannot answer {:?} prompt '{}'",
            prompt.kind, prompt.title
        )))
    }
}

/// Presenter replaying a fixed list of answers, then interrupting.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPresenter {
    answers: std::collections::VecDeque<usize>,
    pub asked: Vec<Prompt>,
    pub events: Vec<RaceEvent>,
}

impl ScriptedPresenter {
    pub fn new(answers: impl IntoIterator<Item = usize>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl Presenter for ScriptedPresenter {
    fn choose(&mut self, prompt: &Prompt) -> Result<usize, PromptError> {
        self.asked.push(prompt.clone());
        self.answers.pop_front().ok_or(PromptError::Interrupted)
    }

    fn notify(&mut self, event: &RaceEvent) {
        self.events.push(event.clone());
    }
}

pub const START_RACE: &str = "Start race";

/// Lets players claim identities one at a time until they pick
/// "Start race" or every lane is taken.
pub fn choose_identities(
    presenter: &mut dyn Presenter,
    palette: &[Identity],
    lanes: usize,
) -> Result<Vec<String>, PromptError> {
    let mut available: Vec<&Identity> = palette.iter().collect();
    let mut chosen = Vec::new();
    while chosen.len() < lanes && !available.is_empty() {
        let mut options: Vec<String> = available
            .iter()
            .map(|identity| identity.name.clone())
            .collect();
        options.push(START_RACE.to_string());
        let prompt = Prompt::vertical(
            PromptKind::Identity,
            format!("Player {} select color:", chosen.len() + 1),
            options,
        );
        let index = presenter.choose(&prompt)?;
        if index >= available.len() {
            break;
        }
        chosen.push(available.remove(index).name.clone());
    }
    Ok(chosen)
}
