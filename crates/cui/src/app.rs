use anyhow::{Context, Result};
use pacerace_core::{
    Board, Prompt, PromptKind, PromptLayout, Race, RaceConfig, RaceError, RaceEvent,
};
use pacerace_data::{load_credits, load_race_config, load_rules, RuleBook};
use std::collections::VecDeque;
use std::path::Path;

pub const DEFAULT_RACE_SEED: u64 = 0xC0FFEE;
pub const METRES_PER_UNIT: u32 = 20;
const MAX_EVENT_LOG: usize = 200;

pub const TITLE_OPTIONS: [&str; 4] = ["Race", "Rules", "Credits", "Quit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Reading,
    Race,
}

#[derive(Debug, Clone)]
pub struct ActivePrompt {
    pub prompt: Prompt,
    pub cursor: usize,
}

#[derive(Debug)]
pub struct App {
    pub seed: u64,
    pub races_started: u64,
    pub config: RaceConfig,
    pub rules: RuleBook,
    pub credits: Option<String>,
    pub screen: Screen,
    pub reading: Option<(String, String)>,
    pub board: Option<Board>,
    pub prompt: Option<ActivePrompt>,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(assets: &Path, seed: u64) -> Result<Self> {
        let config = load_race_config(assets).context("load race config")?;
        let mut app = Self::new(config, seed);
        match load_rules(assets) {
            Ok(rules) => app.rules = rules,
            Err(err) => app.status_line = format!("rules unavailable: {err}"),
        }
        app.credits = load_credits(assets).ok();
        Ok(app)
    }

    pub fn new(config: RaceConfig, seed: u64) -> Self {
        Self {
            seed,
            races_started: 0,
            config,
            rules: RuleBook::default(),
            credits: None,
            screen: Screen::Title,
            reading: None,
            board: None,
            prompt: None,
            event_log: VecDeque::new(),
            status_line: "ready".to_string(),
            should_quit: false,
        }
    }

    /// Each race in a session gets its own seed derived from the launch seed.
    pub fn new_race(&mut self, humans: &[String]) -> Result<Race, RaceError> {
        let seed = self.seed.wrapping_add(self.races_started);
        self.races_started += 1;
        let race = Race::new(self.config.clone(), humans, seed)?;
        self.event_log.clear();
        self.board = Some(race.board());
        self.status_line = format!("race seed {seed}");
        log::debug!("race {} starts with seed {seed}", self.races_started);
        Ok(race)
    }

    pub fn title_prompt() -> Prompt {
        Prompt::vertical(
            PromptKind::Menu,
            "Pace Race",
            TITLE_OPTIONS.iter().map(|option| option.to_string()).collect(),
        )
    }

    pub fn rules_prompt(&self) -> Prompt {
        let mut options: Vec<String> = self
            .rules
            .titles()
            .into_iter()
            .map(str::to_string)
            .collect();
        options.push("Done".to_string());
        Prompt::vertical(PromptKind::Menu, "Rules", options)
    }

    pub fn back_prompt(title: &str) -> Prompt {
        Prompt::horizontal(PromptKind::Acknowledge, title, vec!["Back".to_string()])
    }

    pub fn begin_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(ActivePrompt { prompt, cursor: 0 });
    }

    pub fn prompt_layout(&self) -> PromptLayout {
        self.prompt
            .as_ref()
            .map(|active| active.prompt.layout)
            .unwrap_or(PromptLayout::Vertical)
    }

    /// Moves the highlight, wrapping at both ends.
    pub fn move_cursor(&mut self, forward: bool) {
        let Some(active) = self.prompt.as_mut() else {
            return;
        };
        let len = active.prompt.options.len();
        if len == 0 {
            return;
        }
        active.cursor = if forward {
            (active.cursor + 1) % len
        } else {
            (active.cursor + len - 1) % len
        };
    }

    pub fn point_at(&mut self, index: usize) -> bool {
        match self.prompt.as_mut() {
            Some(active) if index < active.prompt.options.len() => {
                active.cursor = index;
                true
            }
            _ => false,
        }
    }

    pub fn confirm(&mut self) -> Option<usize> {
        let active = self.prompt.take()?;
        if active.prompt.options.is_empty() {
            return None;
        }
        Some(active.cursor)
    }

    pub fn record(&mut self, event: &RaceEvent) {
        if let RaceEvent::RaceFinished { podium, .. } = event {
            self.status_line = format!("winner: {}", podium.first().map_or("-", String::as_str));
        }
        self.log(event.describe());
    }

    pub fn log(&mut self, line: String) {
        self.event_log.push_back(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = Some(board);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(RaceConfig::default(), 1)
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut app = app();
        app.begin_prompt(App::title_prompt());
        app.move_cursor(false);
        assert_eq!(app.prompt.as_ref().map(|p| p.cursor), Some(3));
        app.move_cursor(true);
        assert_eq!(app.prompt.as_ref().map(|p| p.cursor), Some(0));
    }

    #[test]
    fn confirm_clears_the_prompt() {
        let mut app = app();
        app.begin_prompt(App::title_prompt());
        assert!(app.point_at(2));
        assert!(!app.point_at(9));
        assert_eq!(app.confirm(), Some(2));
        assert!(app.prompt.is_none());
        assert_eq!(app.confirm(), None);
    }

    #[test]
    fn event_log_is_capped() {
        let mut app = app();
        for round in 0..(MAX_EVENT_LOG as u32 + 10) {
            app.record(&RaceEvent::RoundCompleted { round });
        }
        assert_eq!(app.event_log.len(), MAX_EVENT_LOG);
        assert_eq!(app.event_log.front().map(String::as_str), Some("round 10 complete"));
    }

    #[test]
    fn races_in_a_session_use_distinct_seeds() {
        let mut app = app();
        let first = app.new_race(&[]).expect("first");
        let second = app.new_race(&[]).expect("second");
        assert_eq!(first.rng.seed() + 1, second.rng.seed());
        assert!(app.board.is_some());
    }

    #[test]
    fn rules_prompt_ends_with_done() {
        let mut app = app();
        app.rules = pacerace_data::parse_rules("Objective:\nwin\n\n\nCards:\nplay");
        let prompt = app.rules_prompt();
        assert_eq!(prompt.options, vec!["Objective", "Cards", "Done"]);
    }
}
