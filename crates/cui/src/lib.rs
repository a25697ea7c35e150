mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::{App, Screen, DEFAULT_RACE_SEED};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use pacerace_core::{choose_identities, Board, Presenter, Prompt, PromptError, RaceError, RaceEvent};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

pub use app::METRES_PER_UNIT;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub assets: Option<PathBuf>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let seed = options.seed.unwrap_or(DEFAULT_RACE_SEED);
    let assets = options.assets.unwrap_or_else(|| PathBuf::from("assets"));
    let mut app = App::bootstrap(&assets, seed)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut seed = std::env::var("PACERACE_SEED")
        .ok()
        .and_then(|value| value.parse::<u64>().ok());
    let mut assets = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    assets = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    LaunchOptions { seed, assets }
}

/// Presenter drawing into the alternate screen. Every prompt runs its own
/// key loop until answered or interrupted.
struct TerminalPresenter<'a> {
    terminal: &'a mut Tui,
    app: &'a mut App,
}

impl Presenter for TerminalPresenter<'_> {
    fn choose(&mut self, prompt: &Prompt) -> Result<usize, PromptError> {
        select(self.terminal, self.app, prompt.clone())
    }

    fn show_board(&mut self, board: &Board) {
        self.app.set_board(board.clone());
        if let Err(err) = self.terminal.draw(|frame| view::draw(frame, self.app)) {
            self.app.status_line = format!("draw failed: {err}");
        }
    }

    fn notify(&mut self, event: &RaceEvent) {
        self.app.record(event);
    }
}

fn io_error(err: io::Error) -> PromptError {
    PromptError::Io(err.to_string())
}

fn select(terminal: &mut Tui, app: &mut App, prompt: Prompt) -> Result<usize, PromptError> {
    let tick_rate = Duration::from_millis(120);
    app.begin_prompt(prompt);
    loop {
        terminal
            .draw(|frame| view::draw(frame, app))
            .map_err(io_error)?;
        if !event::poll(tick_rate).map_err(io_error)? {
            continue;
        }
        let CEvent::Key(key) = event::read().map_err(io_error)? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let action = input::map_key(key, app.prompt_layout());
        if let Some(answer) = actions::dispatch(app, action) {
            return answer;
        }
    }
}

fn run_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.screen = Screen::Title;
        let choice = match select(terminal, app, App::title_prompt()) {
            Ok(choice) => choice,
            Err(PromptError::Interrupted) => break,
            Err(err) => return Err(err.into()),
        };
        match choice {
            0 => play(terminal, app)?,
            1 => show_rules(terminal, app)?,
            2 => show_credits(terminal, app)?,
            _ => app.should_quit = true,
        }
    }
    Ok(())
}

fn play(terminal: &mut Tui, app: &mut App) -> Result<()> {
    app.screen = Screen::Race;
    app.board = None;
    let palette = app.config.identities.clone();
    let lanes = app.config.lanes;
    let humans = {
        let mut presenter = TerminalPresenter {
            terminal: &mut *terminal,
            app: &mut *app,
        };
        match choose_identities(&mut presenter, &palette, lanes) {
            Ok(humans) => humans,
            Err(PromptError::Interrupted) => return Ok(()),
            Err(err) => return Err(err.into()),
        }
    };
    let mut race = app.new_race(&humans).context("start race")?;
    let outcome = {
        let mut presenter = TerminalPresenter {
            terminal: &mut *terminal,
            app: &mut *app,
        };
        race.run(&mut presenter)
    };
    match outcome {
        Ok(standings) => {
            app.set_board(race.board());
            if let Some(winner) = standings.first() {
                app.status_line = format!("{} wins after {} rounds", winner.name, race.round());
            }
        }
        Err(RaceError::Interrupted) => {
            app.status_line = "race abandoned".to_string();
            return Ok(());
        }
        Err(err) => return Err(err).context("race failed"),
    }
    match select(terminal, app, App::back_prompt("Race over")) {
        Ok(_) | Err(PromptError::Interrupted) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn show_rules(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        app.screen = Screen::Title;
        app.reading = None;
        let prompt = app.rules_prompt();
        let done = prompt.options.len() - 1;
        let choice = match select(terminal, app, prompt) {
            Ok(choice) if choice < done => choice,
            Ok(_) | Err(PromptError::Interrupted) => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        let Some(section) = app.rules.sections.get(choice).cloned() else {
            return Ok(());
        };
        app.screen = Screen::Reading;
        app.reading = Some((format!("Rule: {}", section.title), section.body));
        match select(terminal, app, App::back_prompt("Enter to return")) {
            Ok(_) | Err(PromptError::Interrupted) => {}
            Err(err) => return Err(err.into()),
        }
    }
}

fn show_credits(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let body = app
        .credits
        .clone()
        .unwrap_or_else(|| "[Error] Credits file (assets/credits.txt) not found.".to_string());
    app.screen = Screen::Reading;
    app.reading = Some(("Credits".to_string(), body));
    match select(terminal, app, App::back_prompt("Enter to return")) {
        Ok(_) | Err(PromptError::Interrupted) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "pacerace-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_seed_and_assets() {
        let options = parse_options(&args(&["--seed", "12", "--assets", "data/assets"]));
        assert_eq!(options.seed, Some(12));
        assert_eq!(options.assets, Some(PathBuf::from("data/assets")));
    }

    #[test]
    fn ignores_unknown_flags() {
        let options = parse_options(&args(&["--fast", "--seed", "7"]));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.assets, None);
    }
}
