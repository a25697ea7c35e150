//! Line-oriented presenter for terminals without the full-screen UI.

use pacerace_core::{ranking, Board, Presenter, Prompt, PromptError, PromptLayout, RaceEvent};
use std::io::{self, BufRead, Read, Write};
#[cfg(unix)]
use std::os::fd::AsRawFd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Digit(usize),
    Interrupt,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Moved(usize),
    Chosen(usize),
    Interrupted,
    Ignored,
}

/// Cursor movement for one key. Only the arrows matching the prompt layout
/// move the highlight.
pub fn apply_key(layout: PromptLayout, cursor: usize, len: usize, key: Key) -> KeyOutcome {
    if len == 0 {
        return KeyOutcome::Ignored;
    }
    let step = |forward: bool| {
        if forward {
            KeyOutcome::Moved((cursor + 1) % len)
        } else {
            KeyOutcome::Moved((cursor + len - 1) % len)
        }
    };
    match (layout, key) {
        (_, Key::Enter) => KeyOutcome::Chosen(cursor.min(len - 1)),
        (_, Key::Interrupt) => KeyOutcome::Interrupted,
        (_, Key::Digit(index)) if index < len => KeyOutcome::Chosen(index),
        (PromptLayout::Vertical, Key::Up) | (PromptLayout::Horizontal, Key::Left) => step(false),
        (PromptLayout::Vertical, Key::Down) | (PromptLayout::Horizontal, Key::Right) => step(true),
        _ => KeyOutcome::Ignored,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChoice {
    Chosen(usize),
    Interrupted,
    Invalid,
}

/// Parses a typed answer: a 1-based option number, or `q` to quit.
pub fn parse_line_choice(line: &str, len: usize) -> LineChoice {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return LineChoice::Interrupted;
    }
    match trimmed.parse::<usize>() {
        Ok(number) if (1..=len).contains(&number) => LineChoice::Chosen(number - 1),
        _ => LineChoice::Invalid,
    }
}

/// Option rows for a prompt, the highlighted one marked.
pub fn render_options(prompt: &Prompt, cursor: usize) -> Vec<String> {
    match prompt.layout {
        PromptLayout::Vertical => prompt
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let marker = if index == cursor { '>' } else { ' ' };
                format!("{marker} {}. {option}", index + 1)
            })
            .collect(),
        PromptLayout::Horizontal => {
            let row: Vec<String> = prompt
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    if index == cursor {
                        format!(">[{option}]")
                    } else {
                        format!(" [{option}]")
                    }
                })
                .collect();
            vec![row.join(" ")]
        }
    }
}

pub fn render_board(board: &Board, metres_per_unit: u32) -> Vec<String> {
    let keys: Vec<(u32, u8)> = board
        .participants
        .iter()
        .map(|participant| (participant.position, participant.rate))
        .collect();
    let mut lines = vec![format!("-- round {} --", board.round)];
    for (place, index) in ranking(&keys).into_iter().enumerate() {
        let participant = &board.participants[index];
        lines.push(format!(
            "{:>2}. {:<7} lane {} {:>5}m rate {} stamina {}{}",
            place + 1,
            participant.name,
            participant.lane,
            participant.position * metres_per_unit,
            participant.rate,
            participant.stamina,
            if participant.finished { " finished" } else { "" }
        ));
    }
    lines
}

#[derive(Debug)]
pub struct PlainPresenter {
    pub metres_per_unit: u32,
    last_board: Vec<String>,
}

impl PlainPresenter {
    pub fn new(metres_per_unit: u32) -> Self {
        Self {
            metres_per_unit,
            last_board: Vec::new(),
        }
    }

    fn print_header(prompt: &Prompt) {
        println!();
        if let Some(context) = prompt.context.as_ref() {
            let hand: Vec<String> = context.hand.iter().map(|card| card.short_label()).collect();
            println!(
                "{} | position {} | rate {} | stamina {} | hand [{}]",
                context.name,
                context.position,
                context.rate,
                context.stamina,
                hand.join(" ")
            );
        }
        println!("{}", prompt.title);
    }

    fn choose_by_line(prompt: &Prompt) -> Result<usize, PromptError> {
        let stdin = io::stdin();
        loop {
            for line in render_options(prompt, usize::MAX) {
                println!("{line}");
            }
            print!("choice (1-{}, q to quit): ", prompt.options.len());
            io::stdout()
                .flush()
                .map_err(|err| PromptError::Io(err.to_string()))?;
            let mut line = String::new();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .map_err(|err| PromptError::Io(err.to_string()))?;
            if read == 0 {
                return Err(PromptError::Interrupted);
            }
            match parse_line_choice(&line, prompt.options.len()) {
                LineChoice::Chosen(index) => return Ok(index),
                LineChoice::Interrupted => return Err(PromptError::Interrupted),
                LineChoice::Invalid => println!("not an option: {}", line.trim()),
            }
        }
    }

    #[cfg(unix)]
    fn choose_by_key(prompt: &Prompt) -> Option<Result<usize, PromptError>> {
        let stdin = io::stdin();
        let fd = stdin.as_raw_fd();
        if unsafe { libc::isatty(fd) } != 1 {
            return None;
        }
        let _raw = RawMode::new(fd).ok()?;
        let mut input = stdin.lock();
        let mut cursor = 0usize;
        let mut drawn = 0usize;
        loop {
            redraw_options(prompt, cursor, drawn);
            drawn = render_options(prompt, cursor).len();
            let key = match read_key(&mut input) {
                Ok(key) => key,
                Err(err) => return Some(Err(PromptError::Io(err.to_string()))),
            };
            match apply_key(prompt.layout, cursor, prompt.options.len(), key) {
                KeyOutcome::Moved(next) => cursor = next,
                KeyOutcome::Chosen(index) => {
                    redraw_options(prompt, index, drawn);
                    print!("\r\n");
                    let _ = io::stdout().flush();
                    return Some(Ok(index));
                }
                KeyOutcome::Interrupted => {
                    print!("\r\n");
                    return Some(Err(PromptError::Interrupted));
                }
                KeyOutcome::Ignored => {}
            }
        }
    }

    #[cfg(not(unix))]
    fn choose_by_key(_prompt: &Prompt) -> Option<Result<usize, PromptError>> {
        None
    }
}

impl Presenter for PlainPresenter {
    fn choose(&mut self, prompt: &Prompt) -> Result<usize, PromptError> {
        if prompt.options.is_empty() {
            return Err(PromptError::Io(format!("prompt '{}' has no options", prompt.title)));
        }
        Self::print_header(prompt);
        match Self::choose_by_key(prompt) {
            Some(answer) => answer,
            None => Self::choose_by_line(prompt),
        }
    }

    /// Reprints the standings only when something moved.
    fn show_board(&mut self, board: &Board) {
        let lines = render_board(board, self.metres_per_unit);
        if lines == self.last_board {
            return;
        }
        for line in &lines {
            println!("{line}");
        }
        self.last_board = lines;
    }

    fn notify(&mut self, event: &RaceEvent) {
        println!("  {}", event.describe());
    }
}

#[cfg(unix)]
fn redraw_options(prompt: &Prompt, cursor: usize, previous: usize) {
    if previous > 0 {
        print!("\x1b[{previous}A\r");
    }
    for line in render_options(prompt, cursor) {
        print!("\x1b[2K{line}\r\n");
    }
    let _ = io::stdout().flush();
}

#[cfg(unix)]
fn read_key(input: &mut impl Read) -> io::Result<Key> {
    let mut byte = [0u8; 1];
    input.read_exact(&mut byte)?;
    Ok(match byte[0] {
        b'\n' | b'\r' | b' ' => Key::Enter,
        3 | b'q' => Key::Interrupt,
        digit @ b'1'..=b'9' => Key::Digit(usize::from(digit - b'1')),
        27 => read_escape_key(input).unwrap_or(Key::Interrupt),
        _ => Key::Other,
    })
}

#[cfg(unix)]
fn read_escape_key(input: &mut impl Read) -> Option<Key> {
    let mut first = [0u8; 1];
    input.read_exact(&mut first).ok()?;
    if first[0] != b'[' && first[0] != b'O' {
        return None;
    }
    let mut second = [0u8; 1];
    input.read_exact(&mut second).ok()?;
    match second[0] {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        _ => Some(Key::Other),
    }
}

/// Puts the terminal in non-canonical mode without echo or signal keys and
/// restores it on drop.
#[cfg(unix)]
struct RawMode {
    fd: i32,
    original: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    fn new(fd: i32) -> io::Result<Self> {
        let mut original = unsafe { std::mem::zeroed::<libc::termios>() };
        if unsafe { libc::tcgetattr(fd, &mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = original;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG);
        raw.c_iflag &= !(libc::IXON | libc::ICRNL);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd, original })
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = unsafe { libc::tcsetattr(self.fd, libc::TCSAFLUSH, &self.original) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacerace_core::{PromptKind, Race, RaceConfig};

    fn prompt(layout: PromptLayout) -> Prompt {
        let options = vec!["1".to_string(), "2".to_string(), "?".to_string()];
        match layout {
            PromptLayout::Vertical => Prompt::vertical(PromptKind::Rate, "Rate", options),
            PromptLayout::Horizontal => Prompt::horizontal(PromptKind::Card, "Card", options),
        }
    }

    #[test]
    fn arrows_follow_the_layout() {
        assert_eq!(
            apply_key(PromptLayout::Vertical, 0, 3, Key::Up),
            KeyOutcome::Moved(2)
        );
        assert_eq!(
            apply_key(PromptLayout::Vertical, 0, 3, Key::Right),
            KeyOutcome::Ignored
        );
        assert_eq!(
            apply_key(PromptLayout::Horizontal, 2, 3, Key::Right),
            KeyOutcome::Moved(0)
        );
        assert_eq!(
            apply_key(PromptLayout::Horizontal, 1, 3, Key::Enter),
            KeyOutcome::Chosen(1)
        );
        assert_eq!(
            apply_key(PromptLayout::Horizontal, 1, 3, Key::Digit(5)),
            KeyOutcome::Ignored
        );
        assert_eq!(
            apply_key(PromptLayout::Vertical, 1, 3, Key::Interrupt),
            KeyOutcome::Interrupted
        );
    }

    #[test]
    fn typed_answers_are_one_based() {
        assert_eq!(parse_line_choice("2\n", 3), LineChoice::Chosen(1));
        assert_eq!(parse_line_choice("0", 3), LineChoice::Invalid);
        assert_eq!(parse_line_choice("4", 3), LineChoice::Invalid);
        assert_eq!(parse_line_choice(" Q ", 3), LineChoice::Interrupted);
        assert_eq!(parse_line_choice("fast", 3), LineChoice::Invalid);
    }

    #[test]
    fn options_render_per_layout() {
        let vertical = render_options(&prompt(PromptLayout::Vertical), 1);
        assert_eq!(vertical, vec!["  1. 1", "> 2. 2", "  3. ?"]);
        let horizontal = render_options(&prompt(PromptLayout::Horizontal), 2);
        assert_eq!(horizontal, vec![" [1]  [2] >[?]"]);
    }

    #[test]
    fn board_lists_every_participant_in_metres() {
        let mut board = Race::new(RaceConfig::default(), &[], 3)
            .expect("race")
            .board();
        board.participants[2].position = 10;
        let lines = render_board(&board, 20);
        assert_eq!(lines.len(), board.participants.len() + 1);
        assert_eq!(lines[0], "-- round 0 --");
        assert!(lines[1].starts_with(" 1."));
        assert!(lines[1].contains("200m"));
    }
}
