use crate::app::{App, Screen, METRES_PER_UNIT};
use pacerace_core::{ranking, Board, ParticipantView, PromptLayout, TurnContext};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Title => draw_title(frame, app),
        Screen::Reading => draw_reading(frame, app),
        Screen::Race => draw_race(frame, app),
    }
}

fn draw_title(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(8), Constraint::Length(3)])
        .split(area);
    let banner = vec![
        Line::from(""),
        Line::from("P A C E   R A C E".bold()),
        Line::from("a card-driven rowing race"),
    ];
    frame.render_widget(
        Paragraph::new(banner).alignment(Alignment::Center),
        rows[0],
    );
    draw_prompt(frame, centered_rect(40, 80, rows[1]), app);
    draw_status(frame, rows[2], app);
}

fn draw_reading(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(frame.area());
    let (title, body) = app
        .reading
        .clone()
        .unwrap_or_else(|| ("Rules".to_string(), String::new()));
    let block = Block::default().title(title).borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(body).block(block).wrap(Wrap { trim: false }),
        rows[0],
    );
    draw_prompt(frame, rows[1], app);
}

fn draw_race(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(10),
        ])
        .split(frame.area());
    draw_status(frame, root[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(root[1]);
    draw_course(frame, middle[0], app.board.as_ref());
    draw_leaderboard(frame, middle[1], app.board.as_ref());

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(root[2]);
    draw_events(frame, bottom[0], app);
    draw_prompt(frame, bottom[1], app);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let round = app.board.as_ref().map_or(0, |board| board.round);
    let line = format!(
        "Seed {} | Round {} | {}",
        app.seed, round, app.status_line
    );
    let block = Block::default().borders(Borders::ALL).title("Pace Race");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// One lane of the course: checkpoint markers at their thresholds and the
/// participant marker at its position, scaled to `width` cells.
pub fn course_row(board: &Board, participant: &ParticipantView, width: usize) -> String {
    if width == 0 || board.course_length == 0 {
        return String::new();
    }
    let scale = |units: u32| -> usize {
        let cell = units as usize * (width - 1) / board.course_length as usize;
        cell.min(width - 1)
    };
    let mut cells = vec!['.'; width];
    for (threshold, _) in &board.checkpoints {
        cells[scale(*threshold)] = '|';
    }
    cells[width - 1] = '#';
    let marker = if participant.finished {
        'F'
    } else if participant.caught_penalty {
        'x'
    } else {
        '>'
    };
    cells[scale(participant.position)] = marker;
    cells.into_iter().collect()
}

fn draw_course(frame: &mut Frame, area: Rect, board: Option<&Board>) {
    let block = Block::default().title("Course").borders(Borders::ALL);
    let Some(board) = board else {
        frame.render_widget(
            Paragraph::new("waiting for the start").block(block),
            area,
        );
        return;
    };
    let label_width = 10usize;
    let width = (area.width as usize).saturating_sub(label_width + 4).max(10);
    let mut lines = Vec::new();
    let mut markers = String::new();
    for (threshold, limit) in &board.checkpoints {
        markers.push_str(&format!("{}m:{limit}  ", threshold * METRES_PER_UNIT));
    }
    lines.push(Line::from(format!("checkpoints {markers}")).dim());
    let mut participants: Vec<&ParticipantView> = board.participants.iter().collect();
    participants.sort_by_key(|participant| participant.lane);
    for participant in participants {
        let style = Style::default().fg(identity_color(&participant.color));
        let mut label = format!("{} {}", participant.lane, participant.name);
        label.truncate(label_width);
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<label_width$}"), style),
            Span::raw(" "),
            Span::styled(course_row(board, participant, width), style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_leaderboard(frame: &mut Frame, area: Rect, board: Option<&Board>) {
    let block = Block::default().title("Leaderboard").borders(Borders::ALL);
    let Some(board) = board else {
        frame.render_widget(block, area);
        return;
    };
    let keys: Vec<(u32, u8)> = board
        .participants
        .iter()
        .map(|participant| (participant.position, participant.rate))
        .collect();
    let items: Vec<ListItem<'_>> = ranking(&keys)
        .into_iter()
        .enumerate()
        .map(|(place, index)| {
            let participant = &board.participants[index];
            let flag = if participant.finished { " F" } else { "" };
            let text = format!(
                "{}. {:<7} {:>4}m r{} s{}{flag}",
                place + 1,
                participant.name,
                participant.position * METRES_PER_UNIT,
                participant.rate,
                participant.stamina
            );
            ListItem::new(text).style(Style::default().fg(identity_color(&participant.color)))
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.event_log.len().saturating_sub(visible);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(skip)
        .map(|line| Line::from(line.as_str()))
        .collect();
    let block = Block::default().title("Events").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_prompt(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(Clear, area);
    let Some(active) = app.prompt.as_ref() else {
        let block = Block::default().borders(Borders::ALL);
        frame.render_widget(Paragraph::new("...").block(block), area);
        return;
    };
    let prompt = &active.prompt;
    let block = Block::default()
        .title(prompt.title.as_str())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let highlight = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut header = Vec::new();
    if let Some(context) = prompt.context.as_ref() {
        header.push(context_line(context));
    }

    match prompt.layout {
        PromptLayout::Vertical => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(header.len() as u16),
                    Constraint::Min(1),
                ])
                .split(inner);
            frame.render_widget(Paragraph::new(header), rows[0]);
            let items: Vec<ListItem<'_>> = prompt
                .options
                .iter()
                .map(|option| ListItem::new(option.as_str()))
                .collect();
            let list = List::new(items)
                .highlight_style(highlight)
                .highlight_symbol("> ");
            let mut state = ListState::default();
            state.select(Some(active.cursor));
            frame.render_stateful_widget(list, rows[1], &mut state);
        }
        PromptLayout::Horizontal => {
            let mut spans = Vec::new();
            for (index, option) in prompt.options.iter().enumerate() {
                let text = format!("[{option}]");
                if index == active.cursor {
                    spans.push(Span::styled(text, highlight));
                } else {
                    spans.push(Span::raw(text));
                }
                spans.push(Span::raw("  "));
            }
            header.push(Line::from(""));
            header.push(Line::from(spans));
            header.push(Line::from("<- -> move, Enter select, q quit").dim());
            frame.render_widget(
                Paragraph::new(header).block(block).wrap(Wrap { trim: true }),
                area,
            );
        }
    }
}

fn context_line(context: &TurnContext) -> Line<'static> {
    let hand: Vec<String> = context.hand.iter().map(|card| card.short_label()).collect();
    Line::from(format!(
        "{} at {}m | rate {} | stamina {} | hand [{}]",
        context.name,
        context.position * METRES_PER_UNIT,
        context.rate,
        context.stamina,
        hand.join(" ")
    ))
    .style(Style::default().fg(identity_color(&context.color)))
}

pub fn identity_color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "black" => Color::DarkGray,
        "red" => Color::Red,
        "green" => Color::Green,
        "brown" => Color::Rgb(150, 90, 40),
        "blue" => Color::Blue,
        "purple" => Color::Magenta,
        "cyan" => Color::Cyan,
        "yellow" => Color::Yellow,
        _ => Color::White,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacerace_core::{Race, RaceConfig};

    fn board() -> Board {
        Race::new(RaceConfig::default(), &[], 2)
            .expect("race")
            .board()
    }

    #[test]
    fn course_row_marks_checkpoints_and_position() {
        let mut board = board();
        board.participants[0].position = 50;
        let row = course_row(&board, &board.participants[0], 101);
        assert_eq!(row.chars().count(), 101);
        assert_eq!(row.chars().nth(25), Some('|'));
        assert_eq!(row.chars().nth(50), Some('>'));
        assert_eq!(row.chars().nth(87), Some('|'));
        assert_eq!(row.chars().last(), Some('#'));
    }

    #[test]
    fn finished_participant_sits_on_the_line() {
        let mut board = board();
        board.participants[1].position = 100;
        board.participants[1].finished = true;
        let row = course_row(&board, &board.participants[1], 40);
        assert_eq!(row.chars().last(), Some('F'));
    }

    #[test]
    fn unknown_colors_fall_back_to_white() {
        assert_eq!(identity_color("Cyan"), Color::Cyan);
        assert_eq!(identity_color("teal"), Color::White);
    }
}
