pub mod view_state;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::display::{format_secs, ActionKind, Screen};
use crate::game::{Difficulty, GameSummary};
pub use view_state::ViewState;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &ViewState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Title => render_title(self, area, buf),
            Screen::Game => {
                render_game(self, area, buf);
                if self.confirm_quit {
                    render_quit_prompt(area, buf);
                }
            }
            Screen::Result => render_result(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn centered(text: impl Into<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(text.into()).alignment(Alignment::Center)
}

fn render_title(view: &ViewState, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // name
            Constraint::Length(1), // tagline
            Constraint::Length(1),
            Constraint::Length(1), // best
            Constraint::Length(1),
            Constraint::Length(5), // menu
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    centered(Span::styled("JUSTIME", bold().fg(Color::Cyan))).render(chunks[1], buf);
    centered(Span::styled("stop the watch right on target", italic())).render(chunks[2], buf);

    let best = match view.best_recorded_at {
        Some(at) => format!("Endless best: {} (set {})", view.best, at.format("%Y-%m-%d")),
        None => format!("Endless best: {}", view.best),
    };
    centered(Span::styled(best, Style::default().fg(Color::Yellow))).render(chunks[4], buf);

    let menu = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Line::from(format!(
                "({}) {:<7} {}s life, 5 turns",
                i + 1,
                d.to_string(),
                format_secs(d.initial_life())
            ))
        })
        .chain(std::iter::once(Line::from(
            "(4) Endless  until your life runs out",
        )))
        .collect::<Vec<_>>();
    Paragraph::new(menu)
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

    let legend = match &view.replay {
        Some(game) => format!("(1-4) play / (enter) replay {game} / (q)uit"),
        None => "(1-4) play / (q)uit".to_string(),
    };
    centered(Span::styled(legend, italic())).render(chunks[8], buf);
}

fn render_game(view: &ViewState, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),
            Constraint::Length(1), // target
            Constraint::Length(1),
            Constraint::Length(1), // stopwatch
            Constraint::Length(1),
            Constraint::Length(1), // round result
            Constraint::Min(0),
            Constraint::Length(1), // action
            Constraint::Length(1), // legend
        ])
        .split(area);

    if let Some(header) = &view.header {
        let life_style = if header.danger {
            bold().fg(Color::Red)
        } else {
            bold().fg(Color::Green)
        };
        let mut spans = vec![
            Span::raw(format!("Mode: {}   ", header.mode_label)),
            Span::raw("Life: "),
            Span::styled(format_secs(header.life), life_style),
            Span::raw(format!("   {}", header.turn_text)),
        ];
        if let Some(best) = header.best {
            spans.push(Span::styled(
                format!("   Best: {best}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        centered(Line::from(spans)).render(chunks[0], buf);
    }

    centered(Line::from(vec![
        Span::raw("Target "),
        Span::styled(format_secs(view.target), bold().fg(Color::Cyan)),
    ]))
    .render(chunks[2], buf);

    let watch_style = if view.action == ActionKind::StopMeasurement {
        bold()
    } else {
        bold().add_modifier(Modifier::DIM)
    };
    centered(Span::styled(format_secs(view.elapsed), watch_style)).render(chunks[4], buf);

    if let Some(result) = view.round_result {
        centered(Line::from(vec![
            Span::raw("Off by "),
            Span::styled(format_secs(result.diff), bold()),
            Span::raw("s   Life lost "),
            Span::styled(format_secs(result.diff), bold().fg(Color::Red)),
            Span::raw("s"),
        ]))
        .render(chunks[6], buf);
    }

    let action_style = match view.action {
        ActionKind::StopMeasurement => bold().fg(Color::Red),
        ActionKind::NextRound => bold().fg(Color::Green),
        _ => bold(),
    };
    if view.action != ActionKind::None {
        centered(Span::styled(
            format!("[space] {}", view.action.label()),
            action_style,
        ))
        .render(chunks[8], buf);
    }

    centered(Span::styled("(esc) quit to title", italic())).render(chunks[9], buf);
}

fn render_quit_prompt(area: Rect, buf: &mut Buffer) {
    let width = 36u16.min(area.width);
    let height = 3u16.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    Clear.render(popup, buf);
    Paragraph::new("Quit to the title screen? (y/n)")
        .alignment(Alignment::Center)
        .style(bold().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}

/// Title, message and score line for a finished game
pub fn summary_lines(summary: &GameSummary) -> (&'static str, &'static str, String) {
    match summary {
        GameSummary::Cleared { remaining_life } => (
            "MISSION CLEAR!",
            "all five turns done, congratulations",
            format!("Life left: {}s", format_secs(*remaining_life)),
        ),
        GameSummary::Failed { turn } => (
            "GAME OVER",
            "you ran out of time",
            format!("Dropped out on turn {turn}"),
        ),
        GameSummary::Endless {
            completed_turns, ..
        } => (
            "Result (Endless)",
            "pushed to the limit",
            format!("Record: {completed_turns} turns"),
        ),
    }
}

fn render_result(view: &ViewState, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // title
            Constraint::Length(1), // message
            Constraint::Length(1),
            Constraint::Length(1), // score
            Constraint::Length(1), // new record
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let Some(summary) = &view.summary else {
        centered(Span::styled("...", italic())).render(chunks[1], buf);
        return;
    };

    let (title, message, score) = summary_lines(summary);
    let title_style = match summary {
        GameSummary::Cleared { .. } => bold().fg(Color::Green),
        GameSummary::Failed { .. } => bold().fg(Color::Red),
        GameSummary::Endless { .. } => bold().fg(Color::Cyan),
    };

    centered(Span::styled(title, title_style)).render(chunks[1], buf);
    centered(Span::styled(message, italic())).render(chunks[2], buf);
    centered(Span::styled(score, bold())).render(chunks[4], buf);

    if let GameSummary::Endless {
        new_record: true, ..
    } = summary
    {
        centered(Span::styled(
            "NEW RECORD!",
            bold().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK),
        ))
        .render(chunks[5], buf);
    }

    centered(Span::styled("(r)eturn to title / (q)uit", italic())).render(chunks[7], buf);
}
