use jjdeck_core::model::{CheckStatus, PullRequestState};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders};

pub(crate) const ACCENT: Color = Color::Cyan;

pub(crate) fn chrome<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default().borders(Borders::ALL).title(title)
}

pub(crate) fn key_block() -> Block<'static> {
    chrome("Keys")
}

pub(crate) fn table_header() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub(crate) fn table_highlight(color: Color) -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(color)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn focus_prompt() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn success_prompt() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn error_prompt() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub(crate) fn secondary_text() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}

pub(crate) fn bookmark() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn inherited_bookmark() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::DIM)
}

pub(crate) fn working_copy() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn immutable() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub(crate) fn conflict() -> Style {
    Style::default().fg(Color::Red)
}

pub(crate) fn rebase_marker() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn pull_request_state(state: PullRequestState) -> Style {
    match state {
        PullRequestState::Open => Style::default().fg(Color::Green),
        PullRequestState::Merged => Style::default().fg(Color::Magenta),
        PullRequestState::Closed => Style::default().fg(Color::Red),
    }
}

pub(crate) fn check_status(status: Option<CheckStatus>) -> Style {
    match status {
        Some(CheckStatus::Passing) => Style::default().fg(Color::Green),
        Some(CheckStatus::Failing) => Style::default().fg(Color::Red),
        Some(CheckStatus::Pending) => Style::default().fg(Color::Yellow),
        None => secondary_text(),
    }
}
