pub(crate) mod forms;
pub(crate) mod modal;
pub(crate) mod text;
pub(crate) mod views;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Tabs;

use crate::keymap::{self, InputScope};
use crate::state::{AppState, LIST_VIEWS, StatusKind, ViewMode};
use crate::theme;
use crate::ui::modal::{ModalSpec, render_error_modal, render_modal};
use crate::ui::text::{compact_hint, key_hint_height, key_hint_paragraph, wrapped_paragraph};

/// Draws the whole dashboard for one frame.
///
/// The list view always renders underneath; editors, pickers and the error
/// dialog are layered on top in that order.
pub(crate) fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let key_text = footer_hint(state, area.width);
    let footer_height = key_hint_height(area.width, key_text);
    let [header, body, footer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(footer_height),
        ])
        .areas(area);

    render_header(frame, header, state);
    match state.list_view() {
        ViewMode::PullRequests => views::render_pull_requests(frame, body, state),
        ViewMode::Tickets => views::render_tickets(frame, body, state),
        _ => views::render_graph(frame, body, state),
    }
    frame.render_widget(key_hint_paragraph(key_text).block(theme::key_block()), footer);

    match state.view {
        ViewMode::Help => render_help(frame, state),
        ViewMode::Settings => forms::render_settings(frame, state),
        ViewMode::EditDescription => forms::render_description(frame, state),
        ViewMode::EditPullRequest => forms::render_pull_request_editor(frame, state),
        ViewMode::Bookmark => forms::render_bookmark(frame, state),
        ViewMode::Login => forms::render_login(frame, state),
        ViewMode::Graph | ViewMode::PullRequests | ViewMode::Tickets => {}
    }
    if state.transitions.is_some() {
        forms::render_transitions(frame, state);
    }

    if let Some(error) = state.error.as_ref() {
        let footer = if error.is_no_repository() {
            "i: jj git init    r: retry    Esc: dismiss    q: quit"
        } else {
            "r: retry    Esc: dismiss    q: quit"
        };
        render_error_modal(frame, &error.message, footer);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let titles = [
        "1 Graph".to_string(),
        format!("2 Pull requests ({})", state.pull_requests.len()),
        format!(
            "3 {} ({})",
            state.ticket_provider.unwrap_or("Tickets"),
            state.tickets.len()
        ),
    ];
    let selected = LIST_VIEWS
        .iter()
        .position(|view| *view == state.list_view())
        .unwrap_or(0);

    let status = status_line(state);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(theme::table_highlight(theme::ACCENT))
        .block(theme::chrome("jjdeck").title_bottom(status));
    frame.render_widget(tabs, area);
}

fn status_line(state: &AppState) -> Line<'static> {
    let Some(status) = state.status.as_ref() else {
        return Line::default();
    };
    let style = match status.kind {
        StatusKind::Progress => theme::focus_prompt(),
        StatusKind::Info => Style::default(),
        StatusKind::Success => theme::success_prompt(),
        StatusKind::Warning => theme::error_prompt(),
    };
    Line::from(Span::styled(format!(" {} ", status.message), style))
}

fn footer_hint(state: &AppState, width: u16) -> &'static str {
    if state.error.is_some() {
        return compact_hint(
            width,
            "r: retry    Esc: dismiss    q: quit",
            "r: retry    Esc: dismiss    q: quit",
            "r retry | Esc dismiss | q quit",
        );
    }
    if state.rebase.is_picking() {
        return compact_hint(
            width,
            "Up/Down or j/k: pick destination    Enter: rebase here    Esc: cancel",
            "j/k: destination    Enter: rebase    Esc: cancel",
            "j/k dest | Enter rebase | Esc cancel",
        );
    }
    if state.transitions.is_some() {
        return compact_hint(
            width,
            "Up/Down or j/k: move    Enter: apply transition    Esc: cancel",
            "j/k: move    Enter: apply    Esc: cancel",
            "j/k move | Enter apply | Esc cancel",
        );
    }

    match state.view {
        ViewMode::Graph => compact_hint(
            width,
            "e: edit  n: new  s: squash  a: abandon  r: rebase  d: describe  b: bookmark  p: push  c: pull request  ?: help  q: quit",
            "e edit  n new  s squash  r rebase  d describe  b bookmark  c PR  ?: help",
            "e/n/s/r/d/b/c | ? help | q quit",
        ),
        ViewMode::PullRequests => compact_hint(
            width,
            "Up/Down or j/k: move    e: edit title and body    Enter/o: open in browser    ?: help    q: quit",
            "j/k: move    e: edit    Enter/o: open    ?: help    q: quit",
            "j/k | e edit | o open | ? help",
        ),
        ViewMode::Tickets => compact_hint(
            width,
            "Up/Down or j/k: move    t: transition    b: bookmark from ticket    Enter/o: open    ?: help    q: quit",
            "j/k: move    t: transition    b: bookmark    Enter/o: open    ?: help",
            "j/k | t move | b bookmark | o open",
        ),
        ViewMode::Help => "Esc/?: close help    q: quit",
        ViewMode::Settings => compact_hint(
            width,
            "Tab/Up/Down: field    PgUp/PgDn: tab    Enter: next field, save on the last    Esc: cancel",
            "Tab: field    PgUp/PgDn: tab    Enter: next/save    Esc: cancel",
            "Tab field | PgDn tab | Enter save | Esc",
        ),
        ViewMode::EditDescription => "Ctrl+S: save    Esc: cancel",
        ViewMode::EditPullRequest => compact_hint(
            width,
            "Tab: switch field    Ctrl+S: push and submit    Esc: cancel",
            "Tab: field    Ctrl+S: submit    Esc: cancel",
            "Tab | Ctrl+S submit | Esc",
        ),
        ViewMode::Bookmark => compact_hint(
            width,
            "Enter: create or move    Tab: switch between new name and existing bookmarks    Esc: cancel",
            "Enter: apply    Tab: new/existing    Esc: cancel",
            "Enter | Tab new/existing | Esc",
        ),
        ViewMode::Login => "Enter: save token    Esc: cancel",
    }
}

fn render_help(frame: &mut Frame<'_>, state: &AppState) {
    let scope = match state.return_view {
        ViewMode::PullRequests => InputScope::PullRequests,
        ViewMode::Tickets => InputScope::Tickets,
        _ => InputScope::Graph,
    };

    let mut lines = vec![Line::from(Span::styled(
        "Keys for this view",
        theme::focus_prompt(),
    ))];
    lines.extend(keymap::bindings(scope).map(|binding| {
        Line::from(vec![
            Span::styled(format!("{:>10}  ", binding.hint), theme::table_header()),
            Span::raw(binding.description),
        ])
    }));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Editors: Ctrl+S saves, Esc cancels. Ctrl+C quits from anywhere.",
        theme::secondary_text(),
    )));

    render_modal(
        frame,
        ModalSpec {
            title: "Help",
            title_style: Some(theme::focus_prompt()),
            body: Text::from(lines),
            key_hint: None,
            width_pct: 70,
            height_pct: 80,
        },
    );
}

/// A bordered paragraph for "nothing here" states.
pub(crate) fn placeholder<'a>(title: impl Into<Line<'a>>, message: &'a str) -> ratatui::widgets::Paragraph<'a> {
    wrapped_paragraph(Line::from(Span::styled(message, theme::secondary_text())))
        .block(theme::chrome(title))
}
