use jjdeck_core::config::TicketProviderKind;
use jjdeck_core::model::{ChangeSet, CheckStatus, PullRequest, Repository, ReviewStatus};
use jjdeck_core::time::format_change_date;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Cell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table, TableState,
};

use crate::state::AppState;
use crate::theme;
use crate::ui::placeholder;
use crate::ui::text::{focus_line, label_value_line, truncate, wrapped_paragraph};

const DETAIL_SPLIT_WIDTH: u16 = 110;

struct ListTable<'a> {
    title: Line<'a>,
    header: &'a [&'a str],
    widths: &'a [Constraint],
    rows: Vec<Row<'a>>,
    selected: Option<usize>,
    highlight: Style,
}

fn render_list_table(frame: &mut Frame<'_>, area: Rect, table: ListTable<'_>) {
    let len = table.rows.len();
    let header = Row::new(table.header.iter().copied()).style(theme::table_header());
    let widget = Table::new(table.rows, table.widths.iter().copied())
        .header(header)
        .block(theme::chrome(table.title))
        .row_highlight_style(table.highlight)
        .highlight_symbol("> ");

    let mut state = TableState::new();
    state.select(table.selected);
    frame.render_stateful_widget(widget, area, &mut state);

    let viewport = area.height.saturating_sub(3) as usize;
    let mut scrollbar_state = ScrollbarState::new(len)
        .position(table.selected.unwrap_or(0))
        .viewport_content_length(viewport);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None),
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Splits the body into a list and a details pane, side by side when wide.
fn split_with_details(area: Rect, details_rows: u16) -> [Rect; 2] {
    if area.width >= DETAIL_SPLIT_WIDTH {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
            .areas(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(details_rows)])
            .areas(area)
    }
}

pub(crate) fn render_graph(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let Some(repository) = state.repository.as_ref() else {
        let message = if state.loading {
            "Loading change-sets..."
        } else {
            "No repository loaded."
        };
        frame.render_widget(placeholder("Change graph", message), area);
        return;
    };
    if repository.graph().is_empty() {
        frame.render_widget(
            placeholder("Change graph", "The revset matched no change-sets."),
            area,
        );
        return;
    }

    let [list_area, details_area] = split_with_details(area, 9);
    let source = state.rebase.source();
    let destination = state.rebase.destination();

    let rows = repository
        .graph()
        .changes()
        .iter()
        .enumerate()
        .map(|(index, change)| {
            let marker = if Some(index) == source {
                Span::styled("src", theme::rebase_marker())
            } else if state.rebase.is_picking() && Some(index) == destination {
                Span::styled("dst", theme::rebase_marker())
            } else {
                change_marker(change)
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(change.short_id.clone()),
                Cell::from(bookmark_cell(repository, index, change)),
                Cell::from(pull_request_cell(repository, index)),
                Cell::from(truncate(&change.author, 18)),
                Cell::from(format_change_date(&change.date)),
                Cell::from(change.display_summary().to_string()),
            ])
            .style(change_style(change))
        })
        .collect();

    let (title, selected, highlight) = if state.rebase.is_picking() {
        (
            focus_line("Pick a rebase destination"),
            destination,
            theme::table_highlight(theme::rebase_marker().fg.unwrap_or(theme::ACCENT)),
        )
    } else {
        (
            Line::from("Change graph"),
            state.graph_cursor.get(),
            theme::table_highlight(theme::ACCENT),
        )
    };

    render_list_table(
        frame,
        list_area,
        ListTable {
            title,
            header: &["", "Commit", "Bookmark", "PR", "Author", "Date", "Description"],
            widths: &[
                Constraint::Length(3),
                Constraint::Length(9),
                Constraint::Length(18),
                Constraint::Length(6),
                Constraint::Length(18),
                Constraint::Length(16),
                Constraint::Min(20),
            ],
            rows,
            selected,
            highlight,
        },
    );

    render_change_details(frame, details_area, state, repository);
}

fn change_marker(change: &ChangeSet) -> Span<'static> {
    if change.is_working_copy {
        Span::styled("@", theme::working_copy())
    } else if change.has_conflicts {
        Span::styled("×", theme::conflict())
    } else if change.is_immutable {
        Span::styled("◆", theme::immutable())
    } else {
        Span::raw("○")
    }
}

fn change_style(change: &ChangeSet) -> Style {
    if change.is_immutable {
        theme::immutable()
    } else if change.has_conflicts {
        theme::conflict()
    } else {
        Style::default()
    }
}

fn bookmark_cell(repository: &Repository, index: usize, change: &ChangeSet) -> Line<'static> {
    if !change.bookmarks.is_empty() {
        return Line::from(Span::styled(change.bookmarks.join(", "), theme::bookmark()));
    }
    match repository.facts().bookmark(index) {
        Some(name) => Line::from(Span::styled(format!("↳ {name}"), theme::inherited_bookmark())),
        None => Line::default(),
    }
}

fn pull_request_cell(repository: &Repository, index: usize) -> Line<'static> {
    repository
        .facts()
        .pull_request_branch(index)
        .and_then(|branch| repository.open_pull_request_for(branch))
        .map(|pull_request| {
            Line::from(Span::styled(
                format!("#{}", pull_request.number),
                theme::check_status(pull_request.checks),
            ))
        })
        .unwrap_or_default()
}

fn render_change_details(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    repository: &Repository,
) {
    let Some((index, change)) = state.selected_change() else {
        frame.render_widget(placeholder("Details", "Nothing selected."), area);
        return;
    };

    let mut lines = vec![
        label_value_line("Change", change.change_id.clone()),
        label_value_line("Commit", change.id.clone()),
        label_value_line("Author", format!("{} <{}>", change.author, change.email)),
        label_value_line("Date", format_change_date(&change.date)),
    ];
    if let Some(name) = repository.facts().bookmark(index) {
        let origin = if change.bookmarks.iter().any(|own| own == name) {
            ""
        } else {
            " (inherited)"
        };
        lines.push(label_value_line("Branch", format!("{name}{origin}")));
    }
    if let Some(pull_request) = repository
        .facts()
        .pull_request_branch(index)
        .and_then(|branch| repository.open_pull_request_for(branch))
    {
        lines.push(pull_request_summary_line(pull_request));
    }
    if change.is_immutable {
        lines.push(Line::from(Span::styled("immutable", theme::immutable())));
    }
    if change.has_conflicts {
        lines.push(Line::from(Span::styled("has conflicts", theme::conflict())));
    }

    lines.push(Line::default());
    lines.extend(
        change
            .description
            .trim_end()
            .lines()
            .map(|line| Line::from(line.to_string())),
    );

    lines.push(Line::default());
    lines.push(focus_line("Files"));
    let files = &state.changed_files;
    if files.loading {
        lines.push(Line::from(Span::styled("loading...", theme::secondary_text())));
    } else if files.files.is_empty() {
        lines.push(Line::from(Span::styled("(no changes)", theme::secondary_text())));
    } else {
        lines.extend(files.files.iter().map(|file| {
            Line::from(vec![
                Span::styled(format!("{} ", file.status.code()), theme::table_header()),
                Span::raw(file.path.clone()),
            ])
        }));
    }

    let title = format!("Details {}", change.short_id);
    frame.render_widget(
        wrapped_paragraph(Text::from(lines)).block(theme::chrome(title)),
        area,
    );
}

fn pull_request_summary_line(pull_request: &PullRequest) -> Line<'static> {
    Line::from(vec![
        Span::styled("Pull request: ", theme::secondary_text()),
        Span::styled(
            format!("#{} {}", pull_request.number, pull_request.state),
            theme::pull_request_state(pull_request.state),
        ),
        Span::raw(" "),
        Span::styled(
            checks_label(pull_request.checks),
            theme::check_status(pull_request.checks),
        ),
    ])
}

fn checks_label(status: Option<CheckStatus>) -> &'static str {
    match status {
        Some(CheckStatus::Passing) => "checks passing",
        Some(CheckStatus::Failing) => "checks failing",
        Some(CheckStatus::Pending) => "checks pending",
        None => "no checks",
    }
}

fn review_label(status: Option<ReviewStatus>) -> &'static str {
    match status {
        Some(ReviewStatus::Approved) => "approved",
        Some(ReviewStatus::ChangesRequested) => "changes requested",
        Some(ReviewStatus::ReviewRequired) => "review required",
        None => "",
    }
}

pub(crate) fn render_pull_requests(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if state.pull_requests.is_empty() {
        frame.render_widget(
            placeholder("Pull requests", "No pull requests for this repository."),
            area,
        );
        return;
    }

    let [list_area, details_area] = split_with_details(area, 8);
    let rows = state
        .pull_requests
        .iter()
        .map(|pull_request| {
            Row::new(vec![
                Cell::from(format!("#{}", pull_request.number)),
                Cell::from(Span::styled(
                    pull_request.state.to_string(),
                    theme::pull_request_state(pull_request.state),
                )),
                Cell::from(pull_request.title.clone()),
                Cell::from(format!(
                    "{} → {}",
                    pull_request.head_branch, pull_request.base_branch
                )),
                Cell::from(Span::styled(
                    checks_label(pull_request.checks),
                    theme::check_status(pull_request.checks),
                )),
                Cell::from(review_label(pull_request.review)),
            ])
        })
        .collect();

    render_list_table(
        frame,
        list_area,
        ListTable {
            title: Line::from("Pull requests"),
            header: &["#", "State", "Title", "Branch", "Checks", "Review"],
            widths: &[
                Constraint::Length(6),
                Constraint::Length(7),
                Constraint::Min(20),
                Constraint::Length(24),
                Constraint::Length(15),
                Constraint::Length(17),
            ],
            rows,
            selected: state.pull_request_cursor.get(),
            highlight: theme::table_highlight(theme::ACCENT),
        },
    );

    let Some(pull_request) = state.selected_pull_request() else {
        return;
    };
    let mut lines = vec![
        focus_line(pull_request.title.clone()),
        label_value_line("URL", pull_request.url.clone()),
        Line::default(),
    ];
    if pull_request.body.trim().is_empty() {
        lines.push(Line::from(Span::styled("(no body)", theme::secondary_text())));
    } else {
        lines.extend(
            pull_request
                .body
                .lines()
                .map(|line| Line::from(line.to_string())),
        );
    }
    frame.render_widget(
        wrapped_paragraph(Text::from(lines))
            .block(theme::chrome(format!("#{}", pull_request.number))),
        details_area,
    );
}

pub(crate) fn render_tickets(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if state.tickets.is_empty() {
        let message = if state.config.tickets.provider == TicketProviderKind::None {
            "No ticket provider configured. Press , to pick one."
        } else {
            "No tickets assigned to you."
        };
        frame.render_widget(placeholder("Tickets", message), area);
        return;
    }

    let [list_area, details_area] = split_with_details(area, 8);
    let rows = state
        .tickets
        .iter()
        .map(|ticket| {
            Row::new(vec![
                Cell::from(ticket.display_key.clone()),
                Cell::from(ticket.status.clone()),
                Cell::from(ticket.kind.clone()),
                Cell::from(ticket.priority.clone()),
                Cell::from(ticket.summary.clone()),
            ])
        })
        .collect();

    render_list_table(
        frame,
        list_area,
        ListTable {
            title: Line::from("Tickets"),
            header: &["Key", "Status", "Type", "Priority", "Summary"],
            widths: &[
                Constraint::Length(12),
                Constraint::Length(14),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Min(20),
            ],
            rows,
            selected: state.ticket_cursor.get(),
            highlight: theme::table_highlight(theme::ACCENT),
        },
    );

    let Some(ticket) = state.selected_ticket() else {
        return;
    };
    let mut lines = vec![focus_line(ticket.summary.clone())];
    if let Some(url) = ticket.web_url.as_ref() {
        lines.push(label_value_line("URL", url.clone()));
    }
    lines.push(Line::default());
    lines.extend(
        ticket
            .description
            .lines()
            .map(|line| Line::from(line.to_string())),
    );
    frame.render_widget(
        wrapped_paragraph(Text::from(lines)).block(theme::chrome(ticket.display_key.clone())),
        details_area,
    );
}
