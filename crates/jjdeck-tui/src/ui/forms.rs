use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use tui_input::Input;

use crate::bookmark_flow::BookmarkMode;
use crate::editor_flow::PullRequestField;
use crate::settings_flow::{FieldKind, SETTINGS_TABS};
use crate::state::AppState;
use crate::text_buffer::TextBuffer;
use crate::theme;
use crate::ui::modal::{ModalSpec, render_modal};
use crate::ui::text::{focus_line, masked, wrapped_paragraph};

struct InputView<'a> {
    title: Line<'a>,
    input: &'a Input,
    focused: bool,
    secret: bool,
}

/// Single-line input with horizontal scrolling; the cursor is only placed when focused.
fn render_input(frame: &mut Frame<'_>, area: Rect, view: InputView<'_>) {
    let width = area.width.saturating_sub(2) as usize;
    let scroll = view.input.visual_scroll(width);
    let value = if view.secret {
        masked(view.input.value())
    } else {
        view.input.value().to_string()
    };
    let block = if view.focused {
        theme::chrome(view.title).border_style(theme::focus_prompt())
    } else {
        theme::chrome(view.title)
    };
    frame.render_widget(
        Paragraph::new(value).scroll((0, scroll as u16)).block(block),
        area,
    );

    if !view.focused || width == 0 {
        return;
    }
    let visual = view.input.visual_cursor();
    let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
    frame.set_cursor_position((area.x + 1 + relative as u16, area.y + 1));
}

/// Multi-line editor view scrolled so the cursor stays visible.
fn render_text_buffer(
    frame: &mut Frame<'_>,
    area: Rect,
    title: Line<'_>,
    buffer: &TextBuffer,
    focused: bool,
) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let (row, col) = buffer.cursor();
    let scroll_y = row.saturating_sub(inner_height.saturating_sub(1));
    let scroll_x = col.saturating_sub(inner_width.saturating_sub(1));

    let text = Text::from(
        buffer
            .lines()
            .iter()
            .map(|line| Line::from(line.clone()))
            .collect::<Vec<_>>(),
    );
    let block = if focused {
        theme::chrome(title).border_style(theme::focus_prompt())
    } else {
        theme::chrome(title)
    };
    frame.render_widget(
        Paragraph::new(text)
            .scroll((scroll_y as u16, scroll_x as u16))
            .block(block),
        area,
    );

    if focused && inner_width > 0 && inner_height > 0 {
        frame.set_cursor_position((
            area.x + 1 + (col - scroll_x) as u16,
            area.y + 1 + (row - scroll_y) as u16,
        ));
    }
}

fn error_line(error: Option<&String>) -> Paragraph<'_> {
    let line = match error {
        Some(message) => Line::from(Span::styled(message.as_str(), theme::error_prompt())),
        None => Line::default(),
    };
    wrapped_paragraph(line)
}

fn modal_inner(frame: &mut Frame<'_>, title: &str, width_pct: u16, height_pct: u16) -> Rect {
    let result = render_modal(
        frame,
        ModalSpec {
            title,
            title_style: Some(theme::focus_prompt()),
            body: Text::default(),
            key_hint: None,
            width_pct,
            height_pct,
        },
    );
    result.body_area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    })
}

pub(crate) fn render_settings(frame: &mut Frame<'_>, state: &AppState) {
    let Some(form) = state.settings.as_ref() else {
        return;
    };
    let inner = modal_inner(frame, "Settings", 80, 70);
    let current = form.tab();

    let fields: Vec<_> = form.fields_in(current).collect();
    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(1));
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let tabs: Vec<Span<'_>> = SETTINGS_TABS
        .iter()
        .flat_map(|tab| {
            let style = if *tab == current {
                theme::table_highlight(theme::ACCENT)
            } else {
                theme::secondary_text()
            };
            [Span::styled(format!(" {} ", tab.title()), style), Span::raw("  ")]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(tabs)), areas[0]);

    for (slot, (index, field)) in fields.iter().enumerate() {
        let focused = *index == form.focus;
        let title = if focused {
            focus_line(field.label)
        } else {
            Line::from(field.label)
        };
        let area = areas[slot + 1];
        if field.kind == FieldKind::Choice {
            let value = format!("< {} >", field.input.value());
            let block = if focused {
                theme::chrome(title).border_style(theme::focus_prompt())
            } else {
                theme::chrome(title)
            };
            frame.render_widget(Paragraph::new(value).block(block), area);
            continue;
        }
        render_input(
            frame,
            area,
            InputView {
                title,
                input: &field.input,
                focused,
                secret: field.kind == FieldKind::Secret,
            },
        );
    }

    if let Some(last) = areas.last() {
        frame.render_widget(error_line(form.error.as_ref()), *last);
    }
}

pub(crate) fn render_description(frame: &mut Frame<'_>, state: &AppState) {
    let Some(editor) = state.description.as_ref() else {
        return;
    };
    let title = format!("Describe {}", editor.short_id);
    let inner = modal_inner(frame, &title, 80, 60);

    if editor.loading {
        frame.render_widget(
            wrapped_paragraph(Span::styled(
                "Loading description...",
                theme::secondary_text(),
            )),
            inner,
        );
        return;
    }
    render_text_buffer(frame, inner, Line::from("Description"), &editor.buffer, true);
}

pub(crate) fn render_pull_request_editor(frame: &mut Frame<'_>, state: &AppState) {
    let Some(editor) = state.pull_request_editor.as_ref() else {
        return;
    };
    let inner = modal_inner(frame, &editor.heading(), 85, 75);
    let [title_area, body_area, error_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(inner);

    render_input(
        frame,
        title_area,
        InputView {
            title: Line::from("Title"),
            input: &editor.title,
            focused: editor.focus == PullRequestField::Title,
            secret: false,
        },
    );
    render_text_buffer(
        frame,
        body_area,
        Line::from("Body"),
        &editor.body,
        editor.focus == PullRequestField::Body,
    );
    frame.render_widget(error_line(editor.error.as_ref()), error_area);
}

pub(crate) fn render_bookmark(frame: &mut Frame<'_>, state: &AppState) {
    let Some(flow) = state.bookmark.as_ref() else {
        return;
    };
    let title = format!("Bookmark {}", flow.target_label);
    let inner = modal_inner(frame, &title, 70, 60);
    let [input_area, list_area, error_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .areas(inner);

    let typing = flow.mode == BookmarkMode::Typing;
    render_input(
        frame,
        input_area,
        InputView {
            title: Line::from("New bookmark name"),
            input: &flow.input,
            focused: typing,
            secret: false,
        },
    );

    let list_title = if typing {
        Line::from("Or move an existing bookmark (Tab)")
    } else {
        focus_line("Move an existing bookmark here")
    };
    let items: Vec<ListItem<'_>> = flow
        .existing
        .iter()
        .map(|name| ListItem::new(Span::styled(name.as_str(), theme::bookmark())))
        .collect();
    let list = List::new(items)
        .block(theme::chrome(list_title))
        .highlight_style(theme::table_highlight(theme::ACCENT));
    let mut list_state = ListState::default();
    if !typing && !flow.existing.is_empty() {
        list_state.select(Some(flow.selected));
    }
    frame.render_stateful_widget(list, list_area, &mut list_state);

    frame.render_widget(error_line(flow.error.as_ref()), error_area);
}

pub(crate) fn render_login(frame: &mut Frame<'_>, state: &AppState) {
    let Some(form) = state.login.as_ref() else {
        return;
    };
    let inner = modal_inner(frame, "GitHub login", 70, 40);
    let [help_area, input_area, error_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(inner);

    frame.render_widget(
        wrapped_paragraph(Span::styled(
            "Paste a personal access token with repo scope. It is stored in the config file.",
            theme::secondary_text(),
        )),
        help_area,
    );
    render_input(
        frame,
        input_area,
        InputView {
            title: Line::from("Token"),
            input: &form.token,
            focused: true,
            secret: true,
        },
    );
    frame.render_widget(error_line(form.error.as_ref()), error_area);
}

pub(crate) fn render_transitions(frame: &mut Frame<'_>, state: &AppState) {
    let Some(picker) = state.transitions.as_ref() else {
        return;
    };
    let title = format!("Move {} to", picker.display_key);
    let inner = modal_inner(frame, &title, 50, 50);

    let items: Vec<ListItem<'_>> = picker
        .transitions
        .iter()
        .map(|transition| ListItem::new(transition.name.as_str()))
        .collect();
    let list = List::new(items)
        .highlight_style(theme::table_highlight(theme::ACCENT))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(picker.selected));
    frame.render_stateful_widget(list, inner, &mut list_state);
}
