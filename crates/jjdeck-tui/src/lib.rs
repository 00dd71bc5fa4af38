mod bookmark_flow;
mod command;
mod editor_flow;
mod keymap;
mod msg;
mod rebase_flow;
mod refresh;
mod scheduler;
mod settings_flow;
mod state;
mod terminal;
mod text_buffer;
mod theme;
mod ui;
mod update;

use std::sync::Arc;
use std::sync::mpsc::TryRecvError;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use jjdeck_app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tracing::{debug, info};

use crate::msg::Msg;
use crate::scheduler::Scheduler;
use crate::state::AppState;
use crate::terminal::TerminalSession;
use crate::update::{initial_commands, update};

const TICK_RATE: Duration = Duration::from_millis(100);

/// What a sub-flow wants after handling a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FlowSignal<T> {
    Continue,
    Cancel,
    Submit(T),
}

/// Runs the dashboard until the user quits.
///
/// Input, worker results and refresh ticks all funnel through `update`; the
/// loop only draws, polls and forwards.
pub fn run(app: Arc<App>) -> Result<()> {
    let mut state = AppState::new(app.config());
    let (scheduler, inbox) = Scheduler::for_app(app);
    scheduler.spawn_all(initial_commands(&mut state));

    let mut session = TerminalSession::enter()?;
    let (width, height) = session.size()?;
    scheduler.spawn_all(update(&mut state, Msg::Resize { width, height }));
    info!("dashboard started");

    let mut last_tick = Instant::now();
    loop {
        session.draw(|frame| ui::render(frame, &state))?;
        if state.should_quit {
            break;
        }

        if event::poll(TICK_RATE).context("failed to poll terminal event")? {
            let msg = match event::read().context("failed to read terminal event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(Msg::Key(key)),
                Event::Mouse(mouse) => Some(Msg::Mouse(mouse)),
                Event::Resize(width, height) => {
                    session.autoresize()?;
                    Some(Msg::Resize { width, height })
                }
                _ => None,
            };
            if let Some(msg) = msg {
                scheduler.spawn_all(update(&mut state, msg));
            }
        }

        loop {
            match inbox.try_recv() {
                Ok(msg) => scheduler.spawn_all(update(&mut state, msg)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("scheduler channel closed");
                    break;
                }
            }
        }

        match state.refresh.interval() {
            Some(interval) if state.refresh.is_armed() => {
                if last_tick.elapsed() >= interval {
                    last_tick = Instant::now();
                    scheduler.spawn_all(update(&mut state, Msg::Tick));
                }
            }
            _ => last_tick = Instant::now(),
        }
    }

    info!("dashboard closed");
    Ok(())
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let pct_x = percent_x.min(100);
    let pct_y = percent_y.min(100);

    let [_, vertical, _] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .areas(area);
    let [_, horizontal, _] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .areas(vertical);
    horizontal
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::centered_rect;

    #[test]
    fn centered_rect_returns_middle_segment() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(80, 60, area);

        assert_eq!(centered, Rect::new(10, 10, 80, 30));
    }

    #[test]
    fn centered_rect_clamps_percentages_over_100() {
        let area = Rect::new(3, 4, 40, 20);
        assert_eq!(centered_rect(120, 150, area), area);
    }
}
