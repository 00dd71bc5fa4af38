use std::io::{Stdout, stdout};

use anyhow::{Context, Result, anyhow};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

type Op<'a> = Box<dyn FnMut() -> Result<()> + 'a>;

/// One reversible piece of terminal setup.
struct SetupStep<'a> {
    apply: Op<'a>,
    undo: Op<'a>,
}

impl<'a> SetupStep<'a> {
    fn new(
        apply: impl FnMut() -> Result<()> + 'a,
        undo: impl FnMut() -> Result<()> + 'a,
    ) -> Self {
        Self {
            apply: Box::new(apply),
            undo: Box::new(undo),
        }
    }
}

/// Raw mode, alternate screen and mouse capture, restored on drop.
pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub(crate) fn enter() -> Result<Self> {
        let terminal = enter_with_steps(standard_steps(), || {
            Terminal::new(CrosstermBackend::new(stdout()))
                .context("failed to create terminal backend")
        })?;
        Ok(Self { terminal })
    }

    pub(crate) fn draw<F>(&mut self, draw_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame<'_>),
    {
        self.terminal
            .draw(draw_fn)
            .context("failed to render terminal")?;
        Ok(())
    }

    pub(crate) fn autoresize(&mut self) -> Result<()> {
        self.terminal
            .autoresize()
            .context("failed to autoresize terminal")
    }

    pub(crate) fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size().context("failed to read terminal size")?;
        Ok((size.width, size.height))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        leave_with_steps(standard_steps());
    }
}

fn standard_steps() -> Vec<SetupStep<'static>> {
    vec![
        SetupStep::new(
            || enable_raw_mode().context("failed to enable raw mode"),
            || disable_raw_mode().context("failed to disable raw mode"),
        ),
        SetupStep::new(
            || {
                let mut out = stdout();
                execute!(out, EnterAlternateScreen, Hide)
                    .context("failed to enter alternate screen")
            },
            || {
                let mut out = stdout();
                execute!(out, Show, LeaveAlternateScreen)
                    .context("failed to restore terminal screen")
            },
        ),
        SetupStep::new(
            || {
                let mut out = stdout();
                execute!(out, EnableMouseCapture).context("failed to enable mouse capture")
            },
            || {
                let mut out = stdout();
                execute!(out, DisableMouseCapture).context("failed to disable mouse capture")
            },
        ),
    ]
}

/// Applies `steps` in order, then builds the terminal.
///
/// On failure every step that already succeeded is undone in reverse order;
/// cleanup failures are appended to the setup error rather than replacing it.
fn enter_with_steps<T>(
    mut steps: Vec<SetupStep<'_>>,
    create: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let mut applied = 0;
    let mut failure = None;
    for step in steps.iter_mut() {
        if let Err(error) = (step.apply)() {
            failure = Some(error);
            break;
        }
        applied += 1;
    }

    let setup_error = match failure {
        None => match create() {
            Ok(terminal) => return Ok(terminal),
            Err(error) => error,
        },
        Some(error) => error,
    };

    let cleanup_failures: Vec<String> = steps[..applied]
        .iter_mut()
        .rev()
        .filter_map(|step| (step.undo)().err())
        .map(|error| format!("{error:#}"))
        .collect();
    if cleanup_failures.is_empty() {
        Err(setup_error)
    } else {
        Err(anyhow!(
            "{setup_error:#}\nterminal rollback cleanup failed: {}",
            cleanup_failures.join("\n")
        ))
    }
}

/// Undoes every step in reverse, ignoring failures.
fn leave_with_steps(mut steps: Vec<SetupStep<'_>>) {
    for step in steps.iter_mut().rev() {
        let _ = (step.undo)();
    }
}
