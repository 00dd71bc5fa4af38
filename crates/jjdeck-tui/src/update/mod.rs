//! The dashboard's state machine.
//!
//! `update` is the only place `AppState` changes. It never blocks: anything
//! that talks to jj, GitHub or a ticket tracker comes back as a `Command` for
//! the scheduler, whose result re-enters here as a message.

mod actions;
mod input;
mod results;
#[cfg(test)]
mod tests;

use crate::command::Command;
use crate::msg::Msg;
use crate::state::{AppState, Viewport};

pub(crate) fn initial_commands(state: &mut AppState) -> Vec<Command> {
    state.start_progress("Loading repository...");
    vec![Command::LoadRepository, Command::LoadTickets]
}

pub(crate) fn update(state: &mut AppState, msg: Msg) -> Vec<Command> {
    match msg {
        Msg::Key(key) => input::on_key(state, key),
        Msg::Mouse(mouse) => input::on_mouse(state, mouse),
        Msg::Resize { width, height } => {
            state.viewport = Viewport { width, height };
            Vec::new()
        }
        Msg::Tick => on_tick(state),
        Msg::Action(action) => actions::dispatch(state, action),
        result => results::on_result(state, result),
    }
}

fn on_tick(state: &mut AppState) -> Vec<Command> {
    let halted = state.error.is_some();
    let suppressed = state.refresh_suppressed();
    if state.refresh.on_tick(halted, suppressed) {
        vec![Command::RefreshRepository]
    } else {
        Vec::new()
    }
}

/// Asks for the selected change-set's files unless they are already shown.
///
/// Commit ids are content hashes, so a matching id means the files shown are current.
fn request_changed_files(state: &mut AppState) -> Vec<Command> {
    let Some(id) = state.selected_change().map(|(_, change)| change.id.clone()) else {
        state.changed_files = Default::default();
        return Vec::new();
    };
    if state.changed_files.id.as_deref() == Some(id.as_str()) {
        return Vec::new();
    }

    state.changed_files.id = Some(id.clone());
    state.changed_files.files.clear();
    state.changed_files.loading = true;
    vec![Command::LoadChangedFiles { id }]
}
