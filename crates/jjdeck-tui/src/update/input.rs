use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};

use super::actions::{self, run_mutation};
use crate::FlowSignal;
use crate::command::Command;
use crate::editor_flow::PullRequestSubmission;
use crate::keymap;
use crate::msg::Action;
use crate::state::{AppState, ViewMode};

pub(super) fn on_key(state: &mut AppState, key: KeyEvent) -> Vec<Command> {
    if keymap::is_ctrl_c(key) {
        state.should_quit = true;
        return Vec::new();
    }

    if let Some(scope) = state.input_scope() {
        return match keymap::action_for(scope, key) {
            Some(action) => actions::dispatch(state, action),
            None => Vec::new(),
        };
    }

    match state.view {
        ViewMode::Settings => on_settings_key(state, key),
        ViewMode::EditDescription => on_description_key(state, key),
        ViewMode::EditPullRequest => on_pull_request_key(state, key),
        ViewMode::Bookmark => on_bookmark_key(state, key),
        ViewMode::Login => on_login_key(state, key),
        ViewMode::Graph | ViewMode::PullRequests | ViewMode::Tickets | ViewMode::Help => {
            Vec::new()
        }
    }
}

/// The wheel scrolls whatever list has focus; editors ignore it.
pub(super) fn on_mouse(state: &mut AppState, mouse: MouseEvent) -> Vec<Command> {
    if state.error.is_some() || state.input_scope().is_none() {
        return Vec::new();
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => actions::dispatch(state, Action::MoveUp),
        MouseEventKind::ScrollDown => actions::dispatch(state, Action::MoveDown),
        _ => Vec::new(),
    }
}

fn on_settings_key(state: &mut AppState, key: KeyEvent) -> Vec<Command> {
    let Some(form) = state.settings.as_mut() else {
        state.close_modal();
        return Vec::new();
    };
    match form.on_key(key) {
        FlowSignal::Continue => Vec::new(),
        FlowSignal::Cancel => {
            state.close_modal();
            Vec::new()
        }
        FlowSignal::Submit(config) => {
            state.close_modal();
            state.start_progress("Saving settings...");
            vec![Command::SaveSettings(config)]
        }
    }
}

fn on_description_key(state: &mut AppState, key: KeyEvent) -> Vec<Command> {
    let Some(editor) = state.description.as_mut() else {
        state.close_modal();
        return Vec::new();
    };
    match editor.on_key(key) {
        FlowSignal::Continue => Vec::new(),
        FlowSignal::Cancel => {
            state.close_modal();
            Vec::new()
        }
        FlowSignal::Submit(mutation) => {
            state.close_modal();
            run_mutation(state, mutation)
        }
    }
}

fn on_pull_request_key(state: &mut AppState, key: KeyEvent) -> Vec<Command> {
    let Some(editor) = state.pull_request_editor.as_mut() else {
        state.close_modal();
        return Vec::new();
    };
    match editor.on_key(key) {
        FlowSignal::Continue => Vec::new(),
        FlowSignal::Cancel => {
            state.close_modal();
            Vec::new()
        }
        FlowSignal::Submit(PullRequestSubmission::Create(request)) => {
            state.close_modal();
            state.start_progress(format!(
                "Pushing {} and opening a pull request...",
                request.branch
            ));
            vec![Command::CreatePullRequest(request)]
        }
        FlowSignal::Submit(PullRequestSubmission::Update {
            number,
            title,
            body,
        }) => {
            state.close_modal();
            state.start_progress(format!("Updating pull request #{number}..."));
            vec![Command::UpdatePullRequest {
                number,
                title,
                body,
            }]
        }
    }
}

fn on_bookmark_key(state: &mut AppState, key: KeyEvent) -> Vec<Command> {
    let Some(flow) = state.bookmark.as_mut() else {
        state.close_modal();
        return Vec::new();
    };
    match flow.on_key(key) {
        FlowSignal::Continue => Vec::new(),
        FlowSignal::Cancel => {
            state.close_modal();
            Vec::new()
        }
        FlowSignal::Submit(mutation) => {
            state.close_modal();
            run_mutation(state, mutation)
        }
    }
}

fn on_login_key(state: &mut AppState, key: KeyEvent) -> Vec<Command> {
    let Some(form) = state.login.as_mut() else {
        state.close_modal();
        return Vec::new();
    };
    match form.on_key(key) {
        FlowSignal::Continue => Vec::new(),
        FlowSignal::Cancel => {
            state.close_modal();
            Vec::new()
        }
        FlowSignal::Submit(token) => {
            state.close_modal();
            state.start_progress("Saving GitHub token...");
            vec![Command::SaveGithubToken(token)]
        }
    }
}
