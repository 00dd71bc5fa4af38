use jjdeck_app::ContinuePullRequest;
use jjdeck_core::graph::{PullRequestAction, nearest_ancestor_bookmark, pull_request_action};
use jjdeck_core::model::ChangeSet;
use jjdeck_core::names::{bookmark_name_for_ticket, ticket_prefix};
use jjdeck_core::vcs::Mutation;

use super::request_changed_files;
use crate::bookmark_flow::BookmarkFlow;
use crate::command::Command;
use crate::editor_flow::{DescriptionEditor, LoginForm, PullRequestEditor};
use crate::msg::Action;
use crate::rebase_flow::{RebaseOutcome, RebaseState};
use crate::settings_flow::SettingsForm;
use crate::state::{AppState, LIST_VIEWS, StatusKind, ViewMode};

pub(super) fn dispatch(state: &mut AppState, action: Action) -> Vec<Command> {
    if state.error.is_some() && !action.allowed_during_error() {
        return Vec::new();
    }

    match action {
        Action::MoveUp | Action::MoveDown | Action::MoveFirst | Action::MoveLast => {
            navigate(state, action)
        }

        Action::Checkout => with_mutable_change(state, "edit", |change| {
            Some(Mutation::Checkout {
                id: change.id.clone(),
            })
        }),
        Action::Squash => with_mutable_change(state, "squash", |change| {
            Some(Mutation::Squash {
                id: change.id.clone(),
            })
        }),
        Action::Abandon => with_mutable_change(state, "abandon", |change| {
            Some(Mutation::Abandon {
                id: change.id.clone(),
            })
        }),
        Action::NewChange => match state.selected_change() {
            Some((_, change)) => {
                let mutation = Mutation::NewChange {
                    parent: change.id.clone(),
                };
                run_mutation(state, mutation)
            }
            None => Vec::new(),
        },
        Action::DeleteBookmark => delete_bookmark(state),
        Action::Push => push(state),
        Action::Rebase => start_rebase(state),
        Action::Describe => describe(state),
        Action::Bookmark => open_bookmark(state, None),
        Action::PullRequest => pull_request(state),

        Action::EditPullRequest => edit_pull_request(state),
        Action::Transitions => load_transitions(state),
        Action::BookmarkFromTicket => bookmark_from_ticket(state),

        Action::Refresh => refresh(state),
        Action::OpenInBrowser => open_in_browser(state),
        Action::ShowGraph => show(state, ViewMode::Graph),
        Action::ShowPullRequests => show(state, ViewMode::PullRequests),
        Action::ShowTickets => show(state, ViewMode::Tickets),
        Action::NextView => {
            let current = LIST_VIEWS
                .iter()
                .position(|view| *view == state.list_view())
                .unwrap_or(0);
            show(state, LIST_VIEWS[(current + 1) % LIST_VIEWS.len()])
        }
        Action::OpenSettings => {
            state.settings = Some(SettingsForm::new(&state.config));
            state.open_modal(ViewMode::Settings);
            Vec::new()
        }
        Action::OpenLogin => {
            state.login = Some(LoginForm::default());
            state.open_modal(ViewMode::Login);
            Vec::new()
        }
        Action::ToggleHelp => {
            if state.view == ViewMode::Help {
                state.close_modal();
            } else if state.view.is_list() {
                state.open_modal(ViewMode::Help);
            }
            Vec::new()
        }
        Action::Quit => {
            state.should_quit = true;
            Vec::new()
        }

        Action::Confirm => confirm(state),
        Action::Cancel => cancel(state),

        Action::Retry => retry(state),
        Action::Dismiss => dismiss(state),
        Action::InitRepository => init_repository(state),
    }
}

pub(super) fn run_mutation(state: &mut AppState, mutation: Mutation) -> Vec<Command> {
    state.start_progress(format!("Running {mutation}..."));
    vec![Command::Mutate(mutation)]
}

fn warn(state: &mut AppState, message: impl Into<String>) -> Vec<Command> {
    state.set_status(StatusKind::Warning, message);
    Vec::new()
}

/// Runs `build` on the selected change-set unless it is immutable.
fn with_mutable_change<F>(state: &mut AppState, verb: &str, build: F) -> Vec<Command>
where
    F: FnOnce(&ChangeSet) -> Option<Mutation>,
{
    let Some((_, change)) = state.selected_change() else {
        return Vec::new();
    };
    if change.is_immutable {
        let message = immutable_message(verb, change);
        return warn(state, message);
    }
    match build(change) {
        Some(mutation) => run_mutation(state, mutation),
        None => Vec::new(),
    }
}

fn immutable_message(verb: &str, change: &ChangeSet) -> String {
    format!("cannot {verb} {}: change is immutable", change.short_id)
}

fn navigate(state: &mut AppState, action: Action) -> Vec<Command> {
    if state.rebase.is_picking() {
        let len = state.graph_len();
        match action {
            Action::MoveUp => state.rebase.move_up(),
            Action::MoveDown => state.rebase.move_down(len),
            Action::MoveFirst => state.rebase.move_to(0),
            Action::MoveLast => state.rebase.move_to(len.saturating_sub(1)),
            _ => {}
        }
        return Vec::new();
    }

    if let Some(picker) = state.transitions.as_mut() {
        let last = picker.transitions.len().saturating_sub(1);
        picker.selected = match action {
            Action::MoveUp => picker.selected.saturating_sub(1),
            Action::MoveDown => (picker.selected + 1).min(last),
            Action::MoveFirst => 0,
            _ => last,
        };
        return Vec::new();
    }

    let len = match state.view {
        ViewMode::Graph => state.graph_len(),
        ViewMode::PullRequests => state.pull_requests.len(),
        ViewMode::Tickets => state.tickets.len(),
        _ => return Vec::new(),
    };
    let cursor = match state.view {
        ViewMode::PullRequests => &mut state.pull_request_cursor,
        ViewMode::Tickets => &mut state.ticket_cursor,
        _ => &mut state.graph_cursor,
    };
    match action {
        Action::MoveUp => cursor.up(len),
        Action::MoveDown => cursor.down(len),
        Action::MoveFirst => cursor.first(len),
        _ => cursor.last(len),
    }

    if state.view == ViewMode::Graph {
        request_changed_files(state)
    } else {
        Vec::new()
    }
}

fn show(state: &mut AppState, view: ViewMode) -> Vec<Command> {
    if state.view.is_list() {
        state.view = view;
    }
    Vec::new()
}

fn delete_bookmark(state: &mut AppState) -> Vec<Command> {
    let Some((_, change)) = state.selected_change() else {
        return Vec::new();
    };
    match change.bookmarks.first() {
        Some(name) => {
            let mutation = Mutation::DeleteBookmark { name: name.clone() };
            run_mutation(state, mutation)
        }
        None => {
            let message = format!("{} has no bookmark to delete", change.short_id);
            warn(state, message)
        }
    }
}

fn push(state: &mut AppState) -> Vec<Command> {
    let Some((_, change)) = state.selected_change() else {
        return Vec::new();
    };
    match change.bookmarks.first() {
        Some(name) => {
            let mutation = Mutation::Push {
                bookmark: name.clone(),
            };
            run_mutation(state, mutation)
        }
        None => {
            let message = format!("{} has no bookmark to push; press b to add one", change.short_id);
            warn(state, message)
        }
    }
}

fn start_rebase(state: &mut AppState) -> Vec<Command> {
    let Some((index, change)) = state.selected_change() else {
        return Vec::new();
    };
    if change.is_immutable {
        let message = immutable_message("rebase", change);
        return warn(state, message);
    }
    let Some(rebase) = state
        .repository
        .as_ref()
        .and_then(|repository| RebaseState::start(repository.graph(), index))
    else {
        return Vec::new();
    };

    state.rebase = rebase;
    state.set_status(
        StatusKind::Info,
        "Pick a destination and press Enter, or Esc to cancel",
    );
    Vec::new()
}

fn describe(state: &mut AppState) -> Vec<Command> {
    let Some((index, change)) = state.selected_change() else {
        return Vec::new();
    };
    if change.is_immutable {
        let message = immutable_message("describe", change);
        return warn(state, message);
    }

    let prefix = state
        .repository
        .as_ref()
        .and_then(|repository| nearest_ancestor_bookmark(repository.graph(), index))
        .and_then(ticket_prefix);
    let editor = DescriptionEditor::new(change, prefix);
    let id = editor.id.clone();

    state.description = Some(editor);
    state.open_modal(ViewMode::EditDescription);
    vec![Command::FetchDescription { id }]
}

fn open_bookmark(state: &mut AppState, suggestion: Option<String>) -> Vec<Command> {
    let Some(repository) = state.repository.as_ref() else {
        return Vec::new();
    };
    let Some((_, change)) = state.selected_change() else {
        return Vec::new();
    };
    if change.is_immutable {
        let message = immutable_message("move a bookmark onto", change);
        return warn(state, message);
    }

    let flow = BookmarkFlow::new(change, repository.graph().bookmark_names(), suggestion);
    state.bookmark = Some(flow);
    state.open_modal(ViewMode::Bookmark);
    Vec::new()
}

fn bookmark_from_ticket(state: &mut AppState) -> Vec<Command> {
    if state.selected_change().is_none() {
        return warn(state, "select a change in the graph first");
    }
    let Some(ticket) = state.selected_ticket() else {
        return Vec::new();
    };
    let suggestion = bookmark_name_for_ticket(&ticket.display_key);
    open_bookmark(state, Some(suggestion))
}

fn pull_request(state: &mut AppState) -> Vec<Command> {
    let Some(repository) = state.repository.as_ref() else {
        return Vec::new();
    };
    let Some((index, change)) = state.selected_change() else {
        return Vec::new();
    };

    let action = pull_request_action(
        repository.graph(),
        repository.facts(),
        repository.pull_requests(),
        index,
    );
    match action {
        PullRequestAction::NeedsBookmark => {
            let message = format!("{} has no bookmark; press b to create one", change.short_id);
            warn(state, message)
        }
        PullRequestAction::Continue {
            attached: false, ..
        }
        | PullRequestAction::Create {
            attached: false, ..
        } if change.is_immutable => {
            let message = immutable_message("move a bookmark onto", change);
            warn(state, message)
        }
        PullRequestAction::Continue {
            branch,
            number,
            attached,
        } => {
            let request = ContinuePullRequest {
                change_id: change.id.clone(),
                branch,
                move_bookmark: !attached,
            };
            state.start_progress(format!(
                "Pushing {} to pull request #{number}...",
                request.branch
            ));
            vec![Command::ContinuePullRequest(request)]
        }
        PullRequestAction::Create { branch, attached } => {
            let editor = PullRequestEditor::for_change(change, &branch, !attached);
            state.pull_request_editor = Some(editor);
            state.open_modal(ViewMode::EditPullRequest);
            Vec::new()
        }
    }
}

fn edit_pull_request(state: &mut AppState) -> Vec<Command> {
    let Some(pull_request) = state.selected_pull_request() else {
        return Vec::new();
    };
    state.pull_request_editor = Some(PullRequestEditor::for_pull_request(pull_request));
    state.open_modal(ViewMode::EditPullRequest);
    Vec::new()
}

fn load_transitions(state: &mut AppState) -> Vec<Command> {
    let Some(ticket) = state.selected_ticket() else {
        return Vec::new();
    };
    let key = ticket.key.clone();
    let message = format!("Loading transitions for {}...", ticket.display_key);
    state.set_status(StatusKind::Info, message);
    vec![Command::LoadTransitions { key }]
}

fn refresh(state: &mut AppState) -> Vec<Command> {
    state.refresh.arm();
    state.start_progress("Reloading...");
    state.pull_requests_requested = true;
    vec![
        Command::LoadRepository,
        Command::LoadPullRequests,
        Command::LoadTickets,
    ]
}

fn open_in_browser(state: &mut AppState) -> Vec<Command> {
    let url = match state.list_view() {
        ViewMode::PullRequests => state.selected_pull_request().map(|pr| pr.url.clone()),
        ViewMode::Tickets => {
            return match state.selected_ticket() {
                Some(ticket) => vec![Command::OpenTicket {
                    key: ticket.key.clone(),
                }],
                None => warn(state, "nothing to open for the selection"),
            };
        }
        _ => state.repository.as_ref().and_then(|repository| {
            let (index, _) = state.selected_change()?;
            let branch = repository.facts().pull_request_branch(index)?;
            repository
                .open_pull_request_for(branch)
                .map(|pr| pr.url.clone())
        }),
    };

    match url {
        Some(url) => vec![Command::OpenUrl(url)],
        None => warn(state, "nothing to open for the selection"),
    }
}

fn confirm(state: &mut AppState) -> Vec<Command> {
    if state.rebase.is_picking() {
        let outcome = state
            .repository
            .as_ref()
            .and_then(|repository| state.rebase.confirm(repository.graph()));
        state.rebase = RebaseState::Normal;
        return match outcome {
            Some(RebaseOutcome::Rebase(mutation)) => run_mutation(state, mutation),
            Some(RebaseOutcome::OntoItself) => warn(state, "cannot rebase a change onto itself"),
            None => Vec::new(),
        };
    }

    if let Some(picker) = state.transitions.take() {
        let Some(transition) = picker.transitions.get(picker.selected) else {
            return Vec::new();
        };
        state.set_status(
            StatusKind::Progress,
            format!("Moving {} to {}...", picker.display_key, transition.name),
        );
        return vec![Command::ApplyTransition {
            key: picker.key.clone(),
            transition_id: transition.id.clone(),
            name: transition.name.clone(),
        }];
    }

    Vec::new()
}

fn cancel(state: &mut AppState) -> Vec<Command> {
    if state.rebase.is_picking() {
        state.rebase.cancel();
        return warn(state, "Rebase canceled");
    }
    if state.transitions.take().is_some() {
        return Vec::new();
    }
    if state.view == ViewMode::Help {
        state.close_modal();
    }
    Vec::new()
}

fn retry(state: &mut AppState) -> Vec<Command> {
    state.error = None;
    state.refresh.arm();
    state.start_progress("Loading repository...");
    vec![Command::LoadRepository]
}

/// Clears the error and puts the dashboard back on the change graph.
fn dismiss(state: &mut AppState) -> Vec<Command> {
    state.error = None;
    state.rebase = RebaseState::Normal;
    state.transitions = None;
    state.close_modal();
    state.view = ViewMode::Graph;
    state.return_view = ViewMode::Graph;
    state.refresh.arm();
    Vec::new()
}

fn init_repository(state: &mut AppState) -> Vec<Command> {
    if !state
        .error
        .as_ref()
        .is_some_and(|error| error.is_no_repository())
    {
        return Vec::new();
    }
    state.error = None;
    state.refresh.arm();
    state.start_progress("Initializing jj repository...");
    vec![Command::InitRepository]
}
