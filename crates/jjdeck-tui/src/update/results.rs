use jjdeck_core::model::{PullRequest, Repository};
use jjdeck_core::vcs::Mutation;
use tracing::debug;

use super::request_changed_files;
use crate::command::Command;
use crate::msg::Msg;
use crate::state::{AppState, StatusKind, TransitionPicker, ViewMode};

pub(super) fn on_result(state: &mut AppState, msg: Msg) -> Vec<Command> {
    match msg {
        Msg::RepositoryLoaded(result) => {
            state.loading = false;
            match result {
                Ok(repository) => {
                    report_load(state, repository.graph().len());
                    apply_repository(state, repository, false)
                }
                Err(error) => {
                    state.fail(error);
                    Vec::new()
                }
            }
        }
        Msg::RepositoryRefreshed(result) => {
            state.refresh.finish();
            match result {
                Ok(_) if state.refresh_suppressed() => {
                    debug!("dropping background reload that raced a foreground operation");
                    Vec::new()
                }
                Ok(repository) => apply_repository(state, repository, true),
                Err(error) => {
                    state.fail(error);
                    Vec::new()
                }
            }
        }
        Msg::PullRequestsLoaded(result) => match result {
            Ok(pull_requests) => {
                set_pull_requests(state, pull_requests);
                Vec::new()
            }
            Err(error) => {
                state.fail(error);
                Vec::new()
            }
        },
        Msg::TicketsLoaded { provider, result } => {
            state.ticket_provider = provider;
            match result {
                Ok(tickets) => {
                    state.tickets = tickets;
                    state.ticket_cursor.clamp(state.tickets.len());
                }
                Err(error) => state.fail(error),
            }
            Vec::new()
        }
        Msg::ChangedFilesLoaded { id, result } => {
            let current = state.selected_change().map(|(_, change)| change.id.as_str());
            if current != Some(id.as_str()) {
                debug!(%id, "dropping changed files for a change that is no longer selected");
                return Vec::new();
            }
            state.changed_files.loading = false;
            match result {
                Ok(files) => state.changed_files.files = files,
                Err(error) => {
                    state.changed_files.id = None;
                    state.fail(error);
                }
            }
            Vec::new()
        }
        Msg::DescriptionLoaded { id, result } => {
            let Some(editor) = state
                .description
                .as_mut()
                .filter(|editor| editor.id == id && state.view == ViewMode::EditDescription)
            else {
                debug!(%id, "dropping description for a closed editor");
                return Vec::new();
            };
            match result {
                Ok(description) => editor.fill(&description),
                Err(error) => {
                    state.close_modal();
                    state.fail(error);
                }
            }
            Vec::new()
        }
        Msg::MutationFinished { mutation, result } => {
            state.loading = false;
            match result {
                Ok(output) => {
                    state.set_status(StatusKind::Success, mutation_summary(&mutation, &output));
                    reload_after(state, mutation.touches_remote())
                }
                Err(error) => {
                    state.fail(error);
                    Vec::new()
                }
            }
        }
        Msg::PullRequestCreated(result) => {
            state.loading = false;
            match result {
                Ok(pull_request) => {
                    state.set_status(
                        StatusKind::Success,
                        format!("Opened pull request #{}", pull_request.number),
                    );
                    upsert_pull_request(state, pull_request);
                    reload_after(state, true)
                }
                Err(error) => {
                    state.fail(error);
                    Vec::new()
                }
            }
        }
        Msg::PullRequestContinued { branch, result } => {
            state.loading = false;
            match result {
                Ok(_) => {
                    state.set_status(StatusKind::Success, format!("Pushed {branch}"));
                    reload_after(state, true)
                }
                Err(error) => {
                    state.fail(error);
                    Vec::new()
                }
            }
        }
        Msg::PullRequestUpdated(result) => {
            state.loading = false;
            match result {
                Ok(pull_request) => {
                    state.set_status(
                        StatusKind::Success,
                        format!("Updated pull request #{}", pull_request.number),
                    );
                    upsert_pull_request(state, pull_request);
                }
                Err(error) => state.fail(error),
            }
            Vec::new()
        }
        Msg::TransitionsLoaded { key, result } => {
            let still_selected = state.view == ViewMode::Tickets
                && state.selected_ticket().is_some_and(|ticket| ticket.key == key);
            match result {
                Ok(_) if !still_selected => {
                    debug!(%key, "dropping transitions for a ticket that is no longer selected");
                }
                Ok(transitions) if transitions.is_empty() => {
                    state.set_status(StatusKind::Warning, format!("{key} has no transitions"));
                }
                Ok(transitions) => {
                    let display_key = state
                        .selected_ticket()
                        .map_or_else(|| key.clone(), |ticket| ticket.display_key.clone());
                    state.status = None;
                    state.transitions = Some(TransitionPicker {
                        key,
                        display_key,
                        transitions,
                        selected: 0,
                    });
                }
                Err(error) => state.fail(error),
            }
            Vec::new()
        }
        Msg::TransitionApplied { key, name, result } => match result {
            Ok(()) => {
                state.set_status(StatusKind::Success, format!("Moved {key} to {name}"));
                vec![Command::LoadTickets]
            }
            Err(error) => {
                state.fail(error);
                Vec::new()
            }
        },
        Msg::SettingsSaved(result) => {
            state.loading = false;
            match result {
                Ok(config) => {
                    state.refresh.set_interval(config.general.refresh_interval_secs);
                    state.config = config;
                    state.set_status(StatusKind::Success, "Settings saved");
                    state.loading = true;
                    vec![
                        Command::LoadRepository,
                        Command::LoadPullRequests,
                        Command::LoadTickets,
                    ]
                }
                Err(error) => {
                    state.fail(error);
                    Vec::new()
                }
            }
        }
        Msg::LoginSaved(result) => {
            state.loading = false;
            match result {
                Ok(config) => {
                    state.config = config;
                    state.set_status(StatusKind::Success, "GitHub token saved");
                    vec![Command::LoadPullRequests]
                }
                Err(error) => {
                    state.fail(error);
                    Vec::new()
                }
            }
        }
        Msg::RepositoryInitialized(result) => match result {
            Ok(()) => {
                state.start_progress("Initialized jj repository; loading...");
                vec![Command::LoadRepository]
            }
            Err(error) => {
                state.fail(error);
                Vec::new()
            }
        },
        Msg::UrlOpened(result) => {
            if let Err(error) = result {
                state.fail(error);
            }
            Vec::new()
        }
        Msg::Key(_)
        | Msg::Mouse(_)
        | Msg::Resize { .. }
        | Msg::Tick
        | Msg::Action(_) => Vec::new(),
    }
}

/// Foreground loads always report; an outcome already on the status line keeps
/// its text and gains the change-set count.
fn report_load(state: &mut AppState, count: usize) {
    match state.status.take() {
        Some(status) if status.kind == StatusKind::Success => {
            let message = format!("{} · {count} change-sets", status.message);
            state.set_status(StatusKind::Success, message);
        }
        _ => state.set_status(StatusKind::Info, format!("Loaded {count} change-sets")),
    }
}

/// Swaps in a freshly loaded change graph.
///
/// Pull requests carry over from the previous snapshot, the selection follows
/// its change id, and the first load selects the working copy. A `silent`
/// swap never touches the status line.
fn apply_repository(
    state: &mut AppState,
    mut repository: Repository,
    silent: bool,
) -> Vec<Command> {
    let first_load = state.repository.is_none();
    let previous = state
        .selected_change()
        .map(|(_, change)| change.change_id.clone());

    repository.replace_pull_requests(state.pull_requests.clone());
    let graph = repository.graph();
    let followed = previous.and_then(|change_id| graph.position_by_change_id(&change_id));
    let index = match followed {
        Some(index) => Some(index),
        None if first_load => graph.working_copy_index(),
        None => state.graph_cursor.get(),
    };
    state.graph_cursor.select(index, graph.len());

    let previous_graph = state.repository.as_ref().map(Repository::graph);
    let source_survived = match previous_graph {
        Some(previous_graph) => state.rebase.reconcile(previous_graph, graph),
        None => true,
    };
    if !source_survived && !silent {
        state.set_status(StatusKind::Warning, "Rebase canceled: the source change is gone");
    }
    state.repository = Some(repository);

    let mut commands = Vec::new();
    if !state.pull_requests_requested {
        state.pull_requests_requested = true;
        commands.push(Command::LoadPullRequests);
    }
    commands.extend(request_changed_files(state));
    commands
}

fn set_pull_requests(state: &mut AppState, pull_requests: Vec<PullRequest>) {
    if let Some(repository) = state.repository.as_mut() {
        repository.replace_pull_requests(pull_requests.clone());
    }
    state.pull_requests = pull_requests;
    state.pull_request_cursor.clamp(state.pull_requests.len());
}

fn upsert_pull_request(state: &mut AppState, pull_request: PullRequest) {
    let mut pull_requests = state.pull_requests.clone();
    match pull_requests
        .iter_mut()
        .find(|existing| existing.number == pull_request.number)
    {
        Some(existing) => *existing = pull_request,
        None => pull_requests.insert(0, pull_request),
    }
    set_pull_requests(state, pull_requests);
}

/// Foreground reload after a write; remote writes also refresh pull requests.
fn reload_after(state: &mut AppState, remote: bool) -> Vec<Command> {
    state.loading = true;
    let mut commands = vec![Command::LoadRepository];
    if remote {
        commands.push(Command::LoadPullRequests);
    }
    commands
}

fn mutation_summary(mutation: &Mutation, output: &str) -> String {
    let last_line = output.lines().rev().find(|line| !line.trim().is_empty());
    match (mutation, last_line) {
        (Mutation::Push { .. }, Some(line)) => format!("{mutation}: {}", line.trim()),
        _ => format!("{mutation} done"),
    }
}
