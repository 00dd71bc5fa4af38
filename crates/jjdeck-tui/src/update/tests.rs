use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use jjdeck_app::{AppError, ContinuePullRequest, ErrorKind};
use jjdeck_core::config::JjdeckConfig;
use jjdeck_core::model::{
    ChangeSet, ChangedFile, FileStatus, PullRequestState, Ticket, Transition,
};
use jjdeck_core::test_support::{change, pull_request, repository, ticket};
use jjdeck_core::vcs::Mutation;

use super::{initial_commands, update};
use crate::command::Command;
use crate::editor_flow::PullRequestTarget;
use crate::keymap::InputScope;
use crate::msg::{Action, Msg};
use crate::state::{AppState, StatusKind, ViewMode};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(state: &mut AppState, code: KeyCode) -> Vec<Command> {
    update(state, Msg::Key(key(code)))
}

fn type_text(state: &mut AppState, text: &str) {
    for ch in text.chars() {
        press(state, KeyCode::Char(ch));
    }
}

/// c (working copy) -> b [feat-x] -> a [main, immutable]
fn linear() -> Vec<ChangeSet> {
    let mut c = change("c", &["b"], &[]);
    c.is_working_copy = true;
    let b = change("b", &["a"], &["feat-x"]);
    let mut a = change("a", &[], &["main"]);
    a.is_immutable = true;
    vec![c, b, a]
}

fn loaded(changes: Vec<ChangeSet>) -> AppState {
    let mut state = AppState::new(JjdeckConfig::default());
    initial_commands(&mut state);
    update(&mut state, Msg::RepositoryLoaded(Ok(repository(changes))));
    state
}

fn tickets_loaded(tickets: Vec<Ticket>) -> Msg {
    Msg::TicketsLoaded {
        provider: Some("Jira"),
        result: Ok(tickets),
    }
}

fn selected_id(state: &AppState) -> Option<String> {
    state.selected_change().map(|(_, change)| change.id.clone())
}

fn status_message(state: &AppState) -> String {
    state
        .status
        .as_ref()
        .map(|status| status.message.clone())
        .unwrap_or_default()
}

fn no_repository() -> AppError {
    AppError {
        kind: ErrorKind::NoRepository,
        message: "no jj repository found at /tmp/plain".to_string(),
    }
}

#[test]
fn startup_loads_repository_and_tickets() {
    let mut state = AppState::new(JjdeckConfig::default());
    assert_eq!(
        initial_commands(&mut state),
        vec![Command::LoadRepository, Command::LoadTickets]
    );
    assert!(state.loading);
}

#[test]
fn first_load_selects_working_copy_and_requests_pull_requests() {
    let mut changes = linear();
    changes.insert(0, change("d", &["c"], &[]));

    let mut state = AppState::new(JjdeckConfig::default());
    initial_commands(&mut state);
    let commands = update(&mut state, Msg::RepositoryLoaded(Ok(repository(changes))));

    assert_eq!(
        commands,
        vec![
            Command::LoadPullRequests,
            Command::LoadChangedFiles {
                id: "c".to_string()
            },
        ]
    );
    assert_eq!(state.graph_cursor.get(), Some(1));
    assert!(!state.loading);
    assert_eq!(status_message(&state), "Loaded 4 change-sets");
}

#[test]
fn reload_keeps_pull_requests_from_previous_snapshot() {
    let mut state = loaded(linear());
    update(
        &mut state,
        Msg::PullRequestsLoaded(Ok(vec![pull_request(
            7,
            "feat-x",
            PullRequestState::Open,
        )])),
    );

    let commands = update(&mut state, Msg::RepositoryLoaded(Ok(repository(linear()))));
    assert!(!commands.contains(&Command::LoadPullRequests));

    let repository = state.repository.as_ref().expect("repository");
    assert_eq!(repository.pull_requests().len(), 1);
    assert_eq!(repository.facts().pull_request_branch(0), Some("feat-x"));
}

#[test]
fn selection_follows_change_id_across_rewrites() {
    let mut state = loaded(linear());
    update(&mut state, Msg::Action(Action::MoveDown));
    assert_eq!(selected_id(&state).as_deref(), Some("b"));

    let mut rewritten = change("b2", &["a"], &["feat-x"]);
    rewritten.change_id = "ch-b".to_string();
    let mut a = change("a", &[], &["main"]);
    a.is_immutable = true;
    let reloaded = vec![
        change("d", &["c"], &[]),
        change("c", &["b2"], &[]),
        rewritten,
        a,
    ];

    let commands = update(&mut state, Msg::RepositoryLoaded(Ok(repository(reloaded))));
    assert_eq!(state.graph_cursor.get(), Some(2));
    assert_eq!(
        commands,
        vec![Command::LoadChangedFiles {
            id: "b2".to_string()
        }]
    );
}

#[test]
fn selection_is_clamped_when_the_graph_shrinks() {
    let mut state = loaded(linear());
    update(&mut state, Msg::Action(Action::MoveLast));

    update(
        &mut state,
        Msg::RepositoryLoaded(Ok(repository(vec![change("z", &[], &[])]))),
    );
    assert_eq!(selected_id(&state).as_deref(), Some("z"));

    update(&mut state, Msg::RepositoryLoaded(Ok(repository(Vec::new()))));
    assert_eq!(state.graph_cursor.get(), None);
    assert!(state.changed_files.id.is_none());
}

#[test]
fn immutable_changes_reject_rewrites_with_specific_messages() {
    let mut state = loaded(linear());
    update(&mut state, Msg::Action(Action::MoveLast));

    for (code, verb) in [
        ('s', "squash"),
        ('a', "abandon"),
        ('e', "edit"),
        ('r', "rebase"),
        ('d', "describe"),
        ('b', "move a bookmark onto"),
    ] {
        state.status = None;
        assert_eq!(press(&mut state, KeyCode::Char(code)), Vec::new());
        let status = state.status.clone().expect("status");
        assert_eq!(status.kind, StatusKind::Warning);
        assert_eq!(status.message, format!("cannot {verb} a: change is immutable"));
        assert_eq!(state.view, ViewMode::Graph);
        assert!(!state.rebase.is_picking());
    }

    assert_eq!(
        press(&mut state, KeyCode::Char('p')),
        vec![Command::Mutate(Mutation::Push {
            bookmark: "main".to_string()
        })]
    );
}

#[test]
fn mutable_change_mutations_are_scheduled() {
    let mut state = loaded(linear());

    assert_eq!(
        press(&mut state, KeyCode::Char('s')),
        vec![Command::Mutate(Mutation::Squash {
            id: "c".to_string()
        })]
    );
    assert!(state.loading);

    assert_eq!(
        press(&mut state, KeyCode::Char('n')),
        vec![Command::Mutate(Mutation::NewChange {
            parent: "c".to_string()
        })]
    );
}

#[test]
fn rebase_picks_destination_and_confirms() {
    let mut state = loaded(linear());

    assert_eq!(press(&mut state, KeyCode::Char('r')), Vec::new());
    assert_eq!(state.input_scope(), Some(InputScope::RebasePicking));
    assert_eq!(state.rebase.destination(), Some(1));

    press(&mut state, KeyCode::Char('j'));
    assert_eq!(
        press(&mut state, KeyCode::Enter),
        vec![Command::Mutate(Mutation::Rebase {
            source: "c".to_string(),
            destination: "a".to_string(),
        })]
    );
    assert!(!state.rebase.is_picking());
}

#[test]
fn background_reload_during_picking_keeps_the_chosen_destination() {
    let mut state = loaded(linear());
    assert_eq!(
        update(&mut state, Msg::Tick),
        vec![Command::RefreshRepository]
    );
    press(&mut state, KeyCode::Char('r'));
    press(&mut state, KeyCode::Char('j'));

    let mut changes = linear();
    changes.insert(0, change("d", &["c"], &[]));
    assert_eq!(
        update(&mut state, Msg::RepositoryRefreshed(Ok(repository(changes)))),
        Vec::new()
    );

    assert_eq!(
        press(&mut state, KeyCode::Enter),
        vec![Command::Mutate(Mutation::Rebase {
            source: "c".to_string(),
            destination: "a".to_string(),
        })]
    );
}

#[test]
fn background_reload_never_rewrites_the_picking_prompt() {
    let mut state = loaded(linear());
    update(&mut state, Msg::Tick);
    press(&mut state, KeyCode::Char('r'));
    let prompt = state.status.clone();

    update(
        &mut state,
        Msg::RepositoryRefreshed(Ok(repository(vec![change("a", &[], &[])]))),
    );

    assert_eq!(state.status, prompt);
    assert!(state.rebase.is_picking());
    assert_eq!(state.graph_len(), 3);

    press(&mut state, KeyCode::Esc);
    assert_eq!(
        update(&mut state, Msg::Tick),
        vec![Command::RefreshRepository]
    );
}

#[test]
fn rebase_onto_itself_is_rejected() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('r'));
    press(&mut state, KeyCode::Char('k'));

    assert_eq!(press(&mut state, KeyCode::Enter), Vec::new());
    assert!(!state.rebase.is_picking());
    assert!(status_message(&state).contains("onto itself"));
}

#[test]
fn rebase_escape_cancels_and_graph_keys_are_inactive_while_picking() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('r'));

    assert_eq!(press(&mut state, KeyCode::Char('s')), Vec::new());
    assert_eq!(press(&mut state, KeyCode::Char('q')), Vec::new());
    assert!(!state.should_quit);

    press(&mut state, KeyCode::Esc);
    assert!(!state.rebase.is_picking());
    assert_eq!(state.input_scope(), Some(InputScope::Graph));
}

#[test]
fn mutation_results_trigger_foreground_reload() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('s'));

    let commands = update(
        &mut state,
        Msg::MutationFinished {
            mutation: Mutation::Squash {
                id: "c".to_string(),
            },
            result: Ok(String::new()),
        },
    );
    assert_eq!(commands, vec![Command::LoadRepository]);
    assert_eq!(status_message(&state), "squash c done");

    update(&mut state, Msg::RepositoryLoaded(Ok(repository(linear()))));
    assert_eq!(status_message(&state), "squash c done · 3 change-sets");
    assert_eq!(
        state.status.as_ref().map(|status| status.kind),
        Some(StatusKind::Success)
    );
    assert!(!state.loading);
}

#[test]
fn foreground_reload_replaces_a_stale_warning() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('G'));
    press(&mut state, KeyCode::Char('s'));
    assert!(status_message(&state).contains("immutable"));

    update(&mut state, Msg::RepositoryLoaded(Ok(repository(linear()))));
    assert_eq!(status_message(&state), "Loaded 3 change-sets");
}

#[test]
fn push_reports_output_and_reloads_pull_requests() {
    let mut state = loaded(linear());
    let commands = update(
        &mut state,
        Msg::MutationFinished {
            mutation: Mutation::Push {
                bookmark: "feat-x".to_string(),
            },
            result: Ok("Changes to push to origin:\n  Add bookmark feat-x to 1234abcd\n".to_string()),
        },
    );

    assert_eq!(
        commands,
        vec![Command::LoadRepository, Command::LoadPullRequests]
    );
    assert_eq!(
        status_message(&state),
        "push feat-x: Add bookmark feat-x to 1234abcd"
    );
}

#[test]
fn failed_mutation_sets_error_and_stops_loading() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('s'));
    update(
        &mut state,
        Msg::MutationFinished {
            mutation: Mutation::Squash {
                id: "c".to_string(),
            },
            result: Err(AppError::service("failed to squash c: conflict")),
        },
    );

    assert!(!state.loading);
    assert_eq!(state.input_scope(), Some(InputScope::Error));
    assert!(!state.refresh.is_armed());
}

#[test]
fn bootstrap_error_swallows_keys_and_offers_init() {
    let mut state = AppState::new(JjdeckConfig::default());
    initial_commands(&mut state);
    update(&mut state, Msg::RepositoryLoaded(Err(no_repository())));

    assert!(state.error.is_some());
    assert_eq!(press(&mut state, KeyCode::Char('j')), Vec::new());
    assert_eq!(press(&mut state, KeyCode::Char('2')), Vec::new());
    assert_eq!(update(&mut state, Msg::Action(Action::Refresh)), Vec::new());
    assert_eq!(update(&mut state, Msg::Tick), Vec::new());
    assert_eq!(state.view, ViewMode::Graph);

    assert_eq!(
        press(&mut state, KeyCode::Char('i')),
        vec![Command::InitRepository]
    );
    assert!(state.error.is_none());
    assert_eq!(
        update(&mut state, Msg::RepositoryInitialized(Ok(()))),
        vec![Command::LoadRepository]
    );
}

#[test]
fn init_is_not_offered_for_other_errors() {
    let mut state = loaded(linear());
    update(
        &mut state,
        Msg::PullRequestsLoaded(Err(AppError::service("gh is not authenticated"))),
    );

    assert_eq!(press(&mut state, KeyCode::Char('i')), Vec::new());
    assert!(state.error.is_some());
}

#[test]
fn retry_clears_error_and_reloads() {
    let mut state = AppState::new(JjdeckConfig::default());
    initial_commands(&mut state);
    update(&mut state, Msg::RepositoryLoaded(Err(no_repository())));

    assert_eq!(
        press(&mut state, KeyCode::Char('r')),
        vec![Command::LoadRepository]
    );
    assert!(state.error.is_none());
    assert!(state.loading);
    assert!(state.refresh.is_armed());

    update(&mut state, Msg::RepositoryLoaded(Err(no_repository())));
    assert!(state.error.as_ref().is_some_and(AppError::is_no_repository));
}

#[test]
fn dismiss_resets_view_and_resumes_refresh() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('3'));
    update(
        &mut state,
        Msg::TicketsLoaded {
            provider: Some("Jira"),
            result: Err(AppError::service("jira returned 401")),
        },
    );
    assert!(!state.refresh.is_armed());

    assert_eq!(press(&mut state, KeyCode::Esc), Vec::new());
    assert!(state.error.is_none());
    assert_eq!(state.view, ViewMode::Graph);
    assert!(state.refresh.is_armed());
    assert_eq!(
        update(&mut state, Msg::Tick),
        vec![Command::RefreshRepository]
    );
}

#[test]
fn dismissing_the_bootstrap_error_resumes_refresh_and_reoffers_init() {
    let mut state = AppState::new(JjdeckConfig::default());
    initial_commands(&mut state);
    update(&mut state, Msg::RepositoryLoaded(Err(no_repository())));
    assert!(state.error.as_ref().is_some_and(AppError::is_no_repository));
    assert!(!state.refresh.is_armed());

    assert_eq!(press(&mut state, KeyCode::Esc), Vec::new());
    assert!(state.error.is_none());
    assert_eq!(state.view, ViewMode::Graph);
    assert!(state.refresh.is_armed());
    assert_eq!(press(&mut state, KeyCode::Char('i')), Vec::new());

    assert_eq!(
        update(&mut state, Msg::Tick),
        vec![Command::RefreshRepository]
    );
    update(&mut state, Msg::RepositoryRefreshed(Err(no_repository())));
    assert!(state.error.as_ref().is_some_and(AppError::is_no_repository));
    assert_eq!(
        press(&mut state, KeyCode::Char('i')),
        vec![Command::InitRepository]
    );
}

#[test]
fn ctrl_c_quits_even_during_error() {
    let mut state = AppState::new(JjdeckConfig::default());
    update(&mut state, Msg::RepositoryLoaded(Err(no_repository())));
    update(
        &mut state,
        Msg::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
    );
    assert!(state.should_quit);
}

#[test]
fn ticks_reload_silently_one_at_a_time() {
    let mut state = loaded(linear());
    let before = state.status.clone();

    assert_eq!(
        update(&mut state, Msg::Tick),
        vec![Command::RefreshRepository]
    );
    assert_eq!(update(&mut state, Msg::Tick), Vec::new());
    assert!(state.refresh.is_armed());

    let mut changes = linear();
    changes.insert(0, change("d", &["c"], &[]));
    update(&mut state, Msg::RepositoryRefreshed(Ok(repository(changes))));
    assert_eq!(state.graph_len(), 4);
    assert_eq!(state.status, before);
    assert_eq!(selected_id(&state).as_deref(), Some("c"));

    assert_eq!(
        update(&mut state, Msg::Tick),
        vec![Command::RefreshRepository]
    );
}

#[test]
fn ticks_are_suppressed_while_editing() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char(','));
    assert_eq!(state.view, ViewMode::Settings);

    assert_eq!(update(&mut state, Msg::Tick), Vec::new());
    assert!(state.refresh.is_armed());

    press(&mut state, KeyCode::Esc);
    assert_eq!(
        update(&mut state, Msg::Tick),
        vec![Command::RefreshRepository]
    );
}

#[test]
fn background_failure_halts_refresh() {
    let mut state = loaded(linear());
    update(&mut state, Msg::Tick);
    update(
        &mut state,
        Msg::RepositoryRefreshed(Err(AppError::service("jj log failed"))),
    );

    assert!(state.error.is_some());
    assert_eq!(update(&mut state, Msg::Tick), Vec::new());
    assert!(!state.refresh.is_armed());
}

#[test]
fn background_reload_racing_a_mutation_is_dropped() {
    let mut state = loaded(linear());
    update(&mut state, Msg::Tick);
    press(&mut state, KeyCode::Char('s'));

    update(
        &mut state,
        Msg::RepositoryRefreshed(Ok(repository(vec![change("z", &[], &[])]))),
    );
    assert_eq!(state.graph_len(), 3);
}

#[test]
fn stale_changed_files_are_discarded() {
    let mut state = loaded(linear());
    let commands = update(&mut state, Msg::Action(Action::MoveDown));
    assert_eq!(
        commands,
        vec![Command::LoadChangedFiles {
            id: "b".to_string()
        }]
    );

    let file = ChangedFile {
        status: FileStatus::Modified,
        path: "src/lib.rs".to_string(),
    };
    update(
        &mut state,
        Msg::ChangedFilesLoaded {
            id: "c".to_string(),
            result: Ok(vec![file.clone()]),
        },
    );
    assert!(state.changed_files.files.is_empty());
    assert!(state.changed_files.loading);

    update(
        &mut state,
        Msg::ChangedFilesLoaded {
            id: "b".to_string(),
            result: Ok(vec![file.clone()]),
        },
    );
    assert_eq!(state.changed_files.files, vec![file]);
    assert!(!state.changed_files.loading);
}

#[test]
fn describe_seeds_ticket_prefix_and_saves() {
    let mut changes = linear();
    changes[1].bookmarks = vec!["abc-12-login".to_string()];
    let mut state = loaded(changes);

    assert_eq!(
        press(&mut state, KeyCode::Char('d')),
        vec![Command::FetchDescription {
            id: "c".to_string()
        }]
    );
    assert_eq!(state.view, ViewMode::EditDescription);

    update(
        &mut state,
        Msg::DescriptionLoaded {
            id: "c".to_string(),
            result: Ok(String::new()),
        },
    );
    type_text(&mut state, "fix");

    let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert_eq!(
        update(&mut state, Msg::Key(save)),
        vec![Command::Mutate(Mutation::Describe {
            id: "c".to_string(),
            text: "ABC-12: fix".to_string(),
        })]
    );
    assert_eq!(state.view, ViewMode::Graph);
    assert!(state.description.is_none());
}

#[test]
fn description_for_closed_editor_is_ignored() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('d'));
    press(&mut state, KeyCode::Esc);

    update(
        &mut state,
        Msg::DescriptionLoaded {
            id: "c".to_string(),
            result: Ok("late".to_string()),
        },
    );
    assert!(state.description.is_none());
    assert_eq!(state.view, ViewMode::Graph);
}

#[test]
fn pull_request_on_inherited_open_branch_moves_and_pushes() {
    let mut state = loaded(linear());
    update(
        &mut state,
        Msg::PullRequestsLoaded(Ok(vec![pull_request(
            7,
            "feat-x",
            PullRequestState::Open,
        )])),
    );

    assert_eq!(
        press(&mut state, KeyCode::Char('c')),
        vec![Command::ContinuePullRequest(ContinuePullRequest {
            change_id: "c".to_string(),
            branch: "feat-x".to_string(),
            move_bookmark: true,
        })]
    );
    assert!(state.loading);

    let commands = update(
        &mut state,
        Msg::PullRequestContinued {
            branch: "feat-x".to_string(),
            result: Ok(String::new()),
        },
    );
    assert_eq!(
        commands,
        vec![Command::LoadRepository, Command::LoadPullRequests]
    );
}

#[test]
fn pull_request_without_open_pr_opens_editor() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('c'));

    assert_eq!(state.view, ViewMode::EditPullRequest);
    let editor = state.pull_request_editor.as_ref().expect("editor");
    assert_eq!(
        editor.target,
        PullRequestTarget::Create {
            change_id: "c".to_string(),
            branch: "feat-x".to_string(),
            move_bookmark: true,
        }
    );

    press(&mut state, KeyCode::Esc);
    update(&mut state, Msg::Action(Action::MoveDown));
    press(&mut state, KeyCode::Char('c'));
    let editor = state.pull_request_editor.as_ref().expect("editor");
    assert_eq!(
        editor.target,
        PullRequestTarget::Create {
            change_id: "b".to_string(),
            branch: "feat-x".to_string(),
            move_bookmark: false,
        }
    );
}

#[test]
fn pull_request_needs_a_bookmark() {
    let mut state = loaded(vec![change("x", &[], &[])]);
    assert_eq!(press(&mut state, KeyCode::Char('c')), Vec::new());
    assert!(status_message(&state).contains("no bookmark"));
    assert_eq!(state.view, ViewMode::Graph);
}

#[test]
fn created_pull_request_is_listed_and_reloads() {
    let mut state = loaded(linear());
    let commands = update(
        &mut state,
        Msg::PullRequestCreated(Ok(pull_request(12, "feat-x", PullRequestState::Open))),
    );

    assert_eq!(
        commands,
        vec![Command::LoadRepository, Command::LoadPullRequests]
    );
    assert_eq!(state.pull_requests.len(), 1);
    assert_eq!(status_message(&state), "Opened pull request #12");
}

#[test]
fn bookmark_flow_creates_from_typed_name() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('b'));
    assert_eq!(state.view, ViewMode::Bookmark);

    type_text(&mut state, "feat-y");
    assert_eq!(
        press(&mut state, KeyCode::Enter),
        vec![Command::Mutate(Mutation::CreateBookmark {
            name: "feat-y".to_string(),
            id: "c".to_string(),
        })]
    );
    assert_eq!(state.view, ViewMode::Graph);
}

#[test]
fn bookmark_flow_cancel_runs_nothing() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('b'));
    assert_eq!(press(&mut state, KeyCode::Esc), Vec::new());
    assert_eq!(state.view, ViewMode::Graph);
    assert!(state.bookmark.is_none());
    assert!(!state.loading);
}

#[test]
fn ticket_bookmark_targets_selected_change() {
    let mut state = loaded(linear());
    update(&mut state, tickets_loaded(vec![ticket("ABC-1")]));
    press(&mut state, KeyCode::Char('3'));

    press(&mut state, KeyCode::Char('b'));
    assert_eq!(state.view, ViewMode::Bookmark);
    assert_eq!(
        state.bookmark.as_ref().map(|flow| flow.input.value().to_string()),
        Some("abc-1".to_string())
    );

    assert_eq!(
        press(&mut state, KeyCode::Enter),
        vec![Command::Mutate(Mutation::CreateBookmark {
            name: "abc-1".to_string(),
            id: "c".to_string(),
        })]
    );
    assert_eq!(state.view, ViewMode::Tickets);
}

#[test]
fn ticket_transitions_pick_and_apply() {
    let mut state = loaded(linear());
    update(&mut state, tickets_loaded(vec![ticket("ABC-1"), ticket("ABC-2")]));
    press(&mut state, KeyCode::Char('3'));

    assert_eq!(
        press(&mut state, KeyCode::Char('t')),
        vec![Command::LoadTransitions {
            key: "ABC-1".to_string()
        }]
    );
    update(
        &mut state,
        Msg::TransitionsLoaded {
            key: "ABC-1".to_string(),
            result: Ok(vec![
                Transition {
                    id: "11".to_string(),
                    name: "In Progress".to_string(),
                },
                Transition {
                    id: "21".to_string(),
                    name: "Done".to_string(),
                },
            ]),
        },
    );
    assert_eq!(state.input_scope(), Some(InputScope::TransitionPicking));

    press(&mut state, KeyCode::Char('j'));
    assert_eq!(
        press(&mut state, KeyCode::Enter),
        vec![Command::ApplyTransition {
            key: "ABC-1".to_string(),
            transition_id: "21".to_string(),
            name: "Done".to_string(),
        }]
    );
    assert!(state.transitions.is_none());

    assert_eq!(
        update(
            &mut state,
            Msg::TransitionApplied {
                key: "ABC-1".to_string(),
                name: "Done".to_string(),
                result: Ok(()),
            },
        ),
        vec![Command::LoadTickets]
    );
}

#[test]
fn transitions_for_a_deselected_ticket_are_dropped() {
    let mut state = loaded(linear());
    update(&mut state, tickets_loaded(vec![ticket("ABC-1"), ticket("ABC-2")]));
    press(&mut state, KeyCode::Char('3'));
    press(&mut state, KeyCode::Char('t'));
    press(&mut state, KeyCode::Char('j'));

    update(
        &mut state,
        Msg::TransitionsLoaded {
            key: "ABC-1".to_string(),
            result: Ok(vec![Transition {
                id: "11".to_string(),
                name: "In Progress".to_string(),
            }]),
        },
    );
    assert!(state.transitions.is_none());
}

#[test]
fn settings_submit_and_apply_new_interval() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char(','));
    for _ in 0..7 {
        assert_eq!(press(&mut state, KeyCode::Enter), Vec::new());
        assert_eq!(state.view, ViewMode::Settings);
    }
    assert_eq!(
        press(&mut state, KeyCode::Enter),
        vec![Command::SaveSettings(JjdeckConfig::default())]
    );
    assert_eq!(state.view, ViewMode::Graph);

    let mut saved = JjdeckConfig::default();
    saved.general.refresh_interval_secs = 0;
    let commands = update(&mut state, Msg::SettingsSaved(Ok(saved.clone())));
    assert_eq!(
        commands,
        vec![
            Command::LoadRepository,
            Command::LoadPullRequests,
            Command::LoadTickets,
        ]
    );
    assert_eq!(state.config, saved);
    assert_eq!(state.refresh.interval(), None);
}

#[test]
fn login_saves_token_and_reloads_pull_requests() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('L'));
    assert_eq!(state.view, ViewMode::Login);
    type_text(&mut state, "ghp_x");

    assert_eq!(
        press(&mut state, KeyCode::Enter),
        vec![Command::SaveGithubToken("ghp_x".to_string())]
    );

    let mut saved = JjdeckConfig::default();
    saved.github.token = "ghp_x".to_string();
    assert_eq!(
        update(&mut state, Msg::LoginSaved(Ok(saved))),
        vec![Command::LoadPullRequests]
    );
    assert_eq!(state.config.github.token, "ghp_x");
}

#[test]
fn open_uses_the_focused_list() {
    let mut state = loaded(linear());
    update(
        &mut state,
        Msg::PullRequestsLoaded(Ok(vec![pull_request(
            7,
            "feat-x",
            PullRequestState::Open,
        )])),
    );

    let url = "https://github.com/acme/widgets/pull/7".to_string();
    assert_eq!(
        press(&mut state, KeyCode::Char('o')),
        vec![Command::OpenUrl(url.clone())]
    );

    press(&mut state, KeyCode::Char('2'));
    assert_eq!(
        press(&mut state, KeyCode::Enter),
        vec![Command::OpenUrl(url)]
    );

    update(
        &mut state,
        Msg::UrlOpened(Err(AppError::service("xdg-open not found"))),
    );
    assert!(state.error.is_some());
}

#[test]
fn open_in_the_tickets_view_asks_the_provider() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Char('3'));
    assert_eq!(press(&mut state, KeyCode::Char('o')), Vec::new());
    assert_eq!(state.status.as_ref().map(|status| status.kind), Some(StatusKind::Warning));

    update(&mut state, tickets_loaded(vec![ticket("ABC-1"), ticket("ABC-2")]));
    press(&mut state, KeyCode::Char('j'));
    assert_eq!(
        press(&mut state, KeyCode::Char('o')),
        vec![Command::OpenTicket {
            key: "ABC-2".to_string(),
        }]
    );
}

#[test]
fn views_cycle_and_help_returns_to_previous_list() {
    let mut state = loaded(linear());
    press(&mut state, KeyCode::Tab);
    assert_eq!(state.view, ViewMode::PullRequests);

    press(&mut state, KeyCode::Char('?'));
    assert_eq!(state.view, ViewMode::Help);
    assert_eq!(update(&mut state, Msg::Tick), Vec::new());

    press(&mut state, KeyCode::Esc);
    assert_eq!(state.view, ViewMode::PullRequests);

    press(&mut state, KeyCode::Tab);
    press(&mut state, KeyCode::Tab);
    assert_eq!(state.view, ViewMode::Graph);
}

#[test]
fn mouse_wheel_moves_the_selection() {
    let mut state = loaded(linear());
    let scroll = |kind| MouseEvent {
        kind,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };

    assert_eq!(
        update(&mut state, Msg::Mouse(scroll(MouseEventKind::ScrollDown))),
        vec![Command::LoadChangedFiles {
            id: "b".to_string()
        }]
    );
    update(&mut state, Msg::Mouse(scroll(MouseEventKind::ScrollUp)));
    assert_eq!(selected_id(&state).as_deref(), Some("c"));
}

#[test]
fn resize_is_idempotent() {
    let mut state = loaded(linear());
    update(
        &mut state,
        Msg::Resize {
            width: 120,
            height: 40,
        },
    );
    let first = state.viewport;
    update(
        &mut state,
        Msg::Resize {
            width: 120,
            height: 40,
        },
    );
    assert_eq!(state.viewport, first);
    assert_eq!(state.viewport.width, 120);
}
