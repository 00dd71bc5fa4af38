mod support;

use std::fs;

use jjdeck_app::{AppError, ContinuePullRequest, CreatePullRequest, ErrorKind};
use jjdeck_core::browser::opener_program;
use jjdeck_core::config::TicketProviderKind;
use jjdeck_core::vcs::Mutation;

use support::{QueueRunner, log_record, open_app, output, pull_request_json};

#[test]
fn load_repository_infers_bookmarks_without_pull_requests() {
    let temp = tempfile::tempdir().expect("temp dir");
    let log = [
        log_record("ccc", "bbb", "", true),
        log_record("bbb", "aaa", "feat-x", false),
        log_record("aaa", "", "", false),
    ]
    .concat();
    let runner = QueueRunner::new(vec![output("/tmp/repo\n", "", 0), output(&log, "", 0)]);
    let app = open_app(&runner, temp.path());

    let repository = app.load_repository().expect("load");

    assert_eq!(repository.graph().len(), 3);
    assert!(repository.pull_requests().is_empty());
    assert_eq!(repository.facts().bookmark(0), Some("feat-x"));
    assert_eq!(repository.facts().bookmark(2), None);
}

#[test]
fn load_repository_outside_a_repo_maps_to_bootstrap_error() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(vec![output("", "Error: There is no jj repo in \".\"", 1)]);
    let app = open_app(&runner, temp.path());

    let error = AppError::from(app.load_repository().expect_err("should fail"));

    assert_eq!(error.kind, ErrorKind::NoRepository);
    assert!(error.message.contains("failed to load repository"));
}

#[test]
fn create_pull_request_moves_pushes_and_retries_until_visible() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(vec![
        output("", "Moved 1 bookmarks\n", 0),
        output("", "Add bookmark feat-x\n", 0),
        output("", "head branch feat-x not found\n", 1),
        output("https://github.com/acme/widgets/pull/21\n", "", 0),
        output(&pull_request_json(21, "feat-x"), "", 0),
    ]);
    let app = open_app(&runner, temp.path());

    let pull_request = app
        .create_pull_request(&CreatePullRequest {
            change_id: "ccc".to_string(),
            branch: "feat-x".to_string(),
            move_bookmark: true,
            title: "Add login".to_string(),
            body: String::new(),
        })
        .expect("create");

    assert_eq!(pull_request.number, 21);
    let commands = runner.commands();
    assert_eq!(commands[0], "jj bookmark set feat-x -r ccc --allow-backwards");
    assert_eq!(commands[1], "jj git push --bookmark feat-x --allow-new");
    assert!(commands[2].starts_with("gh pr create --head feat-x --base main"));
    assert!(commands[3].starts_with("gh pr create"));
    assert!(commands[4].starts_with("gh pr view"));
}

#[test]
fn create_pull_request_surfaces_last_error_after_bounded_attempts() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(vec![
        output("", "", 0),
        output("", "attempt one\n", 1),
        output("", "attempt two\n", 1),
        output("", "attempt three\n", 1),
        output("https://github.com/acme/widgets/pull/99\n", "", 0),
    ]);
    let app = open_app(&runner, temp.path());

    let error = app
        .create_pull_request(&CreatePullRequest {
            change_id: "bbb".to_string(),
            branch: "feat-x".to_string(),
            move_bookmark: false,
            title: "T".to_string(),
            body: String::new(),
        })
        .expect_err("should fail");

    let message = format!("{error:#}");
    assert!(message.contains("after 3 attempts"));
    assert!(message.contains("attempt three"));
    assert_eq!(runner.calls().len(), 4);
}

#[test]
fn push_failure_stops_before_creation() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(vec![output("", "Error: rejected\n", 1)]);
    let app = open_app(&runner, temp.path());

    let error = app
        .continue_pull_request(&ContinuePullRequest {
            change_id: "ccc".to_string(),
            branch: "feat-x".to_string(),
            move_bookmark: false,
        })
        .expect_err("should fail");

    assert!(format!("{error:#}").contains("failed to push feat-x"));
    assert_eq!(runner.calls().len(), 1);
}

#[test]
fn mutate_runs_single_jj_invocation() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(vec![output("", "", 0)]);
    let app = open_app(&runner, temp.path());

    app.mutate(&Mutation::Squash {
        id: "bbb".to_string(),
    })
    .expect("squash");

    assert_eq!(runner.commands(), vec!["jj squash -r bbb"]);
}

#[test]
fn tickets_are_empty_without_a_provider() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(Vec::new());
    let app = open_app(&runner, temp.path());

    assert_eq!(app.ticket_provider_name(), None);
    assert!(app.list_tickets().expect("tickets").is_empty());
    assert!(app.ticket_transitions("1").is_err());
    assert!(runner.calls().is_empty());
}

#[test]
fn save_settings_persists_and_reconfigures_providers() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(vec![output("[]", "", 0)]);
    let app = open_app(&runner, temp.path());

    let mut config = app.config();
    config.tickets.provider = TicketProviderKind::Github;
    config.general.refresh_interval_secs = 30;
    app.save_settings(config).expect("save");

    assert_eq!(app.ticket_provider_name(), Some("GitHub Issues"));
    assert_eq!(app.config().general.refresh_interval_secs, 30);
    let raw = fs::read_to_string(temp.path().join("config.toml")).expect("config written");
    assert!(raw.contains("provider = \"github\""));

    assert!(app.list_tickets().expect("tickets").is_empty());
    assert_eq!(runner.calls()[0].args[..2], ["issue", "list"]);
}

#[test]
fn open_ticket_reads_the_issue_then_opens_its_page() {
    let temp = tempfile::tempdir().expect("temp dir");
    let issue = r#"{"number": 17, "title": "Crash", "state": "OPEN", "labels": [],
        "body": "", "url": "https://github.com/acme/widgets/issues/17"}"#;
    let runner = QueueRunner::new(vec![
        output(issue, "", 0),
        output(issue, "", 0),
        output("", "", 0),
    ]);
    let app = open_app(&runner, temp.path());
    let mut config = app.config();
    config.tickets.provider = TicketProviderKind::Github;
    app.save_settings(config).expect("save");

    assert_eq!(app.ticket("#17").expect("ticket").summary, "Crash");
    app.open_ticket("17").expect("open");

    let calls = runner.calls();
    assert_eq!(calls[1].args[..3], ["issue", "view", "17"]);
    assert_eq!(calls[2].program, opener_program());
    assert_eq!(calls[2].args, vec!["https://github.com/acme/widgets/issues/17"]);
}

#[test]
fn invalid_settings_are_not_persisted() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(Vec::new());
    let app = open_app(&runner, temp.path());

    let mut config = app.config();
    config.tickets.provider = TicketProviderKind::Jira;
    assert!(app.save_settings(config).is_err());

    assert!(!temp.path().join("config.toml").exists());
    assert_eq!(app.ticket_provider_name(), None);
}

#[test]
fn save_github_token_exports_token_to_gh() {
    let temp = tempfile::tempdir().expect("temp dir");
    let runner = QueueRunner::new(vec![output("[]", "", 0)]);
    let app = open_app(&runner, temp.path());

    app.save_github_token("  ghp_secret ").expect("save token");
    app.list_pull_requests().expect("list");

    assert_eq!(app.config().github.token, "ghp_secret");
    assert_eq!(
        runner.calls()[0].env,
        vec![("GH_TOKEN".to_string(), "ghp_secret".to_string())]
    );
}
