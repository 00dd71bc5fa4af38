//! Scripted process runner and model builders for tests in every jjdeck crate.
//!
//! Enabled for this crate's own tests and, through the `test-support` feature,
//! for downstream dev-dependencies.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::anyhow;

use crate::command_runner::{CommandOutput, CommandRunner};
use crate::model::{ChangeGraph, ChangeSet, PullRequest, PullRequestState, Repository, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

#[derive(Default)]
struct Script {
    outputs: VecDeque<anyhow::Result<CommandOutput>>,
    calls: Vec<Call>,
}

/// Replays queued outputs in order and remembers every invocation.
#[derive(Default)]
pub struct RecordingRunner {
    script: Mutex<Script>,
}

impl RecordingRunner {
    pub fn from_outputs(outputs: Vec<anyhow::Result<CommandOutput>>) -> Self {
        Self {
            script: Mutex::new(Script {
                outputs: outputs.into(),
                calls: Vec::new(),
            }),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        env: &[(&str, &str)],
    ) -> anyhow::Result<CommandOutput> {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        script.calls.push(Call {
            program: program.to_string(),
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
            env: env
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
        });
        script
            .outputs
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted output left for {program}")))
    }
}

pub fn output(stdout: &str, stderr: &str, status_code: i32) -> anyhow::Result<CommandOutput> {
    Ok(CommandOutput {
        status_code,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

pub fn change(id: &str, parents: &[&str], bookmarks: &[&str]) -> ChangeSet {
    ChangeSet {
        id: id.to_string(),
        short_id: id.chars().take(8).collect(),
        change_id: format!("ch-{id}"),
        author: "Test".to_string(),
        email: "test@example.com".to_string(),
        date: "2026-01-05T10:00:00+00:00".to_string(),
        summary: format!("change {id}"),
        description: format!("change {id}\n"),
        parents: parents.iter().map(|value| (*value).to_string()).collect(),
        bookmarks: bookmarks.iter().map(|value| (*value).to_string()).collect(),
        is_working_copy: false,
        has_conflicts: false,
        is_immutable: false,
    }
}

pub fn pull_request(number: u64, head: &str, state: PullRequestState) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        body: String::new(),
        url: format!("https://github.com/acme/widgets/pull/{number}"),
        state,
        base_branch: "main".to_string(),
        head_branch: head.to_string(),
        checks: None,
        review: None,
    }
}

pub fn ticket(key: &str) -> Ticket {
    Ticket {
        key: key.to_string(),
        display_key: key.to_string(),
        summary: format!("Work on {key}"),
        status: "To Do".to_string(),
        kind: "Task".to_string(),
        priority: "Medium".to_string(),
        description: String::new(),
        web_url: Some(format!("https://acme.atlassian.net/browse/{key}")),
    }
}

/// A repository rooted at `/tmp/repo` with no pull requests yet.
pub fn repository(changes: Vec<ChangeSet>) -> Repository {
    Repository::new(PathBuf::from("/tmp/repo"), ChangeGraph::new(changes), Vec::new())
}
