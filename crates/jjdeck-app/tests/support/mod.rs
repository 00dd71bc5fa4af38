use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use jjdeck_app::{App, RetryPolicy};
use jjdeck_core::command_runner::{CommandOutput, CommandRunner};

#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

#[derive(Default)]
pub struct QueueRunner {
    outputs: Mutex<VecDeque<anyhow::Result<CommandOutput>>>,
    calls: Mutex<Vec<Call>>,
}

impl QueueRunner {
    pub fn new(outputs: Vec<anyhow::Result<CommandOutput>>) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| format!("{} {}", call.program, call.args.join(" ")))
            .collect()
    }
}

impl CommandRunner for QueueRunner {
    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
        env: &[(&str, &str)],
    ) -> anyhow::Result<CommandOutput> {
        self.calls.lock().expect("calls lock").push(Call {
            program: program.to_string(),
            args: args.iter().map(|value| (*value).to_string()).collect(),
            env: env
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        });

        self.outputs
            .lock()
            .expect("outputs lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("missing scripted output")))
    }
}

pub fn output(stdout: &str, stderr: &str, status: i32) -> anyhow::Result<CommandOutput> {
    Ok(CommandOutput {
        status_code: status,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

pub fn open_app(runner: &Arc<QueueRunner>, config_dir: &Path) -> App {
    let runner: Arc<dyn CommandRunner> = runner.clone();
    App::open(
        runner,
        PathBuf::from("/tmp/repo"),
        config_dir.join("config.toml"),
    )
    .expect("open app")
    .with_retry_policy(RetryPolicy {
        attempts: 3,
        delay: std::time::Duration::ZERO,
    })
}

#[allow(dead_code)]
pub fn log_record(id: &str, parents: &str, bookmarks: &str, working_copy: bool) -> String {
    let change_id = format!("ch-{id}");
    let summary = format!("change {id}");
    let description = format!("{summary}\n");
    let fields: [&str; 13] = [
        id,
        id,
        &change_id,
        "Ada",
        "ada@example.com",
        "2026-01-05T10:00:00+00:00",
        &summary,
        &description,
        parents,
        bookmarks,
        if working_copy { "1" } else { "0" },
        "0",
        "0",
    ];
    let mut record = fields.join("\u{1f}");
    record.push('\u{1e}');
    record
}

#[allow(dead_code)]
pub fn pull_request_json(number: u64, head: &str) -> String {
    format!(
        r#"{{"number": {number}, "title": "PR {number}", "body": "", "url": "https://github.com/acme/widgets/pull/{number}",
"state": "OPEN", "baseRefName": "main", "headRefName": "{head}", "statusCheckRollup": [], "reviewDecision": ""}}"#
    )
}
