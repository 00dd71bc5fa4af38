use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::command_adapter;
use crate::command_runner::{CommandOutput, CommandRunner};
use crate::hosting::{CodeHostService, HostingError, PullRequestDraft, PullRequestEdit};
use crate::model::{CheckStatus, PullRequest, PullRequestState, ReviewStatus};

const PULL_REQUEST_FIELDS: &str =
    "number,title,body,url,state,baseRefName,headRefName,statusCheckRollup,reviewDecision";
const LIST_LIMIT: &str = "200";

#[derive(Clone)]
pub struct GhCli {
    runner: Arc<dyn CommandRunner>,
    workspace: PathBuf,
    token: Option<String>,
}

impl GhCli {
    pub fn new(runner: Arc<dyn CommandRunner>, workspace: PathBuf) -> Self {
        Self {
            runner,
            workspace,
            token: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        let token = token.trim();
        self.token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    pub(crate) fn run_checked(&self, args: &[&str]) -> Result<CommandOutput, HostingError> {
        let env: Vec<(&str, &str)> = self
            .token
            .as_deref()
            .map(|token| vec![("GH_TOKEN", token)])
            .unwrap_or_default();

        let output = command_adapter::run_program(
            self.runner.as_ref(),
            "gh",
            args,
            Some(self.workspace.as_path()),
            &env,
        )
        .map_err(HostingError::Execute)?;

        command_adapter::ensure_success(args, output).map_err(|failure| {
            HostingError::CommandFailed {
                command: failure.command,
                status: failure.status,
                stderr: failure.stderr,
            }
        })
    }

    fn view(&self, reference: &str) -> Result<PullRequest, HostingError> {
        let output = self.run_checked(&["pr", "view", reference, "--json", PULL_REQUEST_FIELDS])?;
        let raw: GhPullRequest = serde_json::from_str(&output.stdout)
            .map_err(|error| HostingError::Decode(error.to_string()))?;
        raw.into_pull_request()
    }
}

impl CodeHostService for GhCli {
    fn list_pull_requests(&self) -> Result<Vec<PullRequest>, HostingError> {
        let output = self.run_checked(&[
            "pr",
            "list",
            "--state",
            "all",
            "--limit",
            LIST_LIMIT,
            "--json",
            PULL_REQUEST_FIELDS,
        ])?;
        let pull_requests = parse_pull_requests(&output.stdout)?;
        debug!(count = pull_requests.len(), "listed pull requests");
        Ok(pull_requests)
    }

    fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequest, HostingError> {
        let output = self.run_checked(&[
            "pr",
            "create",
            "--head",
            &draft.head_branch,
            "--base",
            &draft.base_branch,
            "--title",
            &draft.title,
            "--body",
            &draft.body,
        ])?;

        let url = output
            .stdout
            .lines()
            .map(str::trim)
            .rfind(|line| line.starts_with("http"))
            .ok_or_else(|| HostingError::Decode("gh pr create did not print a URL".to_string()))?;
        self.view(url)
    }

    fn update_pull_request(
        &self,
        number: u64,
        edit: &PullRequestEdit,
    ) -> Result<PullRequest, HostingError> {
        let number = number.to_string();
        self.run_checked(&[
            "pr",
            "edit",
            &number,
            "--title",
            &edit.title,
            "--body",
            &edit.body,
        ])?;
        self.view(&number)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhPullRequest {
    number: u64,
    title: String,
    #[serde(default)]
    body: String,
    url: String,
    state: String,
    base_ref_name: String,
    head_ref_name: String,
    #[serde(default)]
    status_check_rollup: Option<Vec<GhCheck>>,
    #[serde(default)]
    review_decision: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GhCheck {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    conclusion: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl GhPullRequest {
    fn into_pull_request(self) -> Result<PullRequest, HostingError> {
        let state = match self.state.as_str() {
            "OPEN" => PullRequestState::Open,
            "CLOSED" => PullRequestState::Closed,
            "MERGED" => PullRequestState::Merged,
            other => {
                return Err(HostingError::Decode(format!(
                    "unknown pull request state '{other}'"
                )));
            }
        };

        let review = match self.review_decision.as_deref() {
            Some("APPROVED") => Some(ReviewStatus::Approved),
            Some("CHANGES_REQUESTED") => Some(ReviewStatus::ChangesRequested),
            Some("REVIEW_REQUIRED") => Some(ReviewStatus::ReviewRequired),
            _ => None,
        };

        Ok(PullRequest {
            number: self.number,
            title: self.title,
            body: self.body,
            url: self.url,
            state,
            base_branch: self.base_ref_name,
            head_branch: self.head_ref_name,
            checks: aggregate_checks(self.status_check_rollup.as_deref().unwrap_or_default()),
            review,
        })
    }
}

fn aggregate_checks(checks: &[GhCheck]) -> Option<CheckStatus> {
    if checks.is_empty() {
        return None;
    }

    let mut pending = false;
    for check in checks {
        let outcome = check
            .conclusion
            .as_deref()
            .filter(|value| !value.is_empty())
            .or(check.state.as_deref())
            .unwrap_or_default();

        match outcome {
            "FAILURE" | "ERROR" | "CANCELLED" | "TIMED_OUT" | "ACTION_REQUIRED"
            | "STARTUP_FAILURE" => return Some(CheckStatus::Failing),
            "SUCCESS" | "NEUTRAL" | "SKIPPED" => {}
            _ => pending = true,
        }

        if check
            .status
            .as_deref()
            .is_some_and(|status| status != "COMPLETED")
        {
            pending = true;
        }
    }

    Some(if pending {
        CheckStatus::Pending
    } else {
        CheckStatus::Passing
    })
}

pub fn parse_pull_requests(stdout: &str) -> Result<Vec<PullRequest>, HostingError> {
    let raw: Vec<GhPullRequest> =
        serde_json::from_str(stdout).map_err(|error| HostingError::Decode(error.to_string()))?;
    raw.into_iter().map(GhPullRequest::into_pull_request).collect()
}
