use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use jjdeck_core::hosting::{PullRequestDraft, PullRequestEdit};
use jjdeck_core::model::PullRequest;
use jjdeck_core::vcs::Mutation;
use tracing::{info, warn};

use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequest {
    pub change_id: String,
    pub branch: String,
    pub move_bookmark: bool,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuePullRequest {
    pub change_id: String,
    pub branch: String,
    pub move_bookmark: bool,
}

impl App {
    pub fn list_pull_requests(&self) -> Result<Vec<PullRequest>> {
        self.services()
            .host
            .list_pull_requests()
            .context("failed to list pull requests")
    }

    /// Pushes the branch, then creates the pull request.
    ///
    /// The host may not see a just-pushed branch yet, so creation is retried
    /// on a fixed delay and the last failure is returned when attempts run out.
    pub fn create_pull_request(&self, request: &CreatePullRequest) -> Result<PullRequest> {
        let services = self.services();
        self.push_branch(&request.branch, &request.change_id, request.move_bookmark)?;

        let draft = PullRequestDraft {
            head_branch: request.branch.clone(),
            base_branch: services.config.github.base_branch.clone(),
            title: request.title.clone(),
            body: request.body.clone(),
        };

        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            match services.host.create_pull_request(&draft) {
                Ok(pull_request) => {
                    info!(number = pull_request.number, attempt, "created pull request");
                    return Ok(pull_request);
                }
                Err(error) if attempt < attempts => {
                    warn!(attempt, %error, "pull request creation failed, retrying");
                    thread::sleep(self.retry.delay);
                    attempt += 1;
                }
                Err(error) => {
                    return Err(error).with_context(|| {
                        format!(
                            "failed to create pull request for {} after {attempts} attempts",
                            request.branch
                        )
                    });
                }
            }
        }
    }

    /// Brings an open pull request's branch up to the given change-set and pushes it.
    pub fn continue_pull_request(&self, request: &ContinuePullRequest) -> Result<String> {
        self.push_branch(&request.branch, &request.change_id, request.move_bookmark)
    }

    pub fn update_pull_request(
        &self,
        number: u64,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.services()
            .host
            .update_pull_request(
                number,
                &PullRequestEdit {
                    title: title.to_string(),
                    body: body.to_string(),
                },
            )
            .with_context(|| format!("failed to update pull request #{number}"))
    }

    fn push_branch(&self, branch: &str, change_id: &str, move_bookmark: bool) -> Result<String> {
        if move_bookmark {
            self.mutate(&Mutation::MoveBookmark {
                name: branch.to_string(),
                id: change_id.to_string(),
            })?;
        }
        self.mutate(&Mutation::Push {
            bookmark: branch.to_string(),
        })
    }
}
