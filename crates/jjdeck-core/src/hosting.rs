use thiserror::Error;

use crate::model::PullRequest;

#[derive(Debug, Error)]
pub enum HostingError {
    #[error("gh command failed: gh {command} (exit {status}) {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("failed to execute gh: {0}")]
    Execute(String),
    #[error("failed to decode gh output: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEdit {
    pub title: String,
    pub body: String,
}

/// Code host access. Listings are eventually consistent with pushes.
pub trait CodeHostService: Send + Sync {
    fn list_pull_requests(&self) -> Result<Vec<PullRequest>, HostingError>;

    fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequest, HostingError>;

    fn update_pull_request(
        &self,
        number: u64,
        edit: &PullRequestEdit,
    ) -> Result<PullRequest, HostingError>;
}
