use thiserror::Error;

use crate::hosting::HostingError;
use crate::model::{Ticket, Transition};

mod github_issues;
mod jira;

pub use github_issues::GithubIssuesProvider;
pub use jira::{JiraCredentials, JiraProvider};

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("ticket request failed: {0}")]
    Http(String),
    #[error("ticket service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode ticket response: {0}")]
    Decode(String),
    #[error("ticket {key} not found")]
    NotFound { key: String },
    #[error("unknown transition '{id}' for ticket {key}")]
    UnknownTransition { key: String, id: String },
    #[error(transparent)]
    Hosting(#[from] HostingError),
}

/// One interchangeable work-item provider.
pub trait TicketService: Send + Sync {
    fn provider_name(&self) -> &'static str;

    fn list_assigned(&self) -> Result<Vec<Ticket>, TicketError>;

    fn get(&self, key: &str) -> Result<Ticket, TicketError>;

    /// Page to open for `ticket`; empty when the provider has none.
    fn browser_url(&self, ticket: &Ticket) -> String;

    fn available_transitions(&self, key: &str) -> Result<Vec<Transition>, TicketError>;

    fn apply_transition(&self, key: &str, transition_id: &str) -> Result<(), TicketError>;
}
