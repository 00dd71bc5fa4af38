use serde::Deserialize;
use tracing::debug;

use super::{TicketError, TicketService};
use crate::github::GhCli;
use crate::model::{Ticket, Transition};

const ISSUE_FIELDS: &str = "number,title,state,labels,body,url";
const CLOSE: &str = "close";
const REOPEN: &str = "reopen";

pub struct GithubIssuesProvider {
    gh: GhCli,
}

impl GithubIssuesProvider {
    pub fn new(gh: GhCli) -> Self {
        Self { gh }
    }

    fn state_of(&self, key: &str) -> Result<String, TicketError> {
        Ok(self.get(key)?.status)
    }
}

impl TicketService for GithubIssuesProvider {
    fn provider_name(&self) -> &'static str {
        "GitHub Issues"
    }

    fn list_assigned(&self) -> Result<Vec<Ticket>, TicketError> {
        let output = self.gh.run_checked(&[
            "issue",
            "list",
            "--assignee",
            "@me",
            "--state",
            "open",
            "--json",
            ISSUE_FIELDS,
        ])?;
        let tickets = parse_issues(&output.stdout)?;
        debug!(count = tickets.len(), "listed github issues");
        Ok(tickets)
    }

    fn get(&self, key: &str) -> Result<Ticket, TicketError> {
        let key = key.trim_start_matches('#');
        let output = self
            .gh
            .run_checked(&["issue", "view", key, "--json", ISSUE_FIELDS])?;
        let issue: GhIssue = serde_json::from_str(&output.stdout)
            .map_err(|error| TicketError::Decode(error.to_string()))?;
        Ok(issue.into_ticket())
    }

    fn browser_url(&self, ticket: &Ticket) -> String {
        ticket.web_url.clone().unwrap_or_default()
    }

    fn available_transitions(&self, key: &str) -> Result<Vec<Transition>, TicketError> {
        let transition = if self.state_of(key)? == "open" {
            Transition {
                id: CLOSE.to_string(),
                name: "Close".to_string(),
            }
        } else {
            Transition {
                id: REOPEN.to_string(),
                name: "Reopen".to_string(),
            }
        };
        Ok(vec![transition])
    }

    fn apply_transition(&self, key: &str, transition_id: &str) -> Result<(), TicketError> {
        if transition_id != CLOSE && transition_id != REOPEN {
            return Err(TicketError::UnknownTransition {
                key: key.to_string(),
                id: transition_id.to_string(),
            });
        }

        let key = key.trim_start_matches('#');
        self.gh.run_checked(&["issue", transition_id, key])?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    state: String,
    #[serde(default)]
    labels: Vec<GhLabel>,
    #[serde(default)]
    body: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct GhLabel {
    name: String,
}

impl GhIssue {
    fn into_ticket(self) -> Ticket {
        Ticket {
            key: self.number.to_string(),
            display_key: format!("#{}", self.number),
            summary: self.title,
            status: self.state.to_ascii_lowercase(),
            kind: self
                .labels
                .into_iter()
                .next()
                .map(|label| label.name)
                .unwrap_or_else(|| "issue".to_string()),
            priority: String::new(),
            description: self.body,
            web_url: Some(self.url),
        }
    }
}

fn parse_issues(stdout: &str) -> Result<Vec<Ticket>, TicketError> {
    let issues: Vec<GhIssue> =
        serde_json::from_str(stdout).map_err(|error| TicketError::Decode(error.to_string()))?;
    Ok(issues.into_iter().map(GhIssue::into_ticket).collect())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::command_runner::CommandOutput;
    use crate::test_support::{RecordingRunner, output};

    const ISSUE: &str = r#"{"number": 17, "title": "Crash on start", "state": "OPEN",
        "labels": [{"name": "bug"}], "body": "Steps", "url": "https://github.com/acme/widgets/issues/17"}"#;

    fn provider(
        outputs: Vec<anyhow::Result<CommandOutput>>,
    ) -> (Arc<RecordingRunner>, GithubIssuesProvider) {
        let runner = Arc::new(RecordingRunner::from_outputs(outputs));
        let gh = GhCli::new(runner.clone(), PathBuf::from("/tmp/repo"));
        (runner, GithubIssuesProvider::new(gh))
    }

    #[test]
    fn list_maps_issues_to_tickets() {
        let (_, provider) = provider(vec![output(&format!("[{ISSUE}]"), "", 0)]);

        let tickets = provider.list_assigned().expect("list");
        assert_eq!(tickets[0].key, "17");
        assert_eq!(tickets[0].display_key, "#17");
        assert_eq!(tickets[0].status, "open");
        assert_eq!(tickets[0].kind, "bug");
        assert_eq!(
            provider.browser_url(&tickets[0]),
            "https://github.com/acme/widgets/issues/17"
        );
    }

    #[test]
    fn open_issue_offers_close_transition() {
        let (runner, provider) = provider(vec![output(ISSUE, "", 0)]);

        let transitions = provider.available_transitions("#17").expect("transitions");
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].id, "close");
        assert_eq!(runner.calls()[0].args[..3], ["issue", "view", "17"]);
    }

    #[test]
    fn apply_transition_runs_matching_gh_command() {
        let (runner, provider) = provider(vec![output("", "", 0)]);

        provider.apply_transition("17", "reopen").expect("apply");
        assert_eq!(runner.calls()[0].args, vec!["issue", "reopen", "17"]);
    }

    #[test]
    fn apply_transition_rejects_unknown_ids() {
        let (runner, provider) = provider(Vec::new());

        let error = provider
            .apply_transition("17", "delete")
            .expect_err("should fail");
        assert!(matches!(error, TicketError::UnknownTransition { .. }));
        assert!(runner.calls().is_empty());
    }
}
