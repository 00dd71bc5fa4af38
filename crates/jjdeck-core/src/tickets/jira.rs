use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

use super::{TicketError, TicketService};
use crate::model::{Ticket, Transition};

const ISSUE_FIELDS: &str = "summary,status,issuetype,priority,description";
const ASSIGNED_JQL: &str =
    "assignee = currentUser() AND resolution = Unresolved ORDER BY updated DESC";
const MAX_RESULTS: &str = "100";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraCredentials {
    pub base_url: String,
    pub email: String,
    pub token: String,
}

pub struct JiraProvider {
    credentials: JiraCredentials,
    client: Client,
}

impl JiraProvider {
    pub fn new(mut credentials: JiraCredentials) -> Result<Self, TicketError> {
        credentials.base_url = credentials.base_url.trim().trim_end_matches('/').to_string();
        let client = Client::builder()
            .user_agent(concat!("jjdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|error| TicketError::Http(error.to_string()))?;

        Ok(Self {
            credentials,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2{path}", self.credentials.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.credentials.email, Some(&self.credentials.token))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<String, TicketError> {
        let response = self
            .authorized(request)
            .send()
            .map_err(|error| TicketError::Http(format!("{what}: {error}")))?;
        read_body(response, what)
    }
}

impl TicketService for JiraProvider {
    fn provider_name(&self) -> &'static str {
        "Jira"
    }

    fn list_assigned(&self) -> Result<Vec<Ticket>, TicketError> {
        let request = self.client.get(self.url("/search")).query(&[
            ("jql", ASSIGNED_JQL),
            ("fields", ISSUE_FIELDS),
            ("maxResults", MAX_RESULTS),
        ]);
        let body = self.send(request, "search assigned issues")?;
        let tickets = parse_search(&body, &self.credentials.base_url)?;
        debug!(count = tickets.len(), "listed jira issues");
        Ok(tickets)
    }

    fn get(&self, key: &str) -> Result<Ticket, TicketError> {
        let request = self
            .client
            .get(self.url(&format!("/issue/{key}")))
            .query(&[("fields", ISSUE_FIELDS)]);
        let body = match self.send(request, "get issue") {
            Err(TicketError::Status { status: 404, .. }) => {
                return Err(TicketError::NotFound {
                    key: key.to_string(),
                });
            }
            other => other?,
        };
        let issue: JiraIssue =
            serde_json::from_str(&body).map_err(|error| TicketError::Decode(error.to_string()))?;
        Ok(issue.into_ticket(&self.credentials.base_url))
    }

    fn browser_url(&self, ticket: &Ticket) -> String {
        browse_url(&self.credentials.base_url, &ticket.key)
    }

    fn available_transitions(&self, key: &str) -> Result<Vec<Transition>, TicketError> {
        let request = self
            .client
            .get(self.url(&format!("/issue/{key}/transitions")));
        let body = self.send(request, "list transitions")?;
        parse_transitions(&body)
    }

    fn apply_transition(&self, key: &str, transition_id: &str) -> Result<(), TicketError> {
        let request = self
            .client
            .post(self.url(&format!("/issue/{key}/transitions")))
            .json(&serde_json::json!({ "transition": { "id": transition_id } }));
        self.send(request, "apply transition")?;
        debug!(key, transition_id, "applied jira transition");
        Ok(())
    }
}

fn read_body(response: Response, what: &str) -> Result<String, TicketError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|error| TicketError::Http(format!("{what}: {error}")))?;

    if !status.is_success() {
        return Err(TicketError::Status {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            }),
        });
    }
    Ok(body)
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let messages = value.get("errorMessages")?.as_array()?;
    let joined = messages
        .iter()
        .filter_map(serde_json::Value::as_str)
        .collect::<Vec<_>>()
        .join("; ");
    (!joined.is_empty()).then_some(joined)
}

fn browse_url(base_url: &str, key: &str) -> String {
    format!("{base_url}/browse/{key}")
}

#[derive(Debug, Deserialize)]
struct JiraSearch {
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Debug, Deserialize)]
struct JiraIssue {
    key: String,
    fields: JiraFields,
}

#[derive(Debug, Deserialize)]
struct JiraFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    status: Option<Named>,
    #[serde(default)]
    issuetype: Option<Named>,
    #[serde(default)]
    priority: Option<Named>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct JiraTransitions {
    #[serde(default)]
    transitions: Vec<JiraTransition>,
}

#[derive(Debug, Deserialize)]
struct JiraTransition {
    id: String,
    name: String,
}

impl JiraIssue {
    fn into_ticket(self, base_url: &str) -> Ticket {
        let name = |value: Option<Named>| value.map(|named| named.name).unwrap_or_default();
        Ticket {
            web_url: Some(browse_url(base_url, &self.key)),
            display_key: self.key.clone(),
            key: self.key,
            summary: self.fields.summary,
            status: name(self.fields.status),
            kind: name(self.fields.issuetype),
            priority: name(self.fields.priority),
            description: self.fields.description.unwrap_or_default(),
        }
    }
}

fn parse_search(body: &str, base_url: &str) -> Result<Vec<Ticket>, TicketError> {
    let search: JiraSearch =
        serde_json::from_str(body).map_err(|error| TicketError::Decode(error.to_string()))?;
    Ok(search
        .issues
        .into_iter()
        .map(|issue| issue.into_ticket(base_url))
        .collect())
}

fn parse_transitions(body: &str) -> Result<Vec<Transition>, TicketError> {
    let parsed: JiraTransitions =
        serde_json::from_str(body).map_err(|error| TicketError::Decode(error.to_string()))?;
    Ok(parsed
        .transitions
        .into_iter()
        .map(|transition| Transition {
            id: transition.id,
            name: transition.name,
        })
        .collect())
}
