use crossterm::event::{Event, KeyEvent};
use jjdeck_app::CreatePullRequest;
use jjdeck_core::model::{ChangeSet, PullRequest};
use jjdeck_core::vcs::Mutation;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::FlowSignal;
use crate::keymap;
use crate::text_buffer::TextBuffer;

/// Edits a change-set description; Ctrl+S saves.
#[derive(Debug)]
pub(crate) struct DescriptionEditor {
    pub(crate) id: String,
    pub(crate) short_id: String,
    pub(crate) loading: bool,
    pub(crate) buffer: TextBuffer,
    ticket_prefix: Option<String>,
}

impl DescriptionEditor {
    /// Opens in a loading state until the full description arrives.
    pub(crate) fn new(change: &ChangeSet, ticket_prefix: Option<String>) -> Self {
        Self {
            id: change.id.clone(),
            short_id: change.short_id.clone(),
            loading: true,
            buffer: TextBuffer::default(),
            ticket_prefix,
        }
    }

    /// A blank description is seeded with the ticket key of the branch it sits on.
    pub(crate) fn fill(&mut self, description: &str) {
        let description = description.trim_end_matches('\n');
        self.buffer = match (&self.ticket_prefix, description.trim().is_empty()) {
            (Some(prefix), true) => TextBuffer::new(&format!("{prefix}: ")),
            _ => TextBuffer::new(description),
        };
        self.loading = false;
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> FlowSignal<Mutation> {
        if keymap::is_back(key) {
            return FlowSignal::Cancel;
        }
        if self.loading {
            return FlowSignal::Continue;
        }
        if keymap::is_save(key) {
            return FlowSignal::Submit(Mutation::Describe {
                id: self.id.clone(),
                text: self.buffer.text(),
            });
        }
        self.buffer.handle_key(key);
        FlowSignal::Continue
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PullRequestTarget {
    Create {
        change_id: String,
        branch: String,
        move_bookmark: bool,
    },
    Edit {
        number: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PullRequestSubmission {
    Create(CreatePullRequest),
    Update {
        number: u64,
        title: String,
        body: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PullRequestField {
    Title,
    Body,
}

#[derive(Debug)]
pub(crate) struct PullRequestEditor {
    pub(crate) target: PullRequestTarget,
    pub(crate) title: Input,
    pub(crate) body: TextBuffer,
    pub(crate) focus: PullRequestField,
    pub(crate) error: Option<String>,
}

impl PullRequestEditor {
    /// Prefills from the change-set: first line as title, the rest as body.
    pub(crate) fn for_change(change: &ChangeSet, branch: &str, move_bookmark: bool) -> Self {
        let description = change.description.trim_end();
        let (title, body) = match description.split_once('\n') {
            Some((title, body)) => (title, body.trim_start_matches('\n')),
            None => (description, ""),
        };

        Self {
            target: PullRequestTarget::Create {
                change_id: change.id.clone(),
                branch: branch.to_string(),
                move_bookmark,
            },
            title: Input::new(title.trim().to_string()),
            body: TextBuffer::new(body),
            focus: PullRequestField::Title,
            error: None,
        }
    }

    pub(crate) fn for_pull_request(pull_request: &PullRequest) -> Self {
        Self {
            target: PullRequestTarget::Edit {
                number: pull_request.number,
            },
            title: Input::new(pull_request.title.clone()),
            body: TextBuffer::new(pull_request.body.trim_end()),
            focus: PullRequestField::Title,
            error: None,
        }
    }

    pub(crate) fn heading(&self) -> String {
        match &self.target {
            PullRequestTarget::Create { branch, .. } => format!("New pull request from {branch}"),
            PullRequestTarget::Edit { number } => format!("Edit pull request #{number}"),
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> FlowSignal<PullRequestSubmission> {
        if keymap::is_back(key) {
            return FlowSignal::Cancel;
        }
        if keymap::is_save(key) {
            return self.submit();
        }
        if keymap::is_next_field(key) || keymap::is_previous_field(key) {
            self.focus = match self.focus {
                PullRequestField::Title => PullRequestField::Body,
                PullRequestField::Body => PullRequestField::Title,
            };
            return FlowSignal::Continue;
        }

        match self.focus {
            PullRequestField::Title if keymap::is_confirm(key) => {
                self.focus = PullRequestField::Body;
            }
            PullRequestField::Title => {
                if self.title.handle_event(&Event::Key(key)).is_some() {
                    self.error = None;
                }
            }
            PullRequestField::Body => {
                self.body.handle_key(key);
            }
        }
        FlowSignal::Continue
    }

    fn submit(&mut self) -> FlowSignal<PullRequestSubmission> {
        let title = self.title.value().trim().to_string();
        if title.is_empty() {
            self.error = Some("a title is required".to_string());
            self.focus = PullRequestField::Title;
            return FlowSignal::Continue;
        }
        let body = self.body.text().trim_end().to_string();

        FlowSignal::Submit(match &self.target {
            PullRequestTarget::Create {
                change_id,
                branch,
                move_bookmark,
            } => PullRequestSubmission::Create(CreatePullRequest {
                change_id: change_id.clone(),
                branch: branch.clone(),
                move_bookmark: *move_bookmark,
                title,
                body,
            }),
            PullRequestTarget::Edit { number } => PullRequestSubmission::Update {
                number: *number,
                title,
                body,
            },
        })
    }
}

/// Collects a GitHub token; the value is only ever rendered masked.
#[derive(Debug, Default)]
pub(crate) struct LoginForm {
    pub(crate) token: Input,
    pub(crate) error: Option<String>,
}

impl LoginForm {
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> FlowSignal<String> {
        if keymap::is_back(key) {
            return FlowSignal::Cancel;
        }
        if keymap::is_confirm(key) {
            let token = self.token.value().trim().to_string();
            if token.is_empty() {
                self.error = Some("paste a personal access token first".to_string());
                return FlowSignal::Continue;
            }
            return FlowSignal::Submit(token);
        }
        if self.token.handle_event(&Event::Key(key)).is_some() {
            self.error = None;
        }
        FlowSignal::Continue
    }
}
