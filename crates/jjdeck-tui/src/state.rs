use jjdeck_app::AppError;
use jjdeck_core::config::JjdeckConfig;
use jjdeck_core::model::{ChangeSet, ChangedFile, PullRequest, Repository, Ticket, Transition};

use crate::bookmark_flow::BookmarkFlow;
use crate::editor_flow::{DescriptionEditor, LoginForm, PullRequestEditor};
use crate::keymap::InputScope;
use crate::rebase_flow::RebaseState;
use crate::refresh::RefreshDriver;
use crate::settings_flow::SettingsForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewMode {
    Graph,
    PullRequests,
    Tickets,
    Help,
    Settings,
    EditDescription,
    EditPullRequest,
    Bookmark,
    Login,
}

pub(crate) const LIST_VIEWS: [ViewMode; 3] =
    [ViewMode::Graph, ViewMode::PullRequests, ViewMode::Tickets];

impl ViewMode {
    pub(crate) fn is_list(self) -> bool {
        LIST_VIEWS.contains(&self)
    }
}

/// Selected row of a list, `None` when nothing is selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ListCursor {
    index: Option<usize>,
}

impl ListCursor {
    pub(crate) fn get(self) -> Option<usize> {
        self.index
    }

    pub(crate) fn select(&mut self, index: Option<usize>, len: usize) {
        self.index = index;
        self.clamp(len);
    }

    /// Keeps the index in range, selecting the first row of a list that
    /// just became non-empty.
    pub(crate) fn clamp(&mut self, len: usize) {
        self.index = match (self.index, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(index), len) => Some(index.min(len - 1)),
        };
    }

    pub(crate) fn up(&mut self, len: usize) {
        self.index = self.index.map(|index| index.saturating_sub(1));
        self.clamp(len);
    }

    pub(crate) fn down(&mut self, len: usize) {
        self.index = self.index.map(|index| index.saturating_add(1));
        self.clamp(len);
    }

    pub(crate) fn first(&mut self, len: usize) {
        self.select(Some(0), len);
    }

    pub(crate) fn last(&mut self, len: usize) {
        self.select(len.checked_sub(1), len);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Progress,
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusLine {
    pub(crate) kind: StatusKind,
    pub(crate) message: String,
}

/// Files touched by the selected change-set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ChangedFilesPanel {
    pub(crate) id: Option<String>,
    pub(crate) files: Vec<ChangedFile>,
    pub(crate) loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransitionPicker {
    pub(crate) key: String,
    pub(crate) display_key: String,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) selected: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

#[derive(Debug)]
pub(crate) struct AppState {
    pub(crate) config: JjdeckConfig,
    pub(crate) repository: Option<Repository>,
    pub(crate) pull_requests: Vec<PullRequest>,
    pub(crate) pull_requests_requested: bool,
    pub(crate) tickets: Vec<Ticket>,
    pub(crate) ticket_provider: Option<&'static str>,

    pub(crate) view: ViewMode,
    pub(crate) return_view: ViewMode,
    pub(crate) graph_cursor: ListCursor,
    pub(crate) pull_request_cursor: ListCursor,
    pub(crate) ticket_cursor: ListCursor,
    pub(crate) changed_files: ChangedFilesPanel,

    pub(crate) error: Option<AppError>,
    pub(crate) loading: bool,
    pub(crate) status: Option<StatusLine>,

    pub(crate) rebase: RebaseState,
    pub(crate) bookmark: Option<BookmarkFlow>,
    pub(crate) settings: Option<SettingsForm>,
    pub(crate) description: Option<DescriptionEditor>,
    pub(crate) pull_request_editor: Option<PullRequestEditor>,
    pub(crate) login: Option<LoginForm>,
    pub(crate) transitions: Option<TransitionPicker>,

    pub(crate) refresh: RefreshDriver,
    pub(crate) viewport: Viewport,
    pub(crate) should_quit: bool,
}

impl AppState {
    pub(crate) fn new(config: JjdeckConfig) -> Self {
        let refresh = RefreshDriver::new(config.general.refresh_interval_secs);
        Self {
            config,
            repository: None,
            pull_requests: Vec::new(),
            pull_requests_requested: false,
            tickets: Vec::new(),
            ticket_provider: None,
            view: ViewMode::Graph,
            return_view: ViewMode::Graph,
            graph_cursor: ListCursor::default(),
            pull_request_cursor: ListCursor::default(),
            ticket_cursor: ListCursor::default(),
            changed_files: ChangedFilesPanel::default(),
            error: None,
            loading: false,
            status: None,
            rebase: RebaseState::Normal,
            bookmark: None,
            settings: None,
            description: None,
            pull_request_editor: None,
            login: None,
            transitions: None,
            refresh,
            viewport: Viewport::default(),
            should_quit: false,
        }
    }

    pub(crate) fn graph_len(&self) -> usize {
        self.repository
            .as_ref()
            .map_or(0, |repository| repository.graph().len())
    }

    pub(crate) fn selected_change(&self) -> Option<(usize, &ChangeSet)> {
        let index = self.graph_cursor.get()?;
        let change = self.repository.as_ref()?.graph().get(index)?;
        Some((index, change))
    }

    pub(crate) fn selected_pull_request(&self) -> Option<&PullRequest> {
        self.pull_requests.get(self.pull_request_cursor.get()?)
    }

    pub(crate) fn selected_ticket(&self) -> Option<&Ticket> {
        self.tickets.get(self.ticket_cursor.get()?)
    }

    /// The list view underneath any modal.
    pub(crate) fn list_view(&self) -> ViewMode {
        if self.view.is_list() {
            self.view
        } else {
            self.return_view
        }
    }

    /// `None` means the open editor receives raw keys.
    pub(crate) fn input_scope(&self) -> Option<InputScope> {
        if self.error.is_some() {
            return Some(InputScope::Error);
        }
        if self.rebase.is_picking() {
            return Some(InputScope::RebasePicking);
        }
        if self.transitions.is_some() {
            return Some(InputScope::TransitionPicking);
        }
        match self.view {
            ViewMode::Graph => Some(InputScope::Graph),
            ViewMode::PullRequests => Some(InputScope::PullRequests),
            ViewMode::Tickets => Some(InputScope::Tickets),
            ViewMode::Help => Some(InputScope::Help),
            ViewMode::Settings
            | ViewMode::EditDescription
            | ViewMode::EditPullRequest
            | ViewMode::Bookmark
            | ViewMode::Login => None,
        }
    }

    /// Views during which a background reload would fight the user.
    pub(crate) fn refresh_suppressed(&self) -> bool {
        !self.view.is_list()
            || self.rebase.is_picking()
            || self.transitions.is_some()
            || self.loading
    }

    pub(crate) fn open_modal(&mut self, view: ViewMode) {
        self.return_view = self.list_view();
        self.view = view;
    }

    pub(crate) fn close_modal(&mut self) {
        self.view = self.return_view;
        self.bookmark = None;
        self.settings = None;
        self.description = None;
        self.pull_request_editor = None;
        self.login = None;
    }

    pub(crate) fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some(StatusLine {
            kind,
            message: message.into(),
        });
    }

    pub(crate) fn start_progress(&mut self, message: impl Into<String>) {
        self.loading = true;
        self.set_status(StatusKind::Progress, message);
    }

    /// Records a failure, ends any foreground wait and halts periodic refresh.
    pub(crate) fn fail(&mut self, error: AppError) {
        tracing::warn!(kind = ?error.kind, error = %error.message, "operation failed");
        self.error = Some(error);
        self.loading = false;
        if self
            .status
            .as_ref()
            .is_some_and(|status| status.kind == StatusKind::Progress)
        {
            self.status = None;
        }
        self.refresh.disarm();
    }
}
