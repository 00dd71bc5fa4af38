use crossterm::event::{KeyEvent, MouseEvent};
use jjdeck_app::AppError;
use jjdeck_core::config::JjdeckConfig;
use jjdeck_core::model::{ChangedFile, PullRequest, Repository, Ticket, Transition};
use jjdeck_core::vcs::Mutation;

/// Everything the dashboard reacts to.
///
/// Terminal input and timer ticks arrive from the event loop; every other
/// variant is the single result of one finished `Command`.
#[derive(Debug, Clone)]
pub(crate) enum Msg {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    Tick,
    Action(Action),

    RepositoryLoaded(Result<Repository, AppError>),
    RepositoryRefreshed(Result<Repository, AppError>),
    PullRequestsLoaded(Result<Vec<PullRequest>, AppError>),
    TicketsLoaded {
        provider: Option<&'static str>,
        result: Result<Vec<Ticket>, AppError>,
    },
    ChangedFilesLoaded {
        id: String,
        result: Result<Vec<ChangedFile>, AppError>,
    },
    DescriptionLoaded {
        id: String,
        result: Result<String, AppError>,
    },
    MutationFinished {
        mutation: Mutation,
        result: Result<String, AppError>,
    },
    PullRequestCreated(Result<PullRequest, AppError>),
    PullRequestContinued {
        branch: String,
        result: Result<String, AppError>,
    },
    PullRequestUpdated(Result<PullRequest, AppError>),
    TransitionsLoaded {
        key: String,
        result: Result<Vec<Transition>, AppError>,
    },
    TransitionApplied {
        key: String,
        name: String,
        result: Result<(), AppError>,
    },
    SettingsSaved(Result<JjdeckConfig, AppError>),
    LoginSaved(Result<JjdeckConfig, AppError>),
    RepositoryInitialized(Result<(), AppError>),
    UrlOpened(Result<(), AppError>),
}

/// User intents resolved from key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Action {
    MoveUp,
    MoveDown,
    MoveFirst,
    MoveLast,

    Checkout,
    NewChange,
    Squash,
    Abandon,
    Rebase,
    Describe,
    Bookmark,
    DeleteBookmark,
    Push,
    PullRequest,

    EditPullRequest,
    Transitions,
    BookmarkFromTicket,

    Refresh,
    OpenInBrowser,
    ShowGraph,
    ShowPullRequests,
    ShowTickets,
    NextView,
    OpenSettings,
    OpenLogin,
    ToggleHelp,
    Quit,

    Confirm,
    Cancel,

    Retry,
    Dismiss,
    InitRepository,
}

impl Action {
    /// Actions still honored while an error is shown.
    pub(crate) fn allowed_during_error(self) -> bool {
        matches!(
            self,
            Self::Quit | Self::Retry | Self::Dismiss | Self::InitRepository
        )
    }
}
