use jjdeck_app::{App, AppError, ContinuePullRequest, CreatePullRequest};
use jjdeck_core::config::JjdeckConfig;
use jjdeck_core::vcs::Mutation;

use crate::msg::Msg;

/// Side effects requested by `update`, run off the UI thread.
///
/// Each command produces exactly one result message, success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    LoadRepository,
    RefreshRepository,
    LoadPullRequests,
    LoadTickets,
    LoadChangedFiles {
        id: String,
    },
    FetchDescription {
        id: String,
    },
    Mutate(Mutation),
    CreatePullRequest(CreatePullRequest),
    ContinuePullRequest(ContinuePullRequest),
    UpdatePullRequest {
        number: u64,
        title: String,
        body: String,
    },
    LoadTransitions {
        key: String,
    },
    ApplyTransition {
        key: String,
        transition_id: String,
        name: String,
    },
    SaveSettings(JjdeckConfig),
    SaveGithubToken(String),
    InitRepository,
    OpenUrl(String),
    OpenTicket {
        key: String,
    },
}

impl Command {
    /// Log-safe name; never includes tokens or other field values.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::LoadRepository => "load-repository",
            Self::RefreshRepository => "refresh-repository",
            Self::LoadPullRequests => "load-pull-requests",
            Self::LoadTickets => "load-tickets",
            Self::LoadChangedFiles { .. } => "load-changed-files",
            Self::FetchDescription { .. } => "fetch-description",
            Self::Mutate(mutation) => mutation.label(),
            Self::CreatePullRequest(_) => "create-pull-request",
            Self::ContinuePullRequest(_) => "continue-pull-request",
            Self::UpdatePullRequest { .. } => "update-pull-request",
            Self::LoadTransitions { .. } => "load-transitions",
            Self::ApplyTransition { .. } => "apply-transition",
            Self::SaveSettings(_) => "save-settings",
            Self::SaveGithubToken(_) => "save-github-token",
            Self::InitRepository => "init-repository",
            Self::OpenUrl(_) => "open-url",
            Self::OpenTicket { .. } => "open-ticket",
        }
    }

    pub(crate) fn execute(self, app: &App) -> Msg {
        match self {
            Self::LoadRepository => Msg::RepositoryLoaded(app.load_repository().map_err(AppError::from)),
            Self::RefreshRepository => {
                Msg::RepositoryRefreshed(app.load_repository().map_err(AppError::from))
            }
            Self::LoadPullRequests => {
                Msg::PullRequestsLoaded(app.list_pull_requests().map_err(AppError::from))
            }
            Self::LoadTickets => Msg::TicketsLoaded {
                provider: app.ticket_provider_name(),
                result: app.list_tickets().map_err(AppError::from),
            },
            Self::LoadChangedFiles { id } => {
                let result = app.changed_files(&id).map_err(AppError::from);
                Msg::ChangedFilesLoaded { id, result }
            }
            Self::FetchDescription { id } => {
                let result = app.fetch_description(&id).map_err(AppError::from);
                Msg::DescriptionLoaded { id, result }
            }
            Self::Mutate(mutation) => {
                let result = app.mutate(&mutation).map_err(AppError::from);
                Msg::MutationFinished { mutation, result }
            }
            Self::CreatePullRequest(request) => {
                Msg::PullRequestCreated(app.create_pull_request(&request).map_err(AppError::from))
            }
            Self::ContinuePullRequest(request) => {
                let result = app.continue_pull_request(&request).map_err(AppError::from);
                Msg::PullRequestContinued {
                    branch: request.branch,
                    result,
                }
            }
            Self::UpdatePullRequest {
                number,
                title,
                body,
            } => Msg::PullRequestUpdated(
                app.update_pull_request(number, &title, &body)
                    .map_err(AppError::from),
            ),
            Self::LoadTransitions { key } => {
                let result = app.ticket_transitions(&key).map_err(AppError::from);
                Msg::TransitionsLoaded { key, result }
            }
            Self::ApplyTransition {
                key,
                transition_id,
                name,
            } => {
                let result = app
                    .apply_ticket_transition(&key, &transition_id)
                    .map_err(AppError::from);
                Msg::TransitionApplied { key, name, result }
            }
            Self::SaveSettings(config) => Msg::SettingsSaved(
                app.save_settings(config.clone())
                    .map(|()| config)
                    .map_err(AppError::from),
            ),
            Self::SaveGithubToken(token) => Msg::LoginSaved(
                app.save_github_token(&token)
                    .map(|()| app.config())
                    .map_err(AppError::from),
            ),
            Self::InitRepository => {
                Msg::RepositoryInitialized(app.init_repository().map_err(AppError::from))
            }
            Self::OpenUrl(url) => Msg::UrlOpened(app.open_url(&url).map_err(AppError::from)),
            Self::OpenTicket { key } => {
                Msg::UrlOpened(app.open_ticket(&key).map_err(AppError::from))
            }
        }
    }
}
