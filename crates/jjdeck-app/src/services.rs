use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use jjdeck_core::command_runner::CommandRunner;
use jjdeck_core::config::{JjdeckConfig, TicketProviderKind};
use jjdeck_core::github::GhCli;
use jjdeck_core::hosting::CodeHostService;
use jjdeck_core::jj::JjCli;
use jjdeck_core::tickets::{GithubIssuesProvider, JiraCredentials, JiraProvider, TicketService};
use jjdeck_core::vcs::VcsService;
use tracing::info;

/// Collaborators configured from one `JjdeckConfig`. Cloning shares them.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) config: JjdeckConfig,
    pub(crate) vcs: Arc<dyn VcsService>,
    pub(crate) host: Arc<dyn CodeHostService>,
    pub(crate) tickets: Option<Arc<dyn TicketService>>,
}

impl Services {
    pub(crate) fn build(
        runner: &Arc<dyn CommandRunner>,
        workspace: &Path,
        config: JjdeckConfig,
    ) -> Result<Self> {
        let vcs = JjCli::new(runner.clone(), workspace.to_path_buf())
            .with_revset(&config.general.revset);
        let gh = GhCli::new(runner.clone(), workspace.to_path_buf())
            .with_token(&config.github.token);

        let tickets: Option<Arc<dyn TicketService>> = match config.tickets.provider {
            TicketProviderKind::None => None,
            TicketProviderKind::Jira => {
                let provider = JiraProvider::new(JiraCredentials {
                    base_url: config.tickets.jira_url.clone(),
                    email: config.tickets.jira_email.clone(),
                    token: config.tickets.jira_token.clone(),
                })
                .context("failed to configure Jira client")?;
                Some(Arc::new(provider))
            }
            TicketProviderKind::Github => Some(Arc::new(GithubIssuesProvider::new(gh.clone()))),
        };

        info!(
            provider = %config.tickets.provider,
            revset = config.general.revset.as_str(),
            "configured services"
        );

        Ok(Self {
            config,
            vcs: Arc::new(vcs),
            host: Arc::new(gh),
            tickets,
        })
    }
}
