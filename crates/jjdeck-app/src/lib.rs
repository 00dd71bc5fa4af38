mod error;
mod pull_requests;
mod repository;
mod services;
mod settings;
mod tickets;

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use jjdeck_core::command_runner::CommandRunner;
use jjdeck_core::config::{JjdeckConfig, load_or_default};

pub use error::{AppError, ErrorKind};
pub use pull_requests::{ContinuePullRequest, CreatePullRequest, RetryPolicy};

use crate::services::Services;

pub struct App {
    runner: Arc<dyn CommandRunner>,
    workspace: PathBuf,
    config_path: PathBuf,
    services: RwLock<Services>,
    retry: RetryPolicy,
}

impl App {
    pub fn open(
        runner: Arc<dyn CommandRunner>,
        workspace: PathBuf,
        config_path: PathBuf,
    ) -> Result<Self> {
        let config = load_or_default(&config_path)
            .with_context(|| format!("failed to load config at {}", config_path.display()))?;
        let services = Services::build(&runner, &workspace, config)?;

        Ok(Self {
            runner,
            workspace,
            config_path,
            services: RwLock::new(services),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> JjdeckConfig {
        self.services().config
    }

    fn services(&self) -> Services {
        self.services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_services(&self, services: Services) {
        *self.services.write().unwrap_or_else(PoisonError::into_inner) = services;
    }
}
