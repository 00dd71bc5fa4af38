use anyhow::{Context, Result};
use jjdeck_core::model::{ChangedFile, Repository};
use jjdeck_core::vcs::Mutation;
use tracing::info;

use crate::App;

impl App {
    /// Loads change-sets only; pull requests are fetched separately.
    pub fn load_repository(&self) -> Result<Repository> {
        self.services()
            .vcs
            .load_repository()
            .with_context(|| format!("failed to load repository at {}", self.workspace.display()))
    }

    pub fn mutate(&self, mutation: &Mutation) -> Result<String> {
        let output = self
            .services()
            .vcs
            .mutate(mutation)
            .with_context(|| format!("failed to {mutation}"))?;
        info!(%mutation, "mutation finished");
        Ok(output)
    }

    pub fn fetch_description(&self, id: &str) -> Result<String> {
        self.services()
            .vcs
            .fetch_description(id)
            .with_context(|| format!("failed to read description of {id}"))
    }

    pub fn changed_files(&self, id: &str) -> Result<Vec<ChangedFile>> {
        self.services()
            .vcs
            .changed_files(id)
            .with_context(|| format!("failed to list changed files of {id}"))
    }

    pub fn init_repository(&self) -> Result<()> {
        self.services()
            .vcs
            .init_repository()
            .with_context(|| format!("failed to initialize {}", self.workspace.display()))?;
        info!(workspace = %self.workspace.display(), "initialized repository");
        Ok(())
    }

    pub fn open_url(&self, url: &str) -> Result<()> {
        jjdeck_core::browser::open_url(self.runner.as_ref(), url)
            .with_context(|| format!("failed to open {url}"))
    }
}
