use anyhow::{Context, Result};
use jjdeck_core::config::{JjdeckConfig, save_config};
use tracing::info;

use crate::App;
use crate::services::Services;

impl App {
    /// Persists the config and swaps in collaborators built from it.
    ///
    /// Nothing is written when the new services cannot be built.
    pub fn save_settings(&self, config: JjdeckConfig) -> Result<()> {
        let services = Services::build(&self.runner, &self.workspace, config.clone())?;
        save_config(&self.config_path, &config).with_context(|| {
            format!("failed to save settings to {}", self.config_path.display())
        })?;

        self.replace_services(services);
        info!(path = %self.config_path.display(), "saved settings");
        Ok(())
    }

    pub fn save_github_token(&self, token: &str) -> Result<()> {
        let mut config = self.config();
        config.github.token = token.trim().to_string();
        self.save_settings(config)
            .context("failed to store GitHub token")
    }
}
