use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use jjdeck_core::model::{Ticket, Transition};
use jjdeck_core::tickets::TicketService;

use crate::App;

impl App {
    pub fn ticket_provider_name(&self) -> Option<&'static str> {
        self.services()
            .tickets
            .as_ref()
            .map(|provider| provider.provider_name())
    }

    /// Empty when no provider is configured.
    pub fn list_tickets(&self) -> Result<Vec<Ticket>> {
        let Some(provider) = self.services().tickets else {
            return Ok(Vec::new());
        };
        provider
            .list_assigned()
            .with_context(|| format!("failed to list {} tickets", provider.provider_name()))
    }

    pub fn ticket(&self, key: &str) -> Result<Ticket> {
        let provider = self.ticket_provider()?;
        provider
            .get(key)
            .with_context(|| format!("failed to load ticket {key}"))
    }

    /// Re-reads `key` from the provider and opens the page it points at.
    pub fn open_ticket(&self, key: &str) -> Result<()> {
        let provider = self.ticket_provider()?;
        let ticket = self.ticket(key)?;
        let url = provider.browser_url(&ticket);
        if url.is_empty() {
            bail!("{} has no page for ticket {key}", provider.provider_name());
        }
        self.open_url(&url)
    }

    pub fn ticket_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let provider = self.ticket_provider()?;
        provider
            .available_transitions(key)
            .with_context(|| format!("failed to list transitions for {key}"))
    }

    pub fn apply_ticket_transition(&self, key: &str, transition_id: &str) -> Result<()> {
        let provider = self.ticket_provider()?;
        provider
            .apply_transition(key, transition_id)
            .with_context(|| format!("failed to transition {key}"))
    }

    fn ticket_provider(&self) -> Result<Arc<dyn TicketService>> {
        self.services()
            .tickets
            .ok_or_else(|| anyhow!("no ticket provider is configured"))
    }
}
