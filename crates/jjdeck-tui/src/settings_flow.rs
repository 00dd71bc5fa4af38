use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use jjdeck_core::config::{JjdeckConfig, TicketProviderKind, validate_config};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::FlowSignal;
use crate::keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingsTab {
    General,
    Github,
    Tickets,
}

pub(crate) const SETTINGS_TABS: [SettingsTab; 3] =
    [SettingsTab::General, SettingsTab::Github, SettingsTab::Tickets];

impl SettingsTab {
    pub(crate) fn title(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Github => "GitHub",
            Self::Tickets => "Tickets",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldId {
    RefreshInterval,
    Revset,
    GithubToken,
    BaseBranch,
    Provider,
    JiraUrl,
    JiraEmail,
    JiraToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Secret,
    Choice,
}

#[derive(Debug)]
pub(crate) struct SettingsField {
    pub(crate) id: FieldId,
    pub(crate) tab: SettingsTab,
    pub(crate) label: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) input: Input,
}

const PROVIDERS: [TicketProviderKind; 3] = [
    TicketProviderKind::None,
    TicketProviderKind::Jira,
    TicketProviderKind::Github,
];

/// Tabbed settings editor over a flat list of fields.
///
/// Enter advances through the flat field order, crossing tab boundaries,
/// and submits only from the final field.
#[derive(Debug)]
pub(crate) struct SettingsForm {
    base: JjdeckConfig,
    pub(crate) fields: Vec<SettingsField>,
    pub(crate) focus: usize,
    pub(crate) error: Option<String>,
}

impl SettingsForm {
    pub(crate) fn new(config: &JjdeckConfig) -> Self {
        let field = |id, tab, label, kind, value: &str| SettingsField {
            id,
            tab,
            label,
            kind,
            input: Input::new(value.to_string()),
        };

        let fields = vec![
            field(
                FieldId::RefreshInterval,
                SettingsTab::General,
                "Refresh interval (seconds, 0 disables)",
                FieldKind::Text,
                &config.general.refresh_interval_secs.to_string(),
            ),
            field(
                FieldId::Revset,
                SettingsTab::General,
                "Revset (empty uses jj's default log)",
                FieldKind::Text,
                &config.general.revset,
            ),
            field(
                FieldId::GithubToken,
                SettingsTab::Github,
                "Token (empty uses gh's own login)",
                FieldKind::Secret,
                &config.github.token,
            ),
            field(
                FieldId::BaseBranch,
                SettingsTab::Github,
                "Base branch for new pull requests",
                FieldKind::Text,
                &config.github.base_branch,
            ),
            field(
                FieldId::Provider,
                SettingsTab::Tickets,
                "Provider",
                FieldKind::Choice,
                config.tickets.provider.as_str(),
            ),
            field(
                FieldId::JiraUrl,
                SettingsTab::Tickets,
                "Jira URL",
                FieldKind::Text,
                &config.tickets.jira_url,
            ),
            field(
                FieldId::JiraEmail,
                SettingsTab::Tickets,
                "Jira email",
                FieldKind::Text,
                &config.tickets.jira_email,
            ),
            field(
                FieldId::JiraToken,
                SettingsTab::Tickets,
                "Jira API token",
                FieldKind::Secret,
                &config.tickets.jira_token,
            ),
        ];

        Self {
            base: config.clone(),
            fields,
            focus: 0,
            error: None,
        }
    }

    pub(crate) fn tab(&self) -> SettingsTab {
        self.fields[self.focus].tab
    }

    pub(crate) fn focused(&self) -> FieldId {
        self.fields[self.focus].id
    }

    pub(crate) fn fields_in(&self, tab: SettingsTab) -> impl Iterator<Item = (usize, &SettingsField)> {
        self.fields
            .iter()
            .enumerate()
            .filter(move |(_, field)| field.tab == tab)
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> FlowSignal<JjdeckConfig> {
        if keymap::is_back(key) {
            return FlowSignal::Cancel;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::PageDown => self.cycle_tab(1),
            KeyCode::PageUp => self.cycle_tab(-1),
            KeyCode::Right if ctrl => self.cycle_tab(1),
            KeyCode::Left if ctrl => self.cycle_tab(-1),
            KeyCode::Tab | KeyCode::Down => self.cycle_field(1),
            KeyCode::BackTab | KeyCode::Up => self.cycle_field(-1),
            KeyCode::Enter => return self.submit_or_advance(),
            _ => self.edit_focused(key),
        }
        FlowSignal::Continue
    }

    fn cycle_tab(&mut self, delta: isize) {
        let current = SETTINGS_TABS
            .iter()
            .position(|tab| *tab == self.tab())
            .unwrap_or(0);
        let next = SETTINGS_TABS[wrap(current, delta, SETTINGS_TABS.len())];
        if let Some(index) = self.fields.iter().position(|field| field.tab == next) {
            self.focus = index;
        }
    }

    fn cycle_field(&mut self, delta: isize) {
        let in_tab: Vec<usize> = self.fields_in(self.tab()).map(|(index, _)| index).collect();
        let Some(current) = in_tab.iter().position(|index| *index == self.focus) else {
            return;
        };
        self.focus = in_tab[wrap(current, delta, in_tab.len())];
    }

    fn submit_or_advance(&mut self) -> FlowSignal<JjdeckConfig> {
        if self.focus + 1 < self.fields.len() {
            self.focus += 1;
            return FlowSignal::Continue;
        }

        match self.build_config() {
            Ok(config) => FlowSignal::Submit(config),
            Err(message) => {
                self.error = Some(message);
                FlowSignal::Continue
            }
        }
    }

    fn edit_focused(&mut self, key: KeyEvent) {
        let field = &mut self.fields[self.focus];
        let changed = if field.kind == FieldKind::Choice {
            let delta = match key.code {
                KeyCode::Left => -1,
                KeyCode::Right | KeyCode::Char(' ') => 1,
                _ => return,
            };
            let current = PROVIDERS
                .iter()
                .position(|provider| provider.as_str() == field.input.value())
                .unwrap_or(0);
            let next = PROVIDERS[wrap(current, delta, PROVIDERS.len())];
            field.input = Input::new(next.as_str().to_string());
            true
        } else {
            field.input.handle_event(&Event::Key(key)).is_some()
        };

        if changed {
            self.error = None;
        }
    }

    fn value(&self, id: FieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map_or("", |field| field.input.value().trim())
    }

    pub(crate) fn build_config(&self) -> Result<JjdeckConfig, String> {
        let mut config = self.base.clone();

        config.general.refresh_interval_secs = self
            .value(FieldId::RefreshInterval)
            .parse()
            .map_err(|_| "refresh interval must be a whole number of seconds".to_string())?;
        config.general.revset = self.value(FieldId::Revset).to_string();
        config.github.token = self.value(FieldId::GithubToken).to_string();
        config.github.base_branch = self.value(FieldId::BaseBranch).to_string();
        config.tickets.provider = TicketProviderKind::parse(self.value(FieldId::Provider))
            .ok_or_else(|| "provider must be none, jira or github".to_string())?;
        config.tickets.jira_url = self.value(FieldId::JiraUrl).to_string();
        config.tickets.jira_email = self.value(FieldId::JiraEmail).to_string();
        config.tickets.jira_token = self.value(FieldId::JiraToken).to_string();

        validate_config(&config).map_err(|error| error.to_string())?;
        Ok(config)
    }
}

fn wrap(current: usize, delta: isize, len: usize) -> usize {
    let len = len.max(1) as isize;
    (current as isize + delta).rem_euclid(len) as usize
}
