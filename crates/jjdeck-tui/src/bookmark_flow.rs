use crossterm::event::{Event, KeyEvent};
use jjdeck_core::model::ChangeSet;
use jjdeck_core::names::validate_bookmark_name;
use jjdeck_core::vcs::Mutation;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::FlowSignal;
use crate::keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BookmarkMode {
    Typing,
    Browsing,
}

/// Names a new bookmark for a change-set, or picks an existing one to move there.
#[derive(Debug)]
pub(crate) struct BookmarkFlow {
    pub(crate) target_id: String,
    pub(crate) target_label: String,
    pub(crate) mode: BookmarkMode,
    pub(crate) input: Input,
    pub(crate) existing: Vec<String>,
    pub(crate) selected: usize,
    pub(crate) error: Option<String>,
}

impl BookmarkFlow {
    /// `existing` should hold every bookmark in the repository; ones already
    /// on the target are dropped since moving them is a no-op.
    pub(crate) fn new(target: &ChangeSet, existing: Vec<String>, suggestion: Option<String>) -> Self {
        let mut existing: Vec<String> = existing
            .into_iter()
            .filter(|name| !target.bookmarks.contains(name))
            .collect();
        existing.sort();
        existing.dedup();

        Self {
            target_id: target.id.clone(),
            target_label: format!("{} {}", target.short_id, target.display_summary()),
            mode: BookmarkMode::Typing,
            input: Input::new(suggestion.unwrap_or_default()),
            existing,
            selected: 0,
            error: None,
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> FlowSignal<Mutation> {
        if keymap::is_back(key) {
            return FlowSignal::Cancel;
        }

        if keymap::is_next_field(key) || keymap::is_previous_field(key) {
            self.toggle_mode();
            return FlowSignal::Continue;
        }

        match self.mode {
            BookmarkMode::Typing => self.on_key_typing(key),
            BookmarkMode::Browsing => self.on_key_browsing(key),
        }
    }

    fn toggle_mode(&mut self) {
        self.error = None;
        self.mode = match self.mode {
            BookmarkMode::Typing if self.existing.is_empty() => {
                self.error = Some("no other bookmarks to move here".to_string());
                BookmarkMode::Typing
            }
            BookmarkMode::Typing => BookmarkMode::Browsing,
            BookmarkMode::Browsing => BookmarkMode::Typing,
        };
    }

    fn on_key_typing(&mut self, key: KeyEvent) -> FlowSignal<Mutation> {
        if keymap::is_confirm(key) {
            let name = self.input.value().trim().to_string();
            if let Err(error) = validate_bookmark_name(&name) {
                self.error = Some(error.to_string());
                return FlowSignal::Continue;
            }
            if self.existing.contains(&name) {
                self.error = Some(format!(
                    "bookmark {name} already exists; press Tab to move it"
                ));
                return FlowSignal::Continue;
            }
            return FlowSignal::Submit(Mutation::CreateBookmark {
                name,
                id: self.target_id.clone(),
            });
        }

        if self.input.handle_event(&Event::Key(key)).is_some() {
            self.error = None;
        }
        FlowSignal::Continue
    }

    fn on_key_browsing(&mut self, key: KeyEvent) -> FlowSignal<Mutation> {
        if keymap::is_up(key) {
            self.selected = self.selected.saturating_sub(1);
        } else if keymap::is_down(key) {
            if self.selected + 1 < self.existing.len() {
                self.selected += 1;
            }
        } else if keymap::is_confirm(key)
            && let Some(name) = self.existing.get(self.selected)
        {
            return FlowSignal::Submit(Mutation::MoveBookmark {
                name: name.clone(),
                id: self.target_id.clone(),
            });
        }
        FlowSignal::Continue
    }
}
