use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::msg::Action;

pub(crate) fn is_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

pub(crate) fn is_next_field(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Tab)
}

pub(crate) fn is_previous_field(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::BackTab)
}

pub(crate) fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

pub(crate) fn is_save(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s')
}

/// Which binding table receives a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputScope {
    Error,
    RebasePicking,
    TransitionPicking,
    Help,
    Graph,
    PullRequests,
    Tickets,
}

#[derive(Debug)]
pub(crate) struct Binding {
    pub(crate) keys: &'static [KeyCode],
    pub(crate) hint: &'static str,
    pub(crate) action: Action,
    pub(crate) description: &'static str,
}

const NAVIGATION: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Up, KeyCode::Char('k')],
        hint: "k/Up",
        action: Action::MoveUp,
        description: "move up",
    },
    Binding {
        keys: &[KeyCode::Down, KeyCode::Char('j')],
        hint: "j/Down",
        action: Action::MoveDown,
        description: "move down",
    },
    Binding {
        keys: &[KeyCode::Home, KeyCode::Char('g')],
        hint: "g/Home",
        action: Action::MoveFirst,
        description: "jump to top",
    },
    Binding {
        keys: &[KeyCode::End, KeyCode::Char('G')],
        hint: "G/End",
        action: Action::MoveLast,
        description: "jump to bottom",
    },
];

const GLOBAL: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Char('1')],
        hint: "1",
        action: Action::ShowGraph,
        description: "change graph",
    },
    Binding {
        keys: &[KeyCode::Char('2')],
        hint: "2",
        action: Action::ShowPullRequests,
        description: "pull requests",
    },
    Binding {
        keys: &[KeyCode::Char('3')],
        hint: "3",
        action: Action::ShowTickets,
        description: "tickets",
    },
    Binding {
        keys: &[KeyCode::Tab],
        hint: "Tab",
        action: Action::NextView,
        description: "next view",
    },
    Binding {
        keys: &[KeyCode::Char('R'), KeyCode::F(5)],
        hint: "R/F5",
        action: Action::Refresh,
        description: "reload everything",
    },
    Binding {
        keys: &[KeyCode::Char(',')],
        hint: ",",
        action: Action::OpenSettings,
        description: "settings",
    },
    Binding {
        keys: &[KeyCode::Char('L')],
        hint: "L",
        action: Action::OpenLogin,
        description: "GitHub login",
    },
    Binding {
        keys: &[KeyCode::Char('?')],
        hint: "?",
        action: Action::ToggleHelp,
        description: "help",
    },
    Binding {
        keys: &[KeyCode::Char('q')],
        hint: "q",
        action: Action::Quit,
        description: "quit",
    },
];

const GRAPH: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Enter, KeyCode::Char('e')],
        hint: "Enter/e",
        action: Action::Checkout,
        description: "edit change",
    },
    Binding {
        keys: &[KeyCode::Char('n')],
        hint: "n",
        action: Action::NewChange,
        description: "new child change",
    },
    Binding {
        keys: &[KeyCode::Char('s')],
        hint: "s",
        action: Action::Squash,
        description: "squash into parent",
    },
    Binding {
        keys: &[KeyCode::Char('a')],
        hint: "a",
        action: Action::Abandon,
        description: "abandon",
    },
    Binding {
        keys: &[KeyCode::Char('r')],
        hint: "r",
        action: Action::Rebase,
        description: "rebase onto...",
    },
    Binding {
        keys: &[KeyCode::Char('d')],
        hint: "d",
        action: Action::Describe,
        description: "edit description",
    },
    Binding {
        keys: &[KeyCode::Char('b')],
        hint: "b",
        action: Action::Bookmark,
        description: "create or move bookmark",
    },
    Binding {
        keys: &[KeyCode::Char('x')],
        hint: "x",
        action: Action::DeleteBookmark,
        description: "delete bookmark",
    },
    Binding {
        keys: &[KeyCode::Char('p')],
        hint: "p",
        action: Action::Push,
        description: "push bookmark",
    },
    Binding {
        keys: &[KeyCode::Char('c')],
        hint: "c",
        action: Action::PullRequest,
        description: "create or update pull request",
    },
    Binding {
        keys: &[KeyCode::Char('o')],
        hint: "o",
        action: Action::OpenInBrowser,
        description: "open pull request",
    },
];

const PULL_REQUESTS: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Char('e')],
        hint: "e",
        action: Action::EditPullRequest,
        description: "edit title and body",
    },
    Binding {
        keys: &[KeyCode::Enter, KeyCode::Char('o')],
        hint: "Enter/o",
        action: Action::OpenInBrowser,
        description: "open in browser",
    },
];

const TICKETS: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Char('t')],
        hint: "t",
        action: Action::Transitions,
        description: "change status",
    },
    Binding {
        keys: &[KeyCode::Char('b')],
        hint: "b",
        action: Action::BookmarkFromTicket,
        description: "bookmark selected change for ticket",
    },
    Binding {
        keys: &[KeyCode::Enter, KeyCode::Char('o')],
        hint: "Enter/o",
        action: Action::OpenInBrowser,
        description: "open in browser",
    },
];

const PICKER: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Enter],
        hint: "Enter",
        action: Action::Confirm,
        description: "confirm",
    },
    Binding {
        keys: &[KeyCode::Esc],
        hint: "Esc",
        action: Action::Cancel,
        description: "cancel",
    },
];

const ERROR: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Char('r')],
        hint: "r",
        action: Action::Retry,
        description: "retry",
    },
    Binding {
        keys: &[KeyCode::Esc],
        hint: "Esc",
        action: Action::Dismiss,
        description: "dismiss",
    },
    Binding {
        keys: &[KeyCode::Char('i')],
        hint: "i",
        action: Action::InitRepository,
        description: "initialize a jj repository here",
    },
    Binding {
        keys: &[KeyCode::Char('q')],
        hint: "q",
        action: Action::Quit,
        description: "quit",
    },
];

const HELP: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Esc],
        hint: "Esc",
        action: Action::Cancel,
        description: "close help",
    },
    Binding {
        keys: &[KeyCode::Char('?')],
        hint: "?",
        action: Action::ToggleHelp,
        description: "close help",
    },
    Binding {
        keys: &[KeyCode::Char('q')],
        hint: "q",
        action: Action::Quit,
        description: "quit",
    },
];

const GRAPH_SCOPE: &[&[Binding]] = &[GRAPH, NAVIGATION, GLOBAL];
const PULL_REQUEST_SCOPE: &[&[Binding]] = &[PULL_REQUESTS, NAVIGATION, GLOBAL];
const TICKET_SCOPE: &[&[Binding]] = &[TICKETS, NAVIGATION, GLOBAL];
const PICKER_SCOPE: &[&[Binding]] = &[PICKER, NAVIGATION];
const ERROR_SCOPE: &[&[Binding]] = &[ERROR];
const HELP_SCOPE: &[&[Binding]] = &[HELP];

fn tables(scope: InputScope) -> &'static [&'static [Binding]] {
    match scope {
        InputScope::Error => ERROR_SCOPE,
        InputScope::RebasePicking | InputScope::TransitionPicking => PICKER_SCOPE,
        InputScope::Help => HELP_SCOPE,
        InputScope::Graph => GRAPH_SCOPE,
        InputScope::PullRequests => PULL_REQUEST_SCOPE,
        InputScope::Tickets => TICKET_SCOPE,
    }
}

/// Bindings in lookup order; earlier tables shadow later ones.
pub(crate) fn bindings(scope: InputScope) -> impl Iterator<Item = &'static Binding> {
    tables(scope).iter().flat_map(|table| table.iter())
}

pub(crate) fn action_for(scope: InputScope, key: KeyEvent) -> Option<Action> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    bindings(scope)
        .find(|binding| binding.keys.contains(&key.code))
        .map(|binding| binding.action)
}
