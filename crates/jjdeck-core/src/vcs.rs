use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{ChangedFile, Repository};

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("no jj repository found at {path}")]
    NoRepository { path: PathBuf },
    #[error("jj command failed: jj {command} (exit {status}) {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("failed to execute jj: {0}")]
    Execute(String),
    #[error("failed to parse jj output: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    NewChange { parent: String },
    Checkout { id: String },
    Squash { id: String },
    Abandon { id: String },
    Rebase { source: String, destination: String },
    Describe { id: String, text: String },
    CreateBookmark { name: String, id: String },
    MoveBookmark { name: String, id: String },
    DeleteBookmark { name: String },
    Push { bookmark: String },
}

impl Mutation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewChange { .. } => "new change",
            Self::Checkout { .. } => "edit",
            Self::Squash { .. } => "squash",
            Self::Abandon { .. } => "abandon",
            Self::Rebase { .. } => "rebase",
            Self::Describe { .. } => "describe",
            Self::CreateBookmark { .. } => "create bookmark",
            Self::MoveBookmark { .. } => "move bookmark",
            Self::DeleteBookmark { .. } => "delete bookmark",
            Self::Push { .. } => "push",
        }
    }

    pub fn touches_remote(&self) -> bool {
        matches!(self, Self::Push { .. })
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewChange { parent } => write!(f, "new change on {}", short(parent)),
            Self::Checkout { id } => write!(f, "edit {}", short(id)),
            Self::Squash { id } => write!(f, "squash {}", short(id)),
            Self::Abandon { id } => write!(f, "abandon {}", short(id)),
            Self::Rebase {
                source,
                destination,
            } => write!(f, "rebase {} onto {}", short(source), short(destination)),
            Self::Describe { id, .. } => write!(f, "describe {}", short(id)),
            Self::CreateBookmark { name, id } => {
                write!(f, "create bookmark {name} at {}", short(id))
            }
            Self::MoveBookmark { name, id } => write!(f, "move bookmark {name} to {}", short(id)),
            Self::DeleteBookmark { name } => write!(f, "delete bookmark {name}"),
            Self::Push { bookmark } => write!(f, "push {bookmark}"),
        }
    }
}

fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Access to the version-control tool.
///
/// Every mutation is expected to be followed by a fresh
/// `load_repository`; implementations do not push change notifications.
pub trait VcsService: Send + Sync {
    fn load_repository(&self) -> Result<Repository, VcsError>;

    /// Returns the tool's output, which callers may surface for pushes.
    fn mutate(&self, mutation: &Mutation) -> Result<String, VcsError>;

    fn fetch_description(&self, id: &str) -> Result<String, VcsError>;

    fn changed_files(&self, id: &str) -> Result<Vec<ChangedFile>, VcsError>;

    fn init_repository(&self) -> Result<(), VcsError>;
}
