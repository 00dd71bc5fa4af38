use jjdeck_core::vcs::VcsError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Service,
    NoRepository,
}

/// A cloneable error value carried by result messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn service(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Service,
            message: message.into(),
        }
    }

    pub fn is_no_repository(&self) -> bool {
        self.kind == ErrorKind::NoRepository
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        let no_repository = error.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<VcsError>(),
                Some(VcsError::NoRepository { .. })
            )
        });

        Self {
            kind: if no_repository {
                ErrorKind::NoRepository
            } else {
                ErrorKind::Service
            },
            message: format!("{error:#}"),
        }
    }
}
