use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

mod backend;
mod gate;

pub use backend::{LibraryPermissionBackend, DECLINES_BEFORE_BLOCK};
pub use gate::{PermissionGate, RequestOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Checking,
    Granted,
    Limited,
    Denied,
    Blocked,
    Unavailable,
    Error,
}

impl PermissionState {
    /// Whether photos may be enumerated.
    pub const fn allows_reading(self) -> bool {
        matches!(self, Self::Granted | Self::Limited)
    }

    /// Whether the top-level view should ask for access.
    pub const fn needs_prompt_view(self) -> bool {
        !matches!(self, Self::Granted | Self::Limited | Self::Checking)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Granted => "granted",
            Self::Limited => "limited",
            Self::Denied => "denied",
            Self::Blocked => "blocked",
            Self::Unavailable => "unavailable",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("failed to inspect photo library: {path}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Consent(#[from] StorageError),
}

pub type PermissionResult<T> = std::result::Result<T, PermissionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentAnswer {
    Allow,
    Deny,
}

/// Asks the user whether the library may be read.
pub trait ConsentPrompt {
    fn ask(&self) -> ConsentAnswer;
}

/// An answer already collected by the UI.
impl ConsentPrompt for ConsentAnswer {
    fn ask(&self) -> ConsentAnswer {
        *self
    }
}

pub trait PermissionBackend {
    /// Reads the current state without changing anything.
    fn check(&self) -> PermissionResult<PermissionState>;
    /// May prompt the user and persist the answer.
    fn request(&self, prompt: &dyn ConsentPrompt) -> PermissionResult<PermissionState>;
}
