//! Operations over persisted data
//!
//! Each command loads what it needs from a
//! [`crate::storage::VocabRepository`], runs the pure core on it and saves
//! the result. Errors are flattened into a serializable [`CommandError`] for
//! callers that render them.

use crate::config::ConfigError;
use crate::confidence::ConfidenceError;
use crate::storage::StorageError;
use crate::study::SessionError;

mod anki;
mod confidence;
mod reminders;
mod study;
mod tables;

pub use anki::*;
pub use confidence::*;
pub use reminders::*;
pub use study::*;
pub use tables::*;

#[derive(Debug, serde::Serialize)]
pub struct CommandError {
    pub message: String,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<ConfidenceError> for CommandError {
    fn from(err: ConfidenceError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
