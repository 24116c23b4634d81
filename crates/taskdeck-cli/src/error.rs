use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] taskdeck_core::Error),
    #[error("{0}")]
    Auth(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Task text cannot be empty")]
    EmptyTaskText,
    #[error("Task ID cannot be empty")]
    EmptyTaskId,
    #[error("Not signed in. Run `taskdeck login` first.")]
    NotSignedIn,
    #[error("Session is no longer valid. Run `taskdeck login` to sign in again.")]
    SessionRevoked,
}
