//! Error types for Nexx notifications

use thiserror::Error;

use crate::types::{Command, EntityKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Caller Errors
    #[error("Streamtype cannot be \"{kind}\" in {command} operation")]
    InvalidOperation { kind: EntityKind, command: Command },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Dispatch Errors
    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Omnia request failed: {}", .info.as_deref().unwrap_or("no info"))]
    Remote {
        state: Option<String>,
        info: Option<String>,
    },
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidOperation { .. } => "InvalidOperation",
            Error::InvalidArgument(_) => "InvalidArgument",
            Error::Configuration(_) => "ConfigurationError",
            Error::Transport(_) => "TransportError",
            Error::Remote { .. } => "RemoteError",
        }
    }
}
