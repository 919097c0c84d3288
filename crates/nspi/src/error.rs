use nspi_config::ConfigError;
use nspi_core::error::{ErrorOrigin as CoreErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::Io { .. } => ErrorKind::Io,
            ConfigError::Parse(_) => ErrorKind::Parse,
            _ => ErrorKind::Invalid,
        };

        Self::new(kind, ErrorOrigin::Config, err.to_string())
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(ErrorKind::Internal, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// The configuration source could not be read.
    Io,

    /// The configuration is not well-formed TOML for the schema.
    Parse,

    /// The configuration parsed but breaks a cross-field rule.
    Invalid,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Catalog,
    Cursor,
    Restriction,
    Session,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Catalog => "catalog",
            Self::Cursor => "cursor",
            Self::Restriction => "restriction",
            Self::Session => "session",
        };
        write!(f, "{label}")
    }
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Catalog => Self::Catalog,
            CoreErrorOrigin::Cursor => Self::Cursor,
            CoreErrorOrigin::Restriction => Self::Restriction,
            CoreErrorOrigin::Session => Self::Session,
        }
    }
}
