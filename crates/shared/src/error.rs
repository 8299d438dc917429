use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Status,
    Decode,
    App,
}

/// Failure of a single table fetch. Every variant is settled into the
/// controller as an error result; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("{0}")]
    Network(String),
    #[error("server responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("{0}")]
    App(String),
}

impl TableError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn app(message: impl Into<String>) -> Self {
        Self::App(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TableError::Network(_) => ErrorKind::Network,
            TableError::Status { .. } => ErrorKind::Status,
            TableError::Decode(_) => ErrorKind::Decode,
            TableError::App(_) => ErrorKind::App,
        }
    }

    /// Text stored in a failed table result.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for TableError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
