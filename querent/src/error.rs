//! Error types for Querent

use thiserror::Error;

/// The main error type for Querent operations
#[derive(Error, Debug)]
pub enum Error {
    /// A chain call received arguments it cannot turn into SQL
    #[error("Invalid argument: {message}")]
    Argument { message: String },

    /// The accumulated query does not satisfy the statement being executed
    #[error("Invalid query configuration: {message}")]
    Configuration { message: String },

    /// The database could not be reached or refused the credentials
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Preparing, binding or executing a statement failed
    #[error("Execution error: {0}")]
    Execution(#[from] sqlx::Error),

    /// A fetched row could not be decoded into the requested type
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type for Querent operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap a driver error raised while opening a connection
    pub fn connection(source: sqlx::Error) -> Self {
        Self::Connection(source)
    }

    /// Create an execution error from a plain message
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(sqlx::Error::Protocol(message.into()))
    }
}
