use std::sync::Arc;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A connection failure handed to every caller that waited on the attempt.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Opening the connection failed. The driver error is kept as the source.
    #[error("failed to connect to database")]
    Connection {
        #[source]
        source: SharedError,
    },

    /// The read itself failed; displays exactly as the driver error does.
    #[error(transparent)]
    Query(BoxError),
}

impl RepositoryError {
    pub fn is_connection(&self) -> bool {
        matches!(self, RepositoryError::Connection { .. })
    }

    /// The underlying driver error, for downcasting.
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        match self {
            RepositoryError::Connection { source } => source.as_ref(),
            RepositoryError::Query(source) => source.as_ref(),
        }
    }
}
