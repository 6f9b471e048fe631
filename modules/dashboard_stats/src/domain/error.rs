use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    /// Any data-access failure; there are no partial results.
    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Keep the full `anyhow` context chain in the message.
    pub fn from_repo(e: anyhow::Error) -> Self {
        Self::database(format!("{e:#}"))
    }
}
