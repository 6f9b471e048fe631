use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("Internal error")]
    Internal,
}

impl From<crate::domain::error::DomainError> for StatsError {
    fn from(e: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match e {
            Database { .. } => Self::Internal,
        }
    }
}
