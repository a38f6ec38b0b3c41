use thiserror::Error;

use crate::domain::repo::RepoError;
use crate::domain::validation::ValidationError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User not found: {id}")]
    UserNotFound { id: i32 },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: i32) -> Self {
        Self::UserNotFound { id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::EmailConflict { email } => Self::email_already_exists(email),
            // `{:#}` keeps the whole anyhow context chain for the server log
            RepoError::Store(source) => Self::database(format!("{source:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_conflict_becomes_email_already_exists() {
        let e: DomainError = RepoError::EmailConflict {
            email: "dup@example.com".to_string(),
        }
        .into();
        assert!(matches!(
            e,
            DomainError::EmailAlreadyExists { ref email } if email == "dup@example.com"
        ));
    }

    #[test]
    fn store_error_keeps_context_chain() {
        let source = anyhow::anyhow!("connection refused").context("find_all failed");
        let e: DomainError = RepoError::Store(source).into();
        match e {
            DomainError::Database { message } => {
                assert_eq!(message, "find_all failed: connection refused");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
