use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{NewUser, User};

/// Failures a repository can report. Absence is not an error: lookups
/// return `Option` and `delete` returns `bool`.
#[derive(Error, Debug)]
pub enum RepoError {
    /// The store rejected a write because the email is already taken.
    #[error("email '{email}' is already taken")]
    EmailConflict { email: String },

    /// The store is unreachable or failed unexpectedly.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// All users ordered by id ascending.
    async fn find_all(&self) -> RepoResult<Vec<User>>;
    /// Load a user by id.
    async fn find_by_id(&self, id: i32) -> RepoResult<Option<User>>;
    /// Load a user by exact email.
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Insert a user; the store assigns the id.
    async fn create(&self, new_user: NewUser) -> RepoResult<User>;
    /// Replace name and email of an existing user. `None` if no row matched.
    async fn update(&self, id: i32, user: NewUser) -> RepoResult<Option<User>>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i32) -> RepoResult<bool>;
}
