use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{User, UserInput};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;
use crate::domain::validation::validate_user;

/// Domain service with business rules for user management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "users.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.repo.find_all().await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "users.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i32) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(name = "users.service.create_user", skip(self, input))]
    pub async fn create_user(&self, input: UserInput) -> Result<User, DomainError> {
        let new_user = validate_user(input)?;

        // Fast path only; the unique constraint on insert is authoritative.
        if self.repo.find_by_email(&new_user.email).await?.is_some() {
            return Err(DomainError::email_already_exists(new_user.email));
        }

        let user = self.repo.create(new_user).await?;
        info!(user_id = user.id, "Created user");
        Ok(user)
    }

    #[instrument(name = "users.service.update_user", skip(self, input), fields(user_id = id))]
    pub async fn update_user(&self, id: i32, input: UserInput) -> Result<User, DomainError> {
        let replacement = validate_user(input)?;

        if let Some(holder) = self.repo.find_by_email(&replacement.email).await? {
            if holder.id != id {
                return Err(DomainError::email_already_exists(replacement.email));
            }
        }

        let user = self
            .repo
            .update(id, replacement)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        info!("Updated user");
        Ok(user)
    }

    #[instrument(name = "users.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::user_not_found(id));
        }
        info!("Deleted user");
        Ok(())
    }
}
