//! In-process repository used by tests and by `--mock` runs.
//!
//! All state lives in one explicitly-owned [`MemoryState`] behind a lock, so
//! id assignment and the email uniqueness check happen atomically with the
//! write. The lock is never held across an `.await`.

use std::collections::BTreeMap;

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::contract::model::{NewUser, User};
use crate::domain::repo::{RepoError, RepoResult, UsersRepository};

#[derive(Debug, Default)]
struct MemoryState {
    // BTreeMap keeps iteration in ascending id order
    rows: BTreeMap<i32, User>,
    last_id: i32,
}

impl MemoryState {
    fn email_holder(&self, email: &str) -> Option<&User> {
        self.rows.values().find(|u| u.email == email)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUsersRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.state.read().rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<User>> {
        Ok(self.state.read().rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.state.read().email_holder(email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        let mut state = self.state.write();
        if state.email_holder(&new_user.email).is_some() {
            return Err(RepoError::EmailConflict {
                email: new_user.email,
            });
        }

        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("user id space exhausted"))?;
        state.last_id = id;

        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
        };
        state.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, user: NewUser) -> RepoResult<Option<User>> {
        let mut state = self.state.write();
        if !state.rows.contains_key(&id) {
            return Ok(None);
        }
        if state
            .email_holder(&user.email)
            .is_some_and(|holder| holder.id != id)
        {
            return Err(RepoError::EmailConflict { email: user.email });
        }

        let updated = User {
            id,
            name: user.name,
            email: user.email,
        };
        state.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        Ok(self.state.write().rows.remove(&id).is_some())
    }
}
