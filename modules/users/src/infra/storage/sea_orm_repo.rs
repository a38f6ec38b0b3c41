//! SeaORM-backed repository implementation for the domain port.
//!
//! This struct is generic over `C: ConnectionTrait`, so you can construct it
//! with a `DatabaseConnection` **or** a transactional connection.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use crate::contract::model::{NewUser, User};
use crate::domain::repo::{RepoError, RepoResult, UsersRepository};
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Map a failed write. A unique-constraint violation can only come from
/// `users.email`, so it becomes a conflict; everything else is a store error.
fn write_error(err: DbErr, email: String, op: &'static str) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "unique constraint violation on {op}");
            RepoError::EmailConflict { email }
        }
        _ => RepoError::Store(anyhow::Error::new(err).context(op)),
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let rows = UserEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<User>> {
        let found = UserEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let found = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        let email = new_user.email.clone();
        let m = UserAM {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
        };
        m.insert(&self.conn)
            .await
            .map(Into::into)
            .map_err(|e| write_error(e, email, "insert failed"))
    }

    async fn update(&self, id: i32, user: NewUser) -> RepoResult<Option<User>> {
        let email = user.email.clone();
        let m = UserAM {
            id: Set(id),
            name: Set(user.name),
            email: Set(user.email),
        };
        match m.update(&self.conn).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(write_error(e, email, "update failed")),
        }
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let res = UserEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
