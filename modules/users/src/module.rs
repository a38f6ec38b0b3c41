use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use utoipa::OpenApi;

use crate::api::rest::{openapi::UsersApiDoc, routes};
use crate::domain::repo::UsersRepository;
use crate::domain::service::Service;
use crate::infra::storage::memory_repo::InMemoryUsersRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmUsersRepository;

/// Wires repository → service → REST routes for the users module.
pub struct UsersModule {
    service: Arc<Service>,
    // Kept so the pool can be closed after the server drains.
    db: Option<DatabaseConnection>,
}

impl UsersModule {
    /// Store-backed module. Runs the schema migrations before wiring the repository.
    pub async fn with_database(db: DatabaseConnection) -> anyhow::Result<Self> {
        info!("Running users database migrations");
        Migrator::up(&db, None)
            .await
            .context("users migrations failed")?;
        info!("Users database migrations completed successfully");

        let repo = SeaOrmUsersRepository::new(db.clone());
        Ok(Self {
            service: Arc::new(Service::new(Arc::new(repo))),
            db: Some(db),
        })
    }

    /// Module backed by the in-process store; nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::from_repository(Arc::new(InMemoryUsersRepository::new()))
    }

    pub fn from_repository(repo: Arc<dyn UsersRepository>) -> Self {
        Self {
            service: Arc::new(Service::new(repo)),
            db: None,
        }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering users REST routes");
        routes::register_routes(router, self.service())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        UsersApiDoc::openapi()
    }

    /// Close the database pool, if any.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        if let Some(db) = self.db {
            db.close().await.context("failed to close database pool")?;
            info!("Database pool closed");
        }
        Ok(())
    }
}
