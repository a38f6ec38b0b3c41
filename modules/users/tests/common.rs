use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use users::domain::repo::UsersRepository;
use users::infra::storage::{
    memory_repo::InMemoryUsersRepository, migrations::Migrator,
    sea_orm_repo::SeaOrmUsersRepository,
};
use users::UsersModule;

/// Both repository implementations must satisfy the same contract.
#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Memory,
    Sqlite,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Memory, Backend::Sqlite];
}

/// Fresh in-memory SQLite database. A single pooled connection keeps every
/// query on the same in-memory database.
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opts)
        .await
        .expect("Failed to connect to test database")
}

#[allow(dead_code)]
pub async fn create_repo(backend: Backend) -> Arc<dyn UsersRepository> {
    match backend {
        Backend::Memory => Arc::new(InMemoryUsersRepository::new()),
        Backend::Sqlite => {
            let db = create_test_db().await;
            Migrator::up(&db, None)
                .await
                .expect("Failed to run migrations");
            Arc::new(SeaOrmUsersRepository::new(db))
        }
    }
}

#[allow(dead_code)]
pub async fn create_test_router(backend: Backend) -> Router {
    let module = match backend {
        Backend::Memory => UsersModule::in_memory(),
        Backend::Sqlite => UsersModule::with_database(create_test_db().await)
            .await
            .expect("Failed to build users module"),
    };
    module.register_rest(Router::new())
}

/// Send one request through the router and decode the JSON body
/// (`Value::Null` when the body is empty).
#[allow(dead_code)]
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
