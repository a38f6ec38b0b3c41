use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub const USERS_PATH: &str = "/api/v1/users";
pub const USER_PATH: &str = "/api/v1/users/{id}";

/// Mount the user routes on `router`. Dispatch only; no logic lives here.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route(
            USERS_PATH,
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            USER_PATH,
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(Extension(service))
}
