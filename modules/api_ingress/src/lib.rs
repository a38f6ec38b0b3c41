//! HTTP host for the service: top-level routes (health, OpenAPI document),
//! the shared middleware stack and the graceful-shutdown server loop.
//! API modules hand over their own `Router`; this crate never knows about
//! individual endpoints.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::Method;
use axum::{middleware::from_fn, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub const HEALTH_PATH: &str = "/health";
pub const OPENAPI_PATH: &str = "/api/v1/openapi.json";

pub struct ApiIngress {
    config: ApiIngressConfig,
    // `None` disables the per-request timeout
    request_timeout: Option<Duration>,
}

impl ApiIngress {
    /// A zero `request_timeout` disables the timeout layer.
    pub fn new(config: ApiIngressConfig, request_timeout: Duration) -> Self {
        Self {
            config,
            request_timeout: (!request_timeout.is_zero()).then_some(request_timeout),
        }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Build the full HTTP router around the module routes in `api`.
    ///
    /// The OpenAPI document is served only when docs are enabled and a
    /// document is supplied; its title is replaced with the service name.
    pub fn build_router(
        &self,
        api: Router,
        openapi: Option<utoipa::openapi::OpenApi>,
    ) -> Result<Router> {
        let service: Arc<str> = Arc::from(self.config.service_name.as_str());
        let mut router = Router::new()
            .route(
                HEALTH_PATH,
                get(move || web::health_check(service.clone())),
            )
            .merge(api);

        match openapi {
            Some(mut doc) if self.config.enable_docs => {
                doc.info.title = self.config.service_name.clone();
                let doc = Arc::new(
                    serde_json::to_value(&doc).context("failed to render OpenAPI document")?,
                );
                router = router.route(OPENAPI_PATH, get(move || web::openapi_json(doc.clone())));
                tracing::debug!(path = OPENAPI_PATH, "OpenAPI document enabled");
            }
            _ => tracing::debug!("OpenAPI document disabled"),
        }

        router = router.fallback(web::not_found);

        // Layers are listed innermost first; the last one added sees the request first:
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions -> CORS -> Timeout -> BodyLimit
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if let Some(timeout) = self.request_timeout {
            router = router.layer(TimeoutLayer::new(timeout));
        }

        if self.config.cors_enabled {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers(Any),
            );
        }

        let x_request_id = request_id::header();
        router = router
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_id::make_span)
                    .on_response(request_id::record_response),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }
}

/// Serve `router` on `listener` until `shutdown` resolves, then let in-flight
/// requests finish.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .context("listener has no local address")?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
