use serde::{Deserialize, Serialize};

/// `modules.api_ingress` section of the application config.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Reported by `/health` and used as the OpenAPI title.
    pub service_name: String,
    pub enable_docs: bool,
    pub cors_enabled: bool,
    /// Requests with a larger body are answered with 413.
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            service_name: "user-service".to_string(),
            enable_docs: true,
            cors_enabled: true,
            body_limit_bytes: 1024 * 1024,
        }
    }
}
