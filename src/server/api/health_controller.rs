use std::time::Instant;

use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;
use tracing::warn;

use crate::server::dtos::health_dto::{HealthResponse, HealthStatus, UpstreamHealth};
use crate::server::services::app_services::AppServices;
use crate::server::{get_app_version, get_uptime_seconds};

// smallest query the api will answer, just proves it's reachable with our headers
const PROBE_QUERY: &str = "query { __typename }";

/// health endpoint, the service itself is always up so this only reports degraded when the
/// aggregator can't be reached
pub async fn health_endpoint(
    Extension(services): Extension<AppServices>,
) -> (StatusCode, Json<HealthResponse>) {
    let upstream = check_upstream_health(&services).await;

    let response = HealthResponse {
        status: upstream.status,
        timestamp: Utc::now(),
        uptime_seconds: get_uptime_seconds(),
        version: get_app_version().to_string(),
        environment: format!("{:?}", services.config.cargo_env).to_lowercase(),
        upstream,
    };

    (StatusCode::OK, Json(response))
}

async fn check_upstream_health(services: &AppServices) -> UpstreamHealth {
    let start = Instant::now();
    let status = match services.upstream.graphql("{}", PROBE_QUERY).await {
        Ok(_) => HealthStatus::Healthy,
        Err(e) => {
            warn!("upstream health check failed: {}", e);
            HealthStatus::Degraded
        }
    };

    UpstreamHealth {
        status,
        api_url: services.config.upstream_api_url.clone(),
        response_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}
