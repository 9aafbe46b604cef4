use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    // up, but the aggregator isn't answering so resolves will fail
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct UpstreamHealth {
    pub status: HealthStatus,
    pub api_url: String,
    pub response_time_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub version: String,
    pub environment: String,
    pub upstream: UpstreamHealth,
}
