//! Health checks
//!
//! Liveness answers as long as the process runs. Readiness pings the
//! document store; the report is cached for a few seconds so probes do not
//! hammer the database.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use edc_store::SharedStore;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub check_timeout: Duration,
    pub cache_duration: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            cache_duration: Duration::from_secs(10),
        }
    }
}

struct CachedHealth {
    report: HealthReport,
    cached_at: Instant,
}

pub struct HealthChecker {
    config: HealthConfig,
    store: SharedStore,
    start_time: Instant,
    cache: RwLock<Option<CachedHealth>>,
}

impl HealthChecker {
    pub fn new(config: HealthConfig, store: SharedStore) -> Self {
        Self {
            config,
            store,
            start_time: Instant::now(),
            cache: RwLock::new(None),
        }
    }

    /// Cached report, or a fresh one when the cache expired
    pub async fn check(&self) -> HealthReport {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.cached_at.elapsed() < self.config.cache_duration {
                    debug!("returning cached health report");
                    return cached.report.clone();
                }
            }
        }

        let report = self.perform_checks().await;
        *self.cache.write().await = Some(CachedHealth {
            report: report.clone(),
            cached_at: Instant::now(),
        });
        report
    }

    async fn perform_checks(&self) -> HealthReport {
        let store = self.check_store().await;
        HealthReport {
            status: store.status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components: vec![store],
            timestamp: chrono::Utc::now(),
        }
    }

    async fn check_store(&self) -> ComponentHealth {
        let start = Instant::now();
        let (status, message) =
            match tokio::time::timeout(self.config.check_timeout, self.store.ping()).await {
                Ok(Ok(())) => (HealthStatus::Healthy, None),
                Ok(Err(e)) => {
                    warn!(error = %e, "store health check failed");
                    (HealthStatus::Unhealthy, Some(e.to_string()))
                }
                Err(_) => {
                    warn!("store health check timed out");
                    (HealthStatus::Unhealthy, Some("timed out".to_string()))
                }
            };

        ComponentHealth {
            name: format!("store ({})", self.store.backend()),
            status,
            message,
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// GET /health/live
pub async fn liveness() -> &'static str {
    "OK"
}

/// GET /health and /health/ready
pub async fn readiness(State(checker): State<Arc<HealthChecker>>) -> (StatusCode, Json<HealthReport>) {
    let report = checker.check().await;
    (report.http_status(), Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edc_store::MemoryStore;

    fn checker(cache: Duration) -> HealthChecker {
        HealthChecker::new(
            HealthConfig {
                cache_duration: cache,
                ..Default::default()
            },
            Arc::new(MemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn test_memory_store_is_healthy() {
        let report = checker(Duration::from_secs(10)).check().await;
        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.components[0].name, "store (memory)");
        assert_eq!(report.http_status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_report_is_cached() {
        let checker = checker(Duration::from_secs(60));
        let first = checker.check().await;
        let second = checker.check().await;
        assert_eq!(first.timestamp, second.timestamp);
    }

    #[test]
    fn test_unhealthy_is_unavailable() {
        let report = HealthReport {
            status: HealthStatus::Unhealthy,
            version: "0.1.0".to_string(),
            uptime_seconds: 1,
            components: vec![],
            timestamp: chrono::Utc::now(),
        };
        assert_eq!(report.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
