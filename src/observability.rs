use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::routes::AppState;
use crate::types::HealthStatus;

/// Application metrics
#[derive(Debug, Clone)]
pub struct AppMetrics {
    pub start_time: Instant,
    pub total_requests: Arc<RwLock<u64>>,
    pub successful_requests: Arc<RwLock<u64>>,
    pub failed_requests: Arc<RwLock<u64>>,
    pub records_created: Arc<RwLock<u64>>,
    pub records_updated: Arc<RwLock<u64>>,
    pub records_deleted: Arc<RwLock<u64>>,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_requests: Arc::new(RwLock::new(0)),
            successful_requests: Arc::new(RwLock::new(0)),
            failed_requests: Arc::new(RwLock::new(0)),
            records_created: Arc::new(RwLock::new(0)),
            records_updated: Arc::new(RwLock::new(0)),
            records_deleted: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn increment_requests(&self) {
        *self.total_requests.write().await += 1;
    }

    pub async fn increment_success(&self) {
        *self.successful_requests.write().await += 1;
    }

    pub async fn increment_failure(&self) {
        *self.failed_requests.write().await += 1;
    }

    /// Counts a finished request as a success or a failure.
    pub async fn record_outcome<T, E>(&self, result: &Result<T, E>) {
        if result.is_ok() {
            self.increment_success().await;
        } else {
            self.increment_failure().await;
        }
    }

    pub async fn increment_created(&self) {
        *self.records_created.write().await += 1;
    }

    pub async fn increment_updated(&self) {
        *self.records_updated.write().await += 1;
    }

    pub async fn increment_deleted(&self) {
        *self.records_deleted.write().await += 1;
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Liveness check: runs a trivial query against the datastore
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Datastore reachable", body = HealthStatus),
        (status = 500, description = "Datastore unreachable", body = HealthStatus)
    ),
    tag = "Health"
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => {
            info!("Health check passed");
            (
                StatusCode::OK,
                Json(HealthStatus::Ok {
                    timestamp: Utc::now(),
                }),
            )
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthStatus::Error {
                    message: e.to_string(),
                }),
            )
        }
    }
}

/// Metrics endpoint handler
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub records_created: u64,
    pub records_updated: u64,
    pub records_deleted: u64,
    pub success_rate: f64,
}

pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let metrics = &state.metrics;
    let total = *metrics.total_requests.read().await;
    let success = *metrics.successful_requests.read().await;

    let success_rate = if total > 0 {
        (success as f64 / total as f64) * 100.0
    } else {
        100.0
    };

    let response = MetricsResponse {
        uptime_seconds: metrics.uptime_seconds(),
        total_requests: total,
        successful_requests: success,
        failed_requests: *metrics.failed_requests.read().await,
        records_created: *metrics.records_created.read().await,
        records_updated: *metrics.records_updated.read().await,
        records_deleted: *metrics.records_deleted.read().await,
        success_rate,
    };

    (StatusCode::OK, Json(response))
}

/// Initialize tracing subscriber for structured logging
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chaves_api=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json().with_target(false))
        .init();

    info!("Tracing initialized");
}
