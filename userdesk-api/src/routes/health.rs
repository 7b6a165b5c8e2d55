/// `GET /health`
///
/// Liveness plus a storage round-trip. The endpoint answers 200 even when the
/// user store is unreachable so load balancers can tell "process up" apart
/// from "storage down":
///
/// ```json
/// { "status": "degraded", "version": "0.1.0", "database": "disconnected" }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub database: StorageStatus,
}

impl HealthResponse {
    fn from_storage(database: StorageStatus) -> Self {
        let status = match database {
            StorageStatus::Connected => ServiceStatus::Healthy,
            StorageStatus::Disconnected => ServiceStatus::Degraded,
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database = match state.users.ping().await {
        Ok(()) => StorageStatus::Connected,
        Err(e) => {
            tracing::warn!(error = %e, "User store unreachable");
            StorageStatus::Disconnected
        }
    };

    Ok(Json(HealthResponse::from_storage(database)))
}
