use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use std::time::Duration;

use crate::server::app::AppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: ComponentHealth,
    pub search_index: ComponentHealth,
    pub connection_pool: ConnectionPoolHealth,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn ok() -> Self {
        Self {
            status: "ok",
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error",
            error: Some(message),
        }
    }

    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPoolHealth {
    pub size: u32,
    pub idle_connections: usize,
    pub max_connections: u32,
}

/// Health check endpoint
///
/// The database decides between 200 and 503. An unreachable search index only
/// degrades the status: events and notifications keep working and the sync
/// catches up once the index is back.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = match tokio::time::timeout(
        CHECK_TIMEOUT,
        sqlx::query("SELECT 1").execute(&state.db_pool),
    )
    .await
    {
        Ok(Ok(_)) => ComponentHealth::ok(),
        Ok(Err(e)) => ComponentHealth::error(format!("Query failed: {}", e)),
        Err(_) => ComponentHealth::error("Query timeout (>5s)".to_string()),
    };

    let search_index =
        match tokio::time::timeout(CHECK_TIMEOUT, state.server_deps.search_index.ping()).await {
            Ok(Ok(())) => ComponentHealth::ok(),
            Ok(Err(e)) => ComponentHealth::error(e.to_string()),
            Err(_) => ComponentHealth::error("Ping timeout (>5s)".to_string()),
        };

    let (status_code, status) = match (database.is_ok(), search_index.is_ok()) {
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
        (true, false) => (StatusCode::OK, "degraded"),
        (true, true) => (StatusCode::OK, "healthy"),
    };

    let connection_pool = ConnectionPoolHealth {
        size: state.db_pool.size(),
        idle_connections: state.db_pool.num_idle(),
        max_connections: state.db_pool.options().get_max_connections(),
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            database,
            search_index,
            connection_pool,
        }),
    )
}
