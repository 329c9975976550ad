use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::server::app::AppState;

const DATABASE_PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: DatabaseHealth,
    connection_pool: ConnectionPoolHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct ConnectionPoolHealth {
    size: u32,
    idle_connections: usize,
    max_connections: u32,
}

/// Health check endpoint
///
/// 200 when the database answers within five seconds, 503 otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = ping_database(&state.db_pool).await;
    let healthy = database.error.is_none();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        database,
        connection_pool: ConnectionPoolHealth {
            size: state.db_pool.size(),
            idle_connections: state.db_pool.num_idle(),
            max_connections: state.db_pool.options().get_max_connections(),
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response))
}

async fn ping_database(pool: &PgPool) -> DatabaseHealth {
    let error = match tokio::time::timeout(
        DATABASE_PING_TIMEOUT,
        sqlx::query("SELECT 1").execute(pool),
    )
    .await
    {
        Ok(Ok(_)) => None,
        Ok(Err(e)) => Some(format!("Query failed: {}", e)),
        Err(_) => Some("Query timeout (>5s)".to_string()),
    };

    DatabaseHealth {
        status: if error.is_none() { "ok" } else { "error" },
        error,
    }
}
