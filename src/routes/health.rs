use axum::{extract::State, response::Json, http::StatusCode};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: &'static str,
    timestamp: i64,
}

// GET /health - Liveness plus a round-trip to the player store
pub async fn health_check(
    State(pool): State<SqlitePool>,
) -> (StatusCode, Json<HealthResponse>) {
    let reachable = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&pool)
        .await
        .inspect_err(|e| tracing::warn!("Health check could not reach database: {}", e))
        .is_ok();

    let timestamp = chrono::Utc::now().timestamp();
    let (status, response) = if reachable {
        (StatusCode::OK, HealthResponse { status: "ok", database: "up", timestamp })
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse { status: "degraded", database: "down", timestamp },
        )
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn reports_ok_with_live_database() {
        let pool = db::test_pool().await;
        let (status, Json(body)) = health_check(State(pool)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.database, "up");
        assert!(body.timestamp > 0);
    }

    #[tokio::test]
    async fn reports_unavailable_once_pool_is_closed() {
        let pool = db::test_pool().await;
        pool.close().await;
        let (status, Json(body)) = health_check(State(pool)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
    }
}
