use axum::{routing::get, Router};
use sqlx::sqlite::SqlitePool;

pub mod health;
pub mod players;

/// All endpoints, sharing one connection pool as state
pub fn router(pool: SqlitePool) -> Router {
    Router::new()
        // Root and health
        .route("/", get(|| async { "Player Registry API - v1.0" }))
        .route("/health", get(health::health_check))

        // Player endpoints
        .route("/rest/players", get(players::get_players).post(players::create_player))
        .route("/rest/players/count", get(players::get_players_count))
        .route(
            "/rest/players/{id}",
            get(players::get_player_by_id)
                .post(players::update_player)
                .delete(players::delete_player),
        )

        .with_state(pool)
}
