use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use sqlx::sqlite::SqlitePool;
use crate::error::ApiError;
use crate::models::{Player, PlayerPayload};
use crate::service;

// GET /rest/players - Filtered, ordered page of players
pub async fn get_players(
    State(pool): State<SqlitePool>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let players = service::list_players(&pool, &params).await?;

    Ok(Json(players))
}

// GET /rest/players/count - Number of players matching the same filters
pub async fn get_players_count(
    State(pool): State<SqlitePool>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<i64>, ApiError> {
    let count = service::count_players(&pool, &params).await?;

    Ok(Json(count))
}

// POST /rest/players - Create a player
pub async fn create_player(
    State(pool): State<SqlitePool>,
    payload: Result<Json<PlayerPayload>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let Json(payload) = payload?;
    let player = service::create_player(&pool, payload).await?;

    Ok(Json(player))
}

// GET /rest/players/:id - Get player by ID
pub async fn get_player_by_id(
    State(pool): State<SqlitePool>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let player = service::get_player(&pool, &player_id).await?;

    Ok(Json(player))
}

// POST /rest/players/:id - Partially update a player
pub async fn update_player(
    State(pool): State<SqlitePool>,
    Path(player_id): Path<String>,
    payload: Result<Json<PlayerPayload>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let Json(payload) = payload?;
    let player = service::update_player(&pool, &player_id, payload).await?;

    Ok(Json(player))
}

// DELETE /rest/players/:id - Delete a player
pub async fn delete_player(
    State(pool): State<SqlitePool>,
    Path(player_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete_player(&pool, &player_id).await?;

    Ok(StatusCode::OK)
}
