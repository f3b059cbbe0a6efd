//! Player operations: identifier and record validation in front of the queries in `db`.
//!
//! Every operation is one request/response cycle against the pool. Validation
//! happens before any write, and an identifier is always checked for shape
//! before the store is consulted for existence.

use std::collections::HashMap;

use sqlx::sqlite::SqlitePool;

use crate::db::{self, filter::PlayerQuery};
use crate::error::ApiError;
use crate::models::{Player, PlayerPayload};

pub mod validation;

pub async fn list_players(
    pool: &SqlitePool,
    params: &HashMap<String, String>,
) -> Result<Vec<Player>, ApiError> {
    let query = PlayerQuery::from_params(params)?;
    tracing::debug!(?query, "Listing players");

    Ok(db::find_players(pool, &query).await?)
}

pub async fn count_players(
    pool: &SqlitePool,
    params: &HashMap<String, String>,
) -> Result<i64, ApiError> {
    let query = PlayerQuery::from_params(params)?;

    Ok(db::count_players(pool, &query.predicates).await?)
}

pub async fn get_player(pool: &SqlitePool, raw_id: &str) -> Result<Player, ApiError> {
    let id = validation::parse_id(raw_id)?;

    db::get_player_by_id(pool, id)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn create_player(pool: &SqlitePool, payload: PlayerPayload) -> Result<Player, ApiError> {
    let player = validation::validate(payload).inspect_err(|e| {
        tracing::debug!("Rejected new player: {}", e);
    })?;

    let stored = db::insert_player(pool, &player).await?;
    tracing::info!("Created player {}", stored.id);

    Ok(stored)
}

/// Partial update: absent fields keep their stored values, and the merged
/// record must pass the same checks as a new one before anything is written.
pub async fn update_player(
    pool: &SqlitePool,
    raw_id: &str,
    payload: PlayerPayload,
) -> Result<Player, ApiError> {
    let id = validation::parse_id(raw_id)?;

    let stored = db::get_player_by_id(pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let merged = validation::validate(payload.merged_onto(&stored)).inspect_err(|e| {
        tracing::debug!("Rejected update of player {}: {}", id, e);
    })?;

    let updated = db::update_player(pool, id, &merged)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!("Updated player {}", id);

    Ok(updated)
}

pub async fn delete_player(pool: &SqlitePool, raw_id: &str) -> Result<(), ApiError> {
    let id = validation::parse_id(raw_id)?;

    if !db::player_exists(pool, id).await? {
        return Err(ApiError::NotFound);
    }

    db::delete_player(pool, id).await?;
    tracing::info!("Deleted player {}", id);

    Ok(())
}
