use sqlx::sqlite::SqlitePool;
use sqlx::{QueryBuilder, Sqlite};
use crate::models::{NewPlayer, Player};

pub mod filter;

use filter::{push_where, Predicate, PlayerQuery};

/// Embedded schema migrations, run once at startup
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// Player queries
pub async fn get_player_by_id(pool: &SqlitePool, player_id: i64) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"SELECT * FROM player WHERE id = ?"#
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await
}

pub async fn player_exists(pool: &SqlitePool, player_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"SELECT EXISTS(SELECT 1 FROM player WHERE id = ?)"#
    )
    .bind(player_id)
    .fetch_one(pool)
    .await
}

/// Filtered, ordered page of players
pub async fn find_players(pool: &SqlitePool, query: &PlayerQuery) -> Result<Vec<Player>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM player");
    push_where(&mut builder, &query.predicates);

    // id breaks ties so that pages never overlap
    builder
        .push(" ORDER BY ")
        .push(query.order.column())
        .push(" ASC, id ASC LIMIT ")
        .push_bind(query.page.size)
        .push(" OFFSET ")
        .push_bind(query.page.offset());

    builder.build_query_as::<Player>().fetch_all(pool).await
}

/// Number of players matching the predicates, ignoring pagination
pub async fn count_players(pool: &SqlitePool, predicates: &[Predicate]) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM player");
    push_where(&mut builder, predicates);

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn insert_player(pool: &SqlitePool, player: &NewPlayer) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"INSERT INTO player
               (name, title, race, profession, birthday, experience, level, until_next_level, banned)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING *"#
    )
    .bind(&player.name)
    .bind(&player.title)
    .bind(player.race)
    .bind(player.profession)
    .bind(player.birthday)
    .bind(player.experience)
    .bind(player.level)
    .bind(player.until_next_level)
    .bind(player.banned)
    .fetch_one(pool)
    .await
}

/// Overwrite every column of an existing player
pub async fn update_player(pool: &SqlitePool, player_id: i64, player: &NewPlayer) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"UPDATE player
           SET name = ?,
               title = ?,
               race = ?,
               profession = ?,
               birthday = ?,
               experience = ?,
               level = ?,
               until_next_level = ?,
               banned = ?
           WHERE id = ?
           RETURNING *"#
    )
    .bind(&player.name)
    .bind(&player.title)
    .bind(player.race)
    .bind(player.profession)
    .bind(player.birthday)
    .bind(player.experience)
    .bind(player.level)
    .bind(player.until_next_level)
    .bind(player.banned)
    .bind(player_id)
    .fetch_optional(pool)
    .await
}

/// Returns the number of rows removed
pub async fn delete_player(pool: &SqlitePool, player_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"DELETE FROM player WHERE id = ?"#
    )
    .bind(player_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Single-connection in-memory database with the schema applied
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}
