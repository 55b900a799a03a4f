use sqlx::sqlite::SqlitePool;
use crate::models::*;

const SCHEMA: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS banks (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name TEXT NOT NULL
       )"#,
    r#"CREATE TABLE IF NOT EXISTS shops (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name TEXT NOT NULL
       )"#,
    r#"CREATE TABLE IF NOT EXISTS players (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 100),
           gender TEXT NOT NULL CHECK (gender IN ('Male', 'Female')),
           own_money INTEGER NOT NULL DEFAULT 0 CHECK (own_money >= 0),
           credit INTEGER NOT NULL DEFAULT 0 CHECK (credit >= 0),
           bank INTEGER NOT NULL REFERENCES banks(id),
           shop INTEGER NOT NULL REFERENCES shops(id)
       )"#,
];

/// Creates the tables if they do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

// Reference checks
pub async fn bank_exists(pool: &SqlitePool, bank_id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar(r#"SELECT id FROM banks WHERE id = ?"#)
        .bind(bank_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn shop_exists(pool: &SqlitePool, shop_id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar(r#"SELECT id FROM shops WHERE id = ?"#)
        .bind(shop_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

// Player queries
pub async fn count_players(pool: &SqlitePool, filter: &PlayerFilter) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM players
           WHERE (? IS NULL OR name = ?)
             AND (? IS NULL OR gender = ?)
             AND (? IS NULL OR bank = ?)
             AND (? IS NULL OR shop = ?)"#
    )
    .bind(filter.name.as_deref())
    .bind(filter.name.as_deref())
    .bind(filter.gender.as_deref())
    .bind(filter.gender.as_deref())
    .bind(filter.bank)
    .bind(filter.bank)
    .bind(filter.shop)
    .bind(filter.shop)
    .fetch_one(pool)
    .await
}

/// Lists matching players by ascending id. `limit` of `None` returns every row from `offset`.
pub async fn list_players(
    pool: &SqlitePool,
    filter: &PlayerFilter,
    limit: Option<i64>,
    offset: i64,
) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"SELECT * FROM players
           WHERE (? IS NULL OR name = ?)
             AND (? IS NULL OR gender = ?)
             AND (? IS NULL OR bank = ?)
             AND (? IS NULL OR shop = ?)
           ORDER BY id
           LIMIT ? OFFSET ?"#
    )
    .bind(filter.name.as_deref())
    .bind(filter.name.as_deref())
    .bind(filter.gender.as_deref())
    .bind(filter.gender.as_deref())
    .bind(filter.bank)
    .bind(filter.bank)
    .bind(filter.shop)
    .bind(filter.shop)
    // SQLite treats a negative LIMIT as unbounded
    .bind(limit.unwrap_or(-1))
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_player_by_id(pool: &SqlitePool, player_id: i64) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"SELECT * FROM players WHERE id = ?"#
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_player(pool: &SqlitePool, fields: &PlayerFields) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"INSERT INTO players (name, gender, own_money, credit, bank, shop)
           VALUES (?, ?, ?, ?, ?, ?)
           RETURNING *"#
    )
    .bind(&fields.name)
    .bind(&fields.gender)
    .bind(fields.own_money)
    .bind(fields.credit)
    .bind(fields.bank)
    .bind(fields.shop)
    .fetch_one(pool)
    .await
}

/// Overwrites a player's columns and returns the stored row, or `None` if it no longer exists.
pub async fn update_player(
    pool: &SqlitePool,
    player_id: i64,
    fields: &PlayerFields,
) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"UPDATE players
           SET name = ?, gender = ?, own_money = ?, credit = ?, bank = ?, shop = ?
           WHERE id = ?
           RETURNING *"#
    )
    .bind(&fields.name)
    .bind(&fields.gender)
    .bind(fields.own_money)
    .bind(fields.credit)
    .bind(fields.bank)
    .bind(fields.shop)
    .bind(player_id)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was deleted.
pub async fn delete_player(pool: &SqlitePool, player_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM players WHERE id = ?"#)
        .bind(player_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
