use axum::{
    extract::State,
    http::{header, StatusCode},
    response::Json,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::sqlite::SqlitePool;
use crate::auth::WriteAccess;
use crate::db;
use crate::error::{ApiError, FieldErrors};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{ListPlayersQuery, Page, Player, PlayerFields, PlayerPayload};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Bare array when no pagination was requested, page envelope otherwise.
#[derive(Serialize)]
#[serde(untagged)]
pub enum PlayerList {
    All(Vec<Player>),
    Page(Page<Player>),
}

// GET /players - List players, optionally filtered and paginated
pub async fn list_players(
    State(pool): State<SqlitePool>,
    ApiQuery(params): ApiQuery<ListPlayersQuery>,
) -> Result<Json<PlayerList>, ApiError> {
    let filter = params.filter();

    if !params.is_paginated() {
        let players = db::list_players(&pool, &filter, None, 0).await?;
        return Ok(Json(PlayerList::All(players)));
    }

    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit == 0 {
        return Err(ApiError::field("limit", "Ensure this value is greater than or equal to 1."));
    }
    let limit = i64::from(limit.min(MAX_PAGE_SIZE));
    let offset = i64::from(params.offset.unwrap_or(0));

    let count = db::count_players(&pool, &filter).await?;
    let results = db::list_players(&pool, &filter, Some(limit), offset).await?;

    let suffix = filter.to_query_suffix();
    let link = |offset: i64| format!("/players?limit={}&offset={}{}", limit, offset, suffix);
    let next = (offset + limit < count).then(|| link(offset + limit));
    let previous = (offset > 0).then(|| link((offset - limit).max(0)));

    Ok(Json(PlayerList::Page(Page {
        count,
        next,
        previous,
        results,
    })))
}

// POST /players - Create a player
pub async fn create_player(
    State(pool): State<SqlitePool>,
    _access: WriteAccess,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Player>), ApiError> {
    let payload = PlayerPayload::parse(body, false)?;
    let fields = PlayerFields::default().merged(payload);
    check_references(&pool, &fields).await?;

    let player = db::insert_player(&pool, &fields).await?;
    tracing::info!("Created player {}", player.id);

    let location = format!("/players/{}", player.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(player)))
}

// GET /players/{id} - Get player by ID
pub async fn retrieve_player(
    State(pool): State<SqlitePool>,
    ApiPath(player_id): ApiPath<i64>,
) -> Result<Json<Player>, ApiError> {
    let player = db::get_player_by_id(&pool, player_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(player))
}

// PUT /players/{id} - Replace a player's fields
pub async fn update_player(
    State(pool): State<SqlitePool>,
    _access: WriteAccess,
    ApiPath(player_id): ApiPath<i64>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Player>, ApiError> {
    apply_update(&pool, player_id, body, false).await
}

// PATCH /players/{id} - Change only the supplied fields
pub async fn partial_update_player(
    State(pool): State<SqlitePool>,
    _access: WriteAccess,
    ApiPath(player_id): ApiPath<i64>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Player>, ApiError> {
    apply_update(&pool, player_id, body, true).await
}

// DELETE /players/{id} - Delete a player
pub async fn destroy_player(
    State(pool): State<SqlitePool>,
    _access: WriteAccess,
    ApiPath(player_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    if !db::delete_player(&pool, player_id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!("Deleted player {}", player_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_update(
    pool: &SqlitePool,
    player_id: i64,
    body: Value,
    partial: bool,
) -> Result<Json<Player>, ApiError> {
    let existing = db::get_player_by_id(pool, player_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let payload = PlayerPayload::parse(body, partial)?;
    let fields = existing.fields().merged(payload);
    check_references(pool, &fields).await?;

    // The response is the row as written, never the pre-update copy.
    let player = db::update_player(pool, player_id, &fields)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Updated player {} (partial: {})", player_id, partial);
    Ok(Json(player))
}

async fn check_references(pool: &SqlitePool, fields: &PlayerFields) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    if !db::bank_exists(pool, fields.bank).await? {
        errors.insert(
            "bank".to_string(),
            vec![format!("Invalid pk \"{}\" - object does not exist.", fields.bank)],
        );
    }
    if !db::shop_exists(pool, fields.shop).await? {
        errors.insert(
            "shop".to_string(),
            vec![format!("Invalid pk \"{}\" - object does not exist.", fields.shop)],
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}
