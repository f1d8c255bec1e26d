//! Translation CRUD handlers plus the bulk fetch used by clients at startup.

use crate::error::AppError;
use crate::i18n;
use crate::models::language::{self, LanguageCreate, LanguageUpdate};
use crate::state::AppContext;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

const DEFAULT_LIMIT: u32 = 100;

#[derive(Deserialize)]
pub struct ListParams {
    pub language_code: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("invalid uuid".into()))
}

pub async fn list(
    State(ctx): State<AppContext>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(1000);
    let offset = params.offset.unwrap_or(0);
    let rows = language::list(&ctx.pool, params.language_code.as_deref(), limit, offset).await?;
    Ok(crate::response::success_many(rows))
}

/// All translations for the configured language set, keyed by code then key.
pub async fn bulk(
    State(ctx): State<AppContext>,
) -> Result<Json<i18n::TranslationMap>, AppError> {
    let map = i18n::fetch_bulk(&ctx.pool, &ctx.settings.languages).await?;
    Ok(Json(map))
}

pub async fn read(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let row = language::get(&ctx.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(crate::response::success_one_ok(row))
}

pub async fn create(
    State(ctx): State<AppContext>,
    Json(body): Json<LanguageCreate>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let row = language::create(&ctx.pool, &body).await?;
    Ok(crate::response::success_one(row))
}

pub async fn update(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(body): Json<LanguageUpdate>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let row = language::update(&ctx.pool, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(crate::response::success_one_ok(row))
}

pub async fn delete(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, AppError> {
    let id = parse_id(&id)?;
    if !language::delete(&ctx.pool, id).await? {
        return Err(AppError::NotFound(id.to_string()));
    }
    Ok(axum::http::StatusCode::NO_CONTENT)
}
