//! User administration handlers. The superuser guard is injected structurally by
//! the router registrar (the mount prefix contains `admin`), not per handler.

use crate::error::AppError;
use crate::models::user::{self, UserCreate, UserUpdate};
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
    let users = user::list(&ctx.pool, limit, offset).await?;
    Ok(crate::response::success_many(users))
}

pub async fn create(
    State(ctx): State<AppContext>,
    Json(body): Json<UserCreate>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let created = user::create(&ctx.pool, &body).await?;
    Ok(crate::response::success_one(created))
}

pub async fn read(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let found = user::find_by_id(&ctx.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(crate::response::success_one_ok(found))
}

pub async fn update(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(body): Json<UserUpdate>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let updated = user::update(&ctx.pool, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(crate::response::success_one_ok(updated))
}

pub async fn delete(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, AppError> {
    let id = parse_id(&id)?;
    if !user::delete(&ctx.pool, id).await? {
        return Err(AppError::NotFound(id.to_string()));
    }
    Ok(axum::http::StatusCode::NO_CONTENT)
}
