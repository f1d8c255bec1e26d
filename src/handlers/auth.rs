//! Auth handlers: login, logout, current user.

use crate::auth::{current_user, verify_password, BearerToken};
use crate::error::AppError;
use crate::i18n;
use crate::models::{token, user};
use crate::state::AppContext;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

fn invalid_credentials(ctx: &AppContext) -> AppError {
    // Message goes through the translation cache so clients get localized text.
    let message = {
        let map = ctx.translations_read();
        i18n::translate(&map, "en", "invalid_credentials").to_string()
    };
    AppError::Unauthorized(message)
}

pub async fn login(
    State(ctx): State<AppContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    crate::validation::validate_email("email", &body.email)?;
    let account = user::find_by_email(&ctx.pool, &body.email)
        .await?
        .ok_or_else(|| invalid_credentials(&ctx))?;
    if !verify_password(&body.password, &account.hashed_password) {
        return Err(invalid_credentials(&ctx));
    }
    if !account.is_active {
        return Err(AppError::Forbidden("inactive user".into()));
    }
    let issued = token::issue(&ctx.pool, account.id).await?;
    let refresh = token::issue_refresh(&ctx.pool, account.id).await?;
    Ok(Json(TokenResponse {
        access_token: issued.token,
        refresh_token: refresh.token,
        token_type: "bearer",
        expires_at: issued.expires_at,
    }))
}

/// Redeem a refresh token for a new access/refresh pair. The presented token is
/// consumed; redeeming it twice fails.
pub async fn refresh(
    State(ctx): State<AppContext>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let Some((access, refresh)) = token::rotate(&ctx.pool, &body.refresh_token).await? else {
        return Err(AppError::Unauthorized("invalid or expired refresh token".into()));
    };
    Ok(Json(TokenResponse {
        access_token: access.token,
        refresh_token: refresh.token,
        token_type: "bearer",
        expires_at: access.expires_at,
    }))
}

pub async fn logout(
    State(ctx): State<AppContext>,
    bearer: BearerToken,
) -> Result<axum::http::StatusCode, AppError> {
    let token = bearer
        .0
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;
    // Drop the user's refresh tokens too, so logout ends the whole session.
    if let Some(account) = token::find_user_by_token(&ctx.pool, &token).await? {
        token::revoke_refresh_for_user(&ctx.pool, account.id).await?;
    }
    token::revoke(&ctx.pool, &token).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub async fn me(
    State(ctx): State<AppContext>,
    bearer: BearerToken,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let account = current_user(&ctx, &bearer).await?;
    Ok(crate::response::success_one_ok(account))
}
