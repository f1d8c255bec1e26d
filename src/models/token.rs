//! Opaque bearer tokens: short-lived access tokens plus single-use refresh
//! tokens. Refresh rotates: redeeming a refresh token consumes it and issues a
//! fresh access/refresh pair.

use crate::auth::{REFRESH_TOKEN_TTL_DAYS, TOKEN_TTL_HOURS};
use crate::error::AppError;
use crate::models::user::User;
use crate::registry::schema::{ColumnDef, TableDef};
use crate::registry::ModulePayload;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn table() -> TableDef {
    TableDef::new("auth_token")
        .column(ColumnDef::new("id", "UUID").default_expr("gen_random_uuid()"))
        .column(ColumnDef::new("user_id", "UUID"))
        .column(ColumnDef::new("token", "TEXT"))
        .column(ColumnDef::new("expires_at", "TIMESTAMPTZ"))
        .primary_key(["id"])
        .unique(["token"])
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn refresh_table() -> TableDef {
    TableDef::new("refresh_token")
        .column(ColumnDef::new("id", "UUID").default_expr("gen_random_uuid()"))
        .column(ColumnDef::new("user_id", "UUID"))
        .column(ColumnDef::new("token", "TEXT"))
        .column(ColumnDef::new("expires_at", "TIMESTAMPTZ"))
        .primary_key(["id"])
        .unique(["token"])
}

pub fn module() -> Result<ModulePayload, AppError> {
    Ok(ModulePayload::Tables(vec![table(), refresh_table()]))
}

/// Issue a fresh token for the user.
pub async fn issue(pool: &PgPool, user_id: Uuid) -> Result<AuthToken, AppError> {
    let token = sqlx::query_as::<_, AuthToken>(
        "INSERT INTO auth_token (id, user_id, token, expires_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Uuid::new_v4().to_string())
    .bind(Utc::now() + Duration::hours(TOKEN_TTL_HOURS))
    .fetch_one(pool)
    .await?;
    Ok(token)
}

/// Issue a fresh refresh token for the user.
pub async fn issue_refresh(pool: &PgPool, user_id: Uuid) -> Result<RefreshToken, AppError> {
    let token = sqlx::query_as::<_, RefreshToken>(
        "INSERT INTO refresh_token (id, user_id, token, expires_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Uuid::new_v4().to_string())
    .bind(Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS))
    .fetch_one(pool)
    .await?;
    Ok(token)
}

/// Redeem a refresh token: consume it and issue a new access/refresh pair.
/// Returns `None` when the token is unknown, expired, or already redeemed.
pub async fn rotate(
    pool: &PgPool,
    refresh_token: &str,
) -> Result<Option<(AuthToken, RefreshToken)>, AppError> {
    let redeemed = sqlx::query_as::<_, RefreshToken>(
        "DELETE FROM refresh_token WHERE token = $1 AND expires_at > NOW() RETURNING *",
    )
    .bind(refresh_token)
    .fetch_optional(pool)
    .await?;
    let Some(old) = redeemed else {
        return Ok(None);
    };
    let access = issue(pool, old.user_id).await?;
    let refresh = issue_refresh(pool, old.user_id).await?;
    Ok(Some((access, refresh)))
}

/// Revoke every refresh token a user holds (logout-everywhere).
pub async fn revoke_refresh_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM refresh_token WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Resolve an unexpired token to its user.
pub async fn find_user_by_token(pool: &PgPool, token: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT u.* FROM user_account u \
         JOIN auth_token t ON t.user_id = u.id \
         WHERE t.token = $1 AND t.expires_at > NOW()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Revoke a token. Returns false when the token was unknown.
pub async fn revoke(pool: &PgPool, token: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM auth_token WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_shape() {
        let t = table();
        assert_eq!(t.name, "auth_token");
        assert_eq!(t.unique, vec![vec!["token".to_string()]]);
    }

    #[test]
    fn refresh_table_shape() {
        let t = refresh_table();
        assert_eq!(t.name, "refresh_token");
        assert_eq!(t.unique, vec![vec!["token".to_string()]]);
        assert!(t.columns.iter().any(|c| c.name == "expires_at"));
    }

    #[test]
    fn module_contributes_both_token_tables() {
        let Ok(ModulePayload::Tables(tables)) = module() else {
            panic!("token module must contribute tables");
        };
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["auth_token", "refresh_token"]);
    }
}
