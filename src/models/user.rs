//! User accounts.

use crate::auth;
use crate::error::AppError;
use crate::registry::schema::{ColumnDef, TableDef};
use crate::registry::ModulePayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

pub fn table() -> TableDef {
    TableDef::new("user_account")
        .column(ColumnDef::new("id", "UUID").default_expr("gen_random_uuid()"))
        .column(ColumnDef::new("email", "VARCHAR(255)"))
        .column(ColumnDef::new("full_name", "VARCHAR(255)").nullable())
        .column(ColumnDef::new("hashed_password", "TEXT"))
        .column(ColumnDef::new("is_active", "BOOLEAN").default_expr("TRUE"))
        .column(ColumnDef::new("is_superuser", "BOOLEAN").default_expr("FALSE"))
        .primary_key(["id"])
        .unique(["email"])
}

pub fn module() -> Result<ModulePayload, AppError> {
    Ok(ModulePayload::Tables(vec![table()]))
}

pub async fn create(pool: &PgPool, data: &UserCreate) -> Result<User, AppError> {
    crate::validation::validate_email("email", &data.email)?;
    crate::validation::validate_length("password", &data.password, 8, 128)?;
    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(AppError::Conflict(format!("email '{}' already registered", data.email)));
    }
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO user_account (id, email, full_name, hashed_password, is_active, is_superuser) \
         VALUES ($1, $2, $3, $4, TRUE, $5) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&data.email)
    .bind(&data.full_name)
    .bind(auth::hash_password(&data.password))
    .bind(data.is_superuser)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM user_account WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM user_account WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn list(pool: &PgPool, limit: u32, offset: u32) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM user_account ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn update(pool: &PgPool, id: Uuid, data: &UserUpdate) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE user_account SET \
           full_name = COALESCE($2, full_name), \
           is_active = COALESCE($3, is_active), \
           is_superuser = COALESCE($4, is_superuser), \
           updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&data.full_name)
    .bind(data.is_active)
    .bind(data.is_superuser)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM user_account WHERE id = $1")
        .bind(id)
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
        assert_eq!(t.name, "user_account");
        assert_eq!(t.entity, "UserAccount");
        assert_eq!(t.primary_key, vec!["id"]);
        assert_eq!(t.unique, vec![vec!["email".to_string()]]);
        assert!(t.columns.iter().any(|c| c.name == "hashed_password"));
    }
}
