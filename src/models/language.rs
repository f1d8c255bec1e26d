//! Translation rows: one row per (language_code, key).

use crate::error::AppError;
use crate::registry::schema::{ColumnDef, TableDef};
use crate::registry::ModulePayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Language {
    pub id: Uuid,
    pub language_code: String,
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LanguageCreate {
    pub language_code: String,
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LanguageUpdate {
    pub value: Option<String>,
}

pub fn table() -> TableDef {
    TableDef::new("language")
        .column(ColumnDef::new("id", "UUID").default_expr("gen_random_uuid()"))
        .column(ColumnDef::new("language_code", "VARCHAR(5)"))
        .column(ColumnDef::new("key", "VARCHAR(255)"))
        .column(ColumnDef::new("value", "VARCHAR(1000)"))
        .primary_key(["id"])
        .unique(["language_code", "key"])
}

pub fn module() -> Result<ModulePayload, AppError> {
    Ok(ModulePayload::Tables(vec![table()]))
}

fn validate(data: &LanguageCreate) -> Result<(), AppError> {
    crate::validation::validate_length("language_code", &data.language_code, 2, 5)?;
    crate::validation::validate_length("key", &data.key, 1, 255)?;
    crate::validation::validate_length("value", &data.value, 1, 1000)?;
    Ok(())
}

pub async fn list(
    pool: &PgPool,
    language_code: Option<&str>,
    limit: u32,
    offset: u32,
) -> Result<Vec<Language>, AppError> {
    let rows = match language_code {
        Some(code) => {
            sqlx::query_as::<_, Language>(
                "SELECT * FROM language WHERE language_code = $1 ORDER BY key LIMIT $2 OFFSET $3",
            )
            .bind(code)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Language>(
                "SELECT * FROM language ORDER BY language_code, key LIMIT $1 OFFSET $2",
            )
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Language>, AppError> {
    let row = sqlx::query_as::<_, Language>("SELECT * FROM language WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn get_by_code_and_key(
    pool: &PgPool,
    language_code: &str,
    key: &str,
) -> Result<Option<Language>, AppError> {
    let row = sqlx::query_as::<_, Language>(
        "SELECT * FROM language WHERE language_code = $1 AND key = $2",
    )
    .bind(language_code)
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, data: &LanguageCreate) -> Result<Language, AppError> {
    validate(data)?;
    if get_by_code_and_key(pool, &data.language_code, &data.key).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "translation '{}/{}' already exists",
            data.language_code, data.key
        )));
    }
    let row = sqlx::query_as::<_, Language>(
        "INSERT INTO language (id, language_code, key, value) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&data.language_code)
    .bind(&data.key)
    .bind(&data.value)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    data: &LanguageUpdate,
) -> Result<Option<Language>, AppError> {
    if let Some(value) = &data.value {
        crate::validation::validate_length("value", value, 1, 1000)?;
    }
    let row = sqlx::query_as::<_, Language>(
        "UPDATE language SET value = COALESCE($2, value), updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&data.value)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM language WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Insert a row only when the (code, key) pair is absent. Used by seeding.
pub async fn upsert_missing(pool: &PgPool, data: &LanguageCreate) -> Result<bool, AppError> {
    validate(data)?;
    let result = sqlx::query(
        "INSERT INTO language (id, language_code, key, value) VALUES ($1, $2, $3, $4) \
         ON CONFLICT (language_code, key) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(&data.language_code)
    .bind(&data.key)
    .bind(&data.value)
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
        assert_eq!(t.name, "language");
        assert_eq!(t.entity, "Language");
        assert_eq!(t.unique, vec![vec!["language_code".to_string(), "key".to_string()]]);
    }

    #[test]
    fn create_validation() {
        assert!(validate(&LanguageCreate {
            language_code: "en".into(),
            key: "welcome_message".into(),
            value: "Welcome".into(),
        })
        .is_ok());
        assert!(validate(&LanguageCreate {
            language_code: "english".into(),
            key: "k".into(),
            value: "v".into(),
        })
        .is_err());
    }
}
