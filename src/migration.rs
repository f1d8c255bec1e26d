//! Create-only migrations from the schema registry. Every registered table is
//! rendered as `CREATE TABLE IF NOT EXISTS`, so migrating an already-migrated
//! database is a no-op.

use crate::error::AppError;
use crate::registry::schema::{SchemaRegistry, TableDef};
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Render the DDL for one table. `created_at`/`updated_at` are appended when the
/// definition does not declare them; every table gets the pair.
pub fn create_table_sql(table: &TableDef) -> String {
    let mut col_defs: Vec<String> = Vec::new();
    for c in &table.columns {
        let mut def = format!("{} {}", quote(&c.name), c.pg_type);
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(ref expr) = c.default {
            def.push_str(" DEFAULT ");
            def.push_str(expr);
        }
        col_defs.push(def);
    }

    for name in ["created_at", "updated_at"] {
        if !table.columns.iter().any(|c| c.name == name) {
            col_defs.push(format!("{} TIMESTAMPTZ NOT NULL DEFAULT NOW()", quote(name)));
        }
    }

    if !table.primary_key.is_empty() {
        let pk: Vec<String> = table.primary_key.iter().map(|s| quote(s)).collect();
        col_defs.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    }
    for u in &table.unique {
        let cols: Vec<String> = u.iter().map(|s| quote(s)).collect();
        col_defs.push(format!("UNIQUE ({})", cols.join(", ")));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(&table.name),
        col_defs.join(",\n  ")
    )
}

/// Create every registered table, in name order.
pub async fn apply_migrations(pool: &PgPool, schema: &SchemaRegistry) -> Result<(), AppError> {
    for table in schema.tables() {
        let sql = create_table_sql(table);
        tracing::debug!(table = %table.name, "applying migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!(tables = schema.len(), "migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::schema::ColumnDef;

    #[test]
    fn renders_columns_constraints_and_timestamps() {
        let table = TableDef::new("user_account")
            .column(ColumnDef::new("id", "UUID").default_expr("gen_random_uuid()"))
            .column(ColumnDef::new("email", "VARCHAR(255)"))
            .column(ColumnDef::new("full_name", "VARCHAR(255)").nullable())
            .primary_key(["id"])
            .unique(["email"]);

        let sql = create_table_sql(&table);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"user_account\""));
        assert!(sql.contains("\"id\" UUID NOT NULL DEFAULT gen_random_uuid()"));
        assert!(sql.contains("\"email\" VARCHAR(255) NOT NULL"));
        assert!(sql.contains("\"full_name\" VARCHAR(255),"));
        assert!(sql.contains("\"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()"));
        assert!(sql.contains("\"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()"));
        assert!(sql.contains("PRIMARY KEY (\"id\")"));
        assert!(sql.contains("UNIQUE (\"email\")"));
    }

    #[test]
    fn declared_timestamps_are_not_duplicated() {
        let table = TableDef::new("event")
            .column(ColumnDef::new("id", "UUID"))
            .column(ColumnDef::new("created_at", "TIMESTAMPTZ").default_expr("NOW()"))
            .primary_key(["id"]);

        let sql = create_table_sql(&table);
        assert_eq!(sql.matches("\"created_at\"").count(), 1);
        assert_eq!(sql.matches("\"updated_at\"").count(), 1);
    }

    #[test]
    fn composite_unique_renders_both_columns() {
        let table = TableDef::new("language")
            .column(ColumnDef::new("id", "UUID"))
            .primary_key(["id"])
            .unique(["language_code", "key"]);
        let sql = create_table_sql(&table);
        assert!(sql.contains("UNIQUE (\"language_code\", \"key\")"));
    }
}
