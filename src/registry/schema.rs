//! Schema registry: the aggregate set of table definitions used for migration.
//! Membership is monotone for the process lifetime; re-registration replaces a
//! same-named definition but never drops one.

use crate::naming::to_pascal_case;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct ColumnDef {
    pub name: String,
    /// PostgreSQL type (e.g. `UUID`, `TEXT`, `VARCHAR(255)`).
    pub pg_type: String,
    pub nullable: bool,
    /// Raw default expression (e.g. `gen_random_uuid()`, `NOW()`, `TRUE`).
    pub default: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, pg_type: impl Into<String>) -> Self {
        ColumnDef {
            name: name.into(),
            pg_type: pg_type.into(),
            nullable: false,
            default: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct TableDef {
    /// snake_case table name.
    pub name: String,
    /// PascalCase entity type name, derived from the table name.
    pub entity: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Vec<String>,
    pub unique: Vec<Vec<String>>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let entity = to_pascal_case(&name);
        TableDef {
            name,
            entity,
            columns: Vec::new(),
            primary_key: Vec::new(),
            unique: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<const N: usize>(mut self, columns: [&str; N]) -> Self {
        self.primary_key = columns.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn unique<const N: usize>(mut self, columns: [&str; N]) -> Self {
        self.unique.push(columns.iter().map(|s| s.to_string()).collect());
        self
    }
}

#[derive(Clone, Default)]
pub struct SchemaRegistry {
    tables: BTreeMap<String, TableDef>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or refresh) one table definition.
    pub fn register(&mut self, table: TableDef) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables in name order (migration order).
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_name_is_pascal_cased() {
        assert_eq!(TableDef::new("user_account").entity, "UserAccount");
        assert_eq!(TableDef::new("language").entity, "Language");
    }

    #[test]
    fn registration_is_monotone() {
        let mut reg = SchemaRegistry::new();
        reg.register(TableDef::new("widget"));
        reg.register(TableDef::new("gadget"));
        reg.register(TableDef::new("widget").column(ColumnDef::new("id", "UUID")));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("widget").map(|t| t.columns.len()), Some(1));
    }
}
