//! Process-lifetime module registry. One live record per logical name; re-registration
//! replaces the payload in place and bumps the generation counter.

pub mod manifest;
pub mod models;
pub mod schema;

use crate::router::RouteModule;
use chrono::{DateTime, Utc};
use schema::TableDef;
use std::collections::BTreeMap;

/// What a loaded module contributes.
#[derive(Clone)]
pub enum ModulePayload {
    /// Model module: table definitions for the schema registry.
    Tables(Vec<TableDef>),
    /// Route module: a router plus its declared prefix and guards.
    Routes(RouteModule),
    /// Package marker (a loadable unit with children but no payload of its own).
    Package,
}

impl ModulePayload {
    pub fn kind(&self) -> &'static str {
        match self {
            ModulePayload::Tables(_) => "tables",
            ModulePayload::Routes(_) => "routes",
            ModulePayload::Package => "package",
        }
    }
}

#[derive(Clone)]
pub struct ModuleRecord {
    /// Fully-qualified logical name, dot-joined (e.g. `app.routes.v1.widget_route`).
    pub name: String,
    pub payload: ModulePayload,
    pub is_package: bool,
    /// Starts at 1; incremented on every reload of the same name.
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct ModuleRegistry {
    records: BTreeMap<String, ModuleRecord>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or reload a record. Reload keeps the key and bumps the generation, so
    /// repeated registration passes never duplicate entries.
    pub fn upsert(&mut self, name: &str, payload: ModulePayload, is_package: bool) -> ModuleRecord {
        let now = Utc::now();
        let record = self
            .records
            .entry(name.to_string())
            .and_modify(|r| {
                r.payload = payload.clone();
                r.is_package = is_package;
                r.generation += 1;
                r.loaded_at = now;
            })
            .or_insert_with(|| ModuleRecord {
                name: name.to_string(),
                payload: payload.clone(),
                is_package,
                generation: 1,
                loaded_at: now,
            });
        if record.generation == 1 {
            tracing::info!(module = %name, kind = payload.kind(), "loaded new module");
        } else {
            tracing::info!(module = %name, generation = record.generation, "reloaded module");
        }
        record.clone()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_reloads_in_place() {
        let mut reg = ModuleRegistry::new();
        let first = reg.upsert("core.models.user", ModulePayload::Tables(vec![]), false);
        assert_eq!(first.generation, 1);
        assert_eq!(reg.len(), 1);

        let second = reg.upsert("core.models.user", ModulePayload::Tables(vec![]), false);
        assert_eq!(second.generation, 2);
        assert_eq!(reg.len(), 1, "reload must not duplicate the record");
        assert!(second.loaded_at >= first.loaded_at);
    }

    #[test]
    fn records_are_keyed_by_logical_name() {
        let mut reg = ModuleRegistry::new();
        reg.upsert("core.models.user", ModulePayload::Tables(vec![]), false);
        reg.upsert("app.models.user", ModulePayload::Tables(vec![]), false);
        assert_eq!(reg.len(), 2);
        assert!(reg.get("core.models.user").is_some());
        assert!(reg.get("app.models.user").is_some());
        assert!(reg.get("models.user").is_none());
    }
}
