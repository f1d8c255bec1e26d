//! Model registrar: loads the model package roots and unions every contributed
//! table definition into the shared schema registry.

use super::manifest::{load_tree, Manifest};
use super::{ModulePayload, ModuleRecord};
use crate::state::AppContext;
use std::collections::BTreeMap;

/// Load `core.models` then `app.models` recursively and merge all `Tables`
/// payloads into the context's schema registry. The registry ends up a superset
/// union of what each module would register alone; nothing is dropped by the
/// aggregation. A missing app root is a warning, not an error.
pub fn register_all_models(ctx: &AppContext, manifest: &Manifest) -> BTreeMap<String, ModuleRecord> {
    let mut all = BTreeMap::new();
    let roots: [(&str, Option<&super::manifest::PackageDef>); 2] = [
        ("core", Some(&manifest.core_models)),
        ("app", manifest.app_models.as_ref()),
    ];

    for (parent, package) in roots {
        let Some(package) = package else {
            tracing::warn!(root = parent, "model package root missing; skipping");
            continue;
        };
        let loaded = {
            let mut registry = ctx.modules_mut();
            load_tree(&mut registry, package, parent, true)
        };
        {
            let mut schema = ctx.schema_mut();
            for record in loaded.values() {
                if let ModulePayload::Tables(tables) = &record.payload {
                    for table in tables {
                        schema.register(table.clone());
                    }
                }
            }
        }
        tracing::info!(root = parent, modules = loaded.len(), "registered model modules");
        all.extend(loaded);
    }

    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::registry::manifest::PackageDef;
    use crate::registry::schema::TableDef;
    use crate::state::test_context;

    fn widget_tables() -> Result<ModulePayload, AppError> {
        Ok(ModulePayload::Tables(vec![TableDef::new("widget")]))
    }

    fn nested_tables() -> Result<ModulePayload, AppError> {
        Ok(ModulePayload::Tables(vec![
            TableDef::new("order_line"),
            TableDef::new("order_header"),
        ]))
    }

    #[tokio::test]
    async fn registry_is_superset_of_all_submodules() {
        let ctx = test_context();
        let manifest = Manifest::core().with_app_models(
            PackageDef::new("models")
                .module("widget", widget_tables)
                .package(
                    PackageDef::new("billing").package(
                        PackageDef::new("orders").module("order", nested_tables),
                    ),
                ),
        );

        register_all_models(&ctx, &manifest);

        let schema = ctx.schema_read();
        // Core tables.
        assert!(schema.contains("user_account"));
        assert!(schema.contains("auth_token"));
        assert!(schema.contains("refresh_token"));
        assert!(schema.contains("language"));
        // App tables, including the package-of-packages case.
        assert!(schema.contains("widget"));
        assert!(schema.contains("order_line"));
        assert!(schema.contains("order_header"));
    }

    #[tokio::test]
    async fn missing_app_root_is_non_fatal() {
        let ctx = test_context();
        let loaded = register_all_models(&ctx, &Manifest::core());
        assert!(loaded.keys().all(|k| k.starts_with("core.models")));
        assert!(ctx.schema_read().contains("user_account"));
    }

    #[tokio::test]
    async fn second_pass_reloads_without_duplicating() {
        let ctx = test_context();
        let manifest = Manifest::core()
            .with_app_models(PackageDef::new("models").module("widget", widget_tables));
        let first = register_all_models(&ctx, &manifest);
        let count = ctx.schema_read().len();
        let second = register_all_models(&ctx, &manifest);

        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            second.keys().collect::<Vec<_>>()
        );
        assert_eq!(ctx.schema_read().len(), count);
        assert_eq!(second["app.models.widget"].generation, 2);
    }
}
