//! Explicit registration manifest: the compile-time replacement for filesystem
//! scanning. Each module names a loader function; packages nest, and logical names
//! are dot-joined down the tree.

use super::{ModulePayload, ModuleRecord, ModuleRegistry};
use crate::error::AppError;
use std::collections::BTreeMap;

/// Loader for one module. Returning `Err` marks the module failed without
/// affecting its siblings.
pub type ModuleLoader = fn() -> Result<ModulePayload, AppError>;

pub struct ModuleDef {
    pub name: &'static str,
    pub loader: ModuleLoader,
}

/// A package node: direct modules plus nested subpackages.
pub struct PackageDef {
    /// Own segment of the logical name (e.g. `routes`, `v1`).
    pub name: String,
    pub modules: Vec<ModuleDef>,
    pub packages: Vec<PackageDef>,
}

impl PackageDef {
    pub fn new(name: impl Into<String>) -> Self {
        PackageDef {
            name: name.into(),
            modules: Vec::new(),
            packages: Vec::new(),
        }
    }

    pub fn module(mut self, name: &'static str, loader: ModuleLoader) -> Self {
        self.modules.push(ModuleDef { name, loader });
        self
    }

    pub fn package(mut self, package: PackageDef) -> Self {
        self.packages.push(package);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.packages.is_empty()
    }
}

/// The full registration surface for one process: framework (`core`) packages plus
/// optional application (`app`) packages supplied by the consumer.
pub struct Manifest {
    pub core_models: PackageDef,
    pub core_routes: PackageDef,
    pub app_models: Option<PackageDef>,
    pub app_routes: Option<PackageDef>,
}

impl Manifest {
    /// Framework manifest: core models (user, auth_token, language) and core routes
    /// (auth, language, admin users). Applications add their own packages on top.
    pub fn core() -> Self {
        Manifest {
            core_models: PackageDef::new("models")
                .module("user", crate::models::user::module)
                .module("auth_token", crate::models::token::module)
                .module("language", crate::models::language::module),
            core_routes: PackageDef::new("routes")
                .package(
                    PackageDef::new("access").module("auth_route", crate::routes::auth_route::module),
                )
                .module("language_route", crate::routes::language_route::module)
                .module("user_admin_route", crate::routes::user_admin_route::module),
            app_models: None,
            app_routes: None,
        }
    }

    pub fn with_app_models(mut self, package: PackageDef) -> Self {
        self.app_models = Some(package);
        self
    }

    pub fn with_app_routes(mut self, package: PackageDef) -> Self {
        self.app_routes = Some(package);
        self
    }
}

/// Load one module under `parent_base`, recording it in the registry. Returns `None`
/// on loader failure (logged, siblings unaffected).
pub(crate) fn load_module(
    registry: &mut ModuleRegistry,
    def: &ModuleDef,
    parent_base: &str,
) -> Option<ModuleRecord> {
    let full_name = format!("{}.{}", parent_base, def.name);
    match (def.loader)() {
        Ok(payload) => Some(registry.upsert(&full_name, payload, false)),
        Err(e) => {
            tracing::error!(module = %full_name, error = ?e, "error loading module");
            None
        }
    }
}

/// Load every module in `package` (logical base = `parent.package_name`), descending
/// into subpackages when `recursive`. One failed module never blocks its siblings.
/// Returned keys are unique fully-qualified names; an empty package yields an empty
/// map and a warning.
pub fn load_tree(
    registry: &mut ModuleRegistry,
    package: &PackageDef,
    parent: &str,
    recursive: bool,
) -> BTreeMap<String, ModuleRecord> {
    let base = if parent.is_empty() {
        package.name.clone()
    } else {
        format!("{}.{}", parent, package.name)
    };

    let mut loaded = BTreeMap::new();
    if package.is_empty() {
        tracing::warn!(package = %base, "no modules found in package");
        return loaded;
    }

    for def in &package.modules {
        if let Some(record) = load_module(registry, def, &base) {
            loaded.insert(record.name.clone(), record);
        }
    }

    if recursive {
        for sub in &package.packages {
            let sub_name = format!("{}.{}", base, sub.name);
            let record = registry.upsert(&sub_name, ModulePayload::Package, true);
            loaded.insert(record.name.clone(), record);
            loaded.extend(load_tree(registry, sub, &base, true));
        }
    }

    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::schema::TableDef;

    fn ok_widget() -> Result<ModulePayload, AppError> {
        Ok(ModulePayload::Tables(vec![TableDef::new("widget")]))
    }

    fn ok_gadget() -> Result<ModulePayload, AppError> {
        Ok(ModulePayload::Tables(vec![TableDef::new("gadget")]))
    }

    fn broken() -> Result<ModulePayload, AppError> {
        Err(AppError::BadRequest("boom".into()))
    }

    fn sample_package() -> PackageDef {
        PackageDef::new("models")
            .module("widget", ok_widget)
            .module("broken", broken)
            .module("gadget", ok_gadget)
    }

    #[test]
    fn partial_failure_isolation() {
        let mut reg = ModuleRegistry::new();
        let loaded = load_tree(&mut reg, &sample_package(), "app", true);
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains_key("app.models.widget"));
        assert!(loaded.contains_key("app.models.gadget"));
        assert!(!loaded.contains_key("app.models.broken"));
    }

    #[test]
    fn reload_reuses_records() {
        let mut reg = ModuleRegistry::new();
        let first = load_tree(&mut reg, &sample_package(), "app", true);
        let second = load_tree(&mut reg, &sample_package(), "app", true);

        let first_keys: Vec<_> = first.keys().collect();
        let second_keys: Vec<_> = second.keys().collect();
        assert_eq!(first_keys, second_keys);
        assert_eq!(reg.len(), 2, "reload must not grow the registry");
        assert_eq!(second["app.models.widget"].generation, 2);
    }

    #[test]
    fn recursion_dot_joins_names() {
        let pkg = PackageDef::new("routes")
            .package(PackageDef::new("v1").module("widget_route", ok_widget));
        let mut reg = ModuleRegistry::new();
        let loaded = load_tree(&mut reg, &pkg, "app", true);
        assert!(loaded.contains_key("app.routes.v1"));
        assert!(loaded.contains_key("app.routes.v1.widget_route"));
        assert!(loaded["app.routes.v1"].is_package);
    }

    #[test]
    fn non_recursive_skips_subpackages() {
        let pkg = PackageDef::new("routes")
            .module("top_route", ok_widget)
            .package(PackageDef::new("v1").module("widget_route", ok_gadget));
        let mut reg = ModuleRegistry::new();
        let loaded = load_tree(&mut reg, &pkg, "app", false);
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("app.routes.top_route"));
    }

    #[test]
    fn empty_package_warns_and_returns_empty() {
        let mut reg = ModuleRegistry::new();
        let loaded = load_tree(&mut reg, &PackageDef::new("models"), "app", true);
        assert!(loaded.is_empty());
        assert!(reg.is_empty());
    }
}
