//! Router registrar: loads route packages in a fixed order (core, versioned app,
//! un-versioned app), resolves each module's mount decision, injects the admin
//! guard, and nests everything under the global prefix. One bad module is logged
//! and skipped; the batch continues.

use super::mount::{decide, normalize_route_path};
use super::{Guard, MountRecord, RouteModule};
use crate::error::RegistryError;
use crate::registry::manifest::{load_module, load_tree, Manifest};
use crate::registry::{ModulePayload, ModuleRecord};
use crate::state::AppContext;
use axum::{middleware, Router};
use std::collections::{BTreeMap, HashSet};

/// Build the API router from the manifest. The context's mount table is replaced
/// wholesale, so re-running with an unchanged manifest mounts the same set of
/// paths and tags (no duplicate accumulation).
pub fn register_routers(ctx: &AppContext, manifest: &Manifest) -> Router {
    let mut router = Router::new();
    let mut mounted: Vec<MountRecord> = Vec::new();
    let mut seen_paths: HashSet<String> = HashSet::new();

    // (1) Framework routes.
    let core_loaded = {
        let mut registry = ctx.modules_mut();
        load_tree(&mut registry, &manifest.core_routes, "core", true)
    };
    router = mount_batch(router, ctx, core_loaded, &mut mounted, &mut seen_paths);

    match &manifest.app_routes {
        Some(app_routes) => {
            // (2) Versioned application routes, in declared version order.
            for version in &ctx.settings.api_versions {
                let Some(sub) = app_routes.packages.iter().find(|p| p.name == *version) else {
                    tracing::warn!(version = %version, "no routes found for version; skipping");
                    continue;
                };
                let loaded = {
                    let mut registry = ctx.modules_mut();
                    load_tree(&mut registry, sub, "app.routes", true)
                };
                router = mount_batch(router, ctx, loaded, &mut mounted, &mut seen_paths);
            }

            // (3) Un-versioned application routes: top-level modules plus any
            // subpackage that is not a configured version.
            let mut loaded = BTreeMap::new();
            {
                let mut registry = ctx.modules_mut();
                for def in &app_routes.modules {
                    if let Some(record) = load_module(&mut registry, def, "app.routes") {
                        loaded.insert(record.name.clone(), record);
                    }
                }
                for sub in &app_routes.packages {
                    if ctx.settings.api_versions.contains(&sub.name) {
                        continue;
                    }
                    loaded.extend(load_tree(&mut registry, sub, "app.routes", true));
                }
            }
            router = mount_batch(router, ctx, loaded, &mut mounted, &mut seen_paths);
        }
        None => tracing::warn!("no application routes package; skipping"),
    }

    *ctx.mounts_mut() = mounted;
    router
}

fn mount_batch(
    mut router: Router,
    ctx: &AppContext,
    loaded: BTreeMap<String, ModuleRecord>,
    mounted: &mut Vec<MountRecord>,
    seen_paths: &mut HashSet<String>,
) -> Router {
    for (name, record) in loaded {
        match record.payload {
            ModulePayload::Package => {}
            ModulePayload::Tables(_) => {
                tracing::warn!(module = %name, "module does not expose a router; skipping");
            }
            ModulePayload::Routes(module) => {
                match mount_one(router, ctx, &name, module, seen_paths) {
                    Ok((r, rec)) => {
                        tracing::info!(
                            module = %name,
                            prefix = %rec.prefix,
                            tag = %rec.tag,
                            "registered route module"
                        );
                        mounted.push(rec);
                        router = r;
                    }
                    Err((r, e)) => {
                        tracing::error!(module = %name, error = %e, "failed to register router");
                        router = r;
                    }
                }
            }
        }
    }
    router
}

#[allow(clippy::result_large_err)]
fn mount_one(
    router: Router,
    ctx: &AppContext,
    name: &str,
    mut module: RouteModule,
    seen_paths: &mut HashSet<String>,
) -> Result<(Router, MountRecord), (Router, RegistryError)> {
    let decision = match decide(name, &module.prefix, &ctx.settings.route_prefix) {
        Ok(d) => d,
        Err(e) => return Err((router, e)),
    };

    // Strip redundant prefixes from declared paths, then clear the module's own
    // prefix so nesting supplies the final one exactly once.
    for route in &mut module.routes {
        route.path = normalize_route_path(&decision.effective_prefix, &route.path);
    }
    module.prefix.clear();

    if module.routes.is_empty() {
        return Err((router, RegistryError::EmptyRoutePath(name.to_string())));
    }

    if decision.admin && !module.guards.contains(&Guard::Superuser) {
        module.guards.push(Guard::Superuser);
        tracing::info!(module = %name, prefix = %decision.effective_prefix, "protecting admin route");
    }

    // axum rejects duplicate paths instead of shadowing, so collisions (within the
    // module or against earlier mounts) skip the whole module.
    let mut full_paths = Vec::with_capacity(module.routes.len());
    for route in &module.routes {
        let full = if route.path == "/" {
            decision.mount_prefix.clone()
        } else {
            format!("{}{}", decision.mount_prefix, route.path)
        };
        if full_paths.contains(&full) || seen_paths.contains(&full) {
            return Err((
                router,
                RegistryError::DuplicateMountPath {
                    module: name.to_string(),
                    path: full,
                },
            ));
        }
        full_paths.push(full);
    }
    seen_paths.extend(full_paths.iter().cloned());

    let mut sub: Router<AppContext> = Router::new();
    for route in &module.routes {
        sub = sub.route(&route.path, route.handler.clone());
    }
    for guard in &module.guards {
        match guard {
            Guard::Superuser => {
                sub = sub.layer(middleware::from_fn_with_state(
                    ctx.clone(),
                    crate::auth::require_superuser,
                ));
            }
        }
    }

    let record = MountRecord {
        module: name.to_string(),
        prefix: decision.mount_prefix.clone(),
        tag: decision.tag,
        paths: full_paths,
        admin: decision.admin,
    };
    let router = router.nest(&decision.mount_prefix, sub.with_state(ctx.clone()));
    Ok((router, record))
}
