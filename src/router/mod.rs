//! Route modules and the registrar that mounts them.

pub mod mount;
pub mod registrar;

use crate::state::AppContext;
use axum::routing::MethodRouter;
use serde::Serialize;

/// Request-time guard attached to a whole route module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    /// Requires an active superuser bearer token.
    Superuser,
}

#[derive(Clone)]
pub struct RouteDef {
    /// Path as declared by the module author; may redundantly repeat the prefix.
    pub path: String,
    pub handler: MethodRouter<AppContext>,
}

/// A module's router: declared prefix (possibly empty), ordered routes, guards.
#[derive(Clone, Default)]
pub struct RouteModule {
    pub prefix: String,
    pub routes: Vec<RouteDef>,
    pub guards: Vec<Guard>,
}

impl RouteModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        RouteModule {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn route(mut self, path: impl Into<String>, handler: MethodRouter<AppContext>) -> Self {
        self.routes.push(RouteDef {
            path: path.into(),
            handler,
        });
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        if !self.guards.contains(&guard) {
            self.guards.push(guard);
        }
        self
    }
}

/// One mounted route module, as recorded in the context's mount table.
#[derive(Clone, Debug, Serialize)]
pub struct MountRecord {
    pub module: String,
    /// Final mount prefix including the global prefix.
    pub prefix: String,
    /// Documentation grouping tag (`Core API - …` / `User API - …`).
    pub tag: String,
    /// Final absolute route paths under this mount.
    pub paths: Vec<String>,
    pub admin: bool,
}
