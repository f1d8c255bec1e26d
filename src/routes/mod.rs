//! Core route modules. Each `module()` loader returns the `RouteModule` the
//! registrar mounts; `common` is served outside the global prefix.

pub mod auth_route;
pub mod common;
pub mod language_route;
pub mod user_admin_route;
