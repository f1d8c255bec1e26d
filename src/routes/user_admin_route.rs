//! User administration. The `/admin/users` prefix puts every route behind the
//! superuser guard the registrar attaches to admin mounts.

use crate::error::AppError;
use crate::handlers::user;
use crate::registry::ModulePayload;
use crate::router::RouteModule;
use axum::routing::get;

pub fn module() -> Result<ModulePayload, AppError> {
    let routes = RouteModule::with_prefix("/admin/users")
        .route("/", get(user::list).post(user::create))
        .route(
            "/:id",
            get(user::read).put(user::update).delete(user::delete),
        );
    Ok(ModulePayload::Routes(routes))
}
