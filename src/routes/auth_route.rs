//! Login/logout/me. Declares its own prefix, so the mount ignores the logical
//! package path (`core.routes.access`) and lands at `<global>/auth`.

use crate::error::AppError;
use crate::handlers::auth;
use crate::registry::ModulePayload;
use crate::router::RouteModule;
use axum::routing::{get, post};

pub fn module() -> Result<ModulePayload, AppError> {
    let routes = RouteModule::with_prefix("/auth")
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));
    Ok(ModulePayload::Routes(routes))
}
