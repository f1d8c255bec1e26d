//! Translation endpoints. No declared prefix: the mount prefix is derived from
//! the module name, so this lands at `<global>/language`.

use crate::error::AppError;
use crate::handlers::language;
use crate::registry::ModulePayload;
use crate::router::RouteModule;
use axum::routing::get;

pub fn module() -> Result<ModulePayload, AppError> {
    let routes = RouteModule::new()
        .route("/", get(language::list).post(language::create))
        .route("/bulk", get(language::bulk))
        .route(
            "/:id",
            get(language::read)
                .put(language::update)
                .delete(language::delete),
        );
    Ok(ModulePayload::Routes(routes))
}
