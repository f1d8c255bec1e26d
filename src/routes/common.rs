//! Common routes served outside the global prefix: health, readiness, version,
//! and the mount-table listing.

use crate::state::AppContext;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(
    State(ctx): State<AppContext>,
) -> Result<Json<ReadyBody>, (axum::http::StatusCode, Json<ReadyBody>)> {
    if sqlx::query("SELECT 1").fetch_optional(&ctx.pool).await.is_err() {
        return Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: "ok",
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// What got mounted where, straight from the context's mount table.
async fn routes(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    let mounts = ctx.mounts_read().clone();
    Json(serde_json::json!({ "mounts": mounts }))
}

/// GET /health, /ready, /version, /routes. Served at the root, not under the
/// global prefix.
pub fn common_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/routes", get(routes))
        .with_state(ctx)
}
