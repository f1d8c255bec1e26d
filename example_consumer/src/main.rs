//! Example consumer: adds a `widget` model and a versioned `widget_route` module
//! on top of the core manifest. The route module declares no prefix, so it mounts
//! at `<route_prefix>/v1/widget` with tag `User API - V1 - Widget`.
//!
//! Run from the repo root: `cargo run -p example-consumer`

use axum::{
    extract::{Path, State},
    routing::get,
    Json,
};
use manifold_api::{
    lifecycle, AppContext, AppError, ColumnDef, Manifest, ModulePayload, PackageDef, RouteModule,
    Settings, TableDef,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Serialize, sqlx::FromRow)]
struct Widget {
    id: Uuid,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize)]
struct WidgetCreate {
    name: String,
}

fn widget_model() -> Result<ModulePayload, AppError> {
    Ok(ModulePayload::Tables(vec![TableDef::new("widget")
        .column(ColumnDef::new("id", "UUID").default_expr("gen_random_uuid()"))
        .column(ColumnDef::new("name", "VARCHAR(255)"))
        .primary_key(["id"])
        .unique(["name"])]))
}

fn widget_routes() -> Result<ModulePayload, AppError> {
    Ok(ModulePayload::Routes(
        RouteModule::new()
            .route("/", get(list_widgets).post(create_widget))
            .route("/:id", get(read_widget)),
    ))
}

async fn list_widgets(State(ctx): State<AppContext>) -> Result<Json<Vec<Widget>>, AppError> {
    let rows = sqlx::query_as::<_, Widget>("SELECT * FROM widget ORDER BY name")
        .fetch_all(&ctx.pool)
        .await?;
    Ok(Json(rows))
}

async fn create_widget(
    State(ctx): State<AppContext>,
    Json(body): Json<WidgetCreate>,
) -> Result<Json<Widget>, AppError> {
    let row = sqlx::query_as::<_, Widget>(
        "INSERT INTO widget (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&body.name)
    .fetch_one(&ctx.pool)
    .await?;
    Ok(Json(row))
}

async fn read_widget(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Widget>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("invalid uuid".into()))?;
    let row = sqlx::query_as::<_, Widget>("SELECT * FROM widget WHERE id = $1")
        .bind(id)
        .fetch_optional(&ctx.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(Json(row))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("manifold_api=info,example_consumer=info")
            }),
        )
        .init();

    let manifest = Manifest::core()
        .with_app_models(PackageDef::new("models").module("widget", widget_model))
        .with_app_routes(
            PackageDef::new("routes")
                .package(PackageDef::new("v1").module("widget_route", widget_routes)),
        );

    let settings = Settings::from_env()?;
    let app = lifecycle::start(settings, &manifest).await?;
    let router = app.router.clone();

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("example consumer listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    app.shutdown().await;
    Ok(())
}
