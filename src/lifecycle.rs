//! Startup sequence. Phases run in a fixed order; database wait, migration, and
//! seeding failures are fatal, while individual module failures were already
//! absorbed during registration.

use crate::error::AppError;
use crate::i18n;
use crate::migration;
use crate::registry::manifest::Manifest;
use crate::registry::models::register_all_models;
use crate::router::registrar::register_routers;
use crate::routes::common::common_routes;
use crate::seed;
use crate::settings::Settings;
use crate::state::AppContext;
use crate::tasks::CacheRefreshTask;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Booting,
    ModelsLoading,
    RoutesLoading,
    DbWaiting,
    Migrating,
    Seeding,
    BackgroundTasksStarted,
    Serving,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Booting => "booting",
            Phase::ModelsLoading => "models_loading",
            Phase::RoutesLoading => "routes_loading",
            Phase::DbWaiting => "db_waiting",
            Phase::Migrating => "migrating",
            Phase::Seeding => "seeding",
            Phase::BackgroundTasksStarted => "background_tasks_started",
            Phase::Serving => "serving",
        };
        f.write_str(s)
    }
}

fn enter(phase: Phase) {
    tracing::info!(phase = %phase, "entering lifecycle phase");
}

/// A started application: the router to serve plus the running context.
pub struct App {
    pub router: Router,
    pub context: AppContext,
    cache_refresh: CacheRefreshTask,
}

impl App {
    /// Stop background tasks, letting any in-flight refresh cycle finish.
    pub async fn shutdown(self) {
        self.cache_refresh.shutdown().await;
    }
}

/// Run the full startup sequence and return the app ready for serving.
pub async fn start(settings: Settings, manifest: &Manifest) -> Result<App, AppError> {
    enter(Phase::Booting);
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(&settings.database_url)
        .map_err(|e| AppError::Startup(format!("invalid database url: {}", e)))?;
    let ctx = AppContext::new(pool, settings);

    enter(Phase::ModelsLoading);
    let models = register_all_models(&ctx, manifest);
    tracing::info!(
        modules = models.len(),
        tables = ctx.schema_read().len(),
        "model modules registered"
    );

    enter(Phase::RoutesLoading);
    let api = register_routers(&ctx, manifest);
    let router = api.merge(common_routes(ctx.clone()));

    enter(Phase::DbWaiting);
    wait_for_db(&ctx).await?;

    enter(Phase::Migrating);
    let schema = ctx.schema_read().clone();
    migration::apply_migrations(&ctx.pool, &schema).await?;

    enter(Phase::Seeding);
    seed::run(&ctx).await?;

    // Serve the last written cache until the first refresh cycle lands.
    let cached = i18n::load_from_cache(&ctx.settings.translation_cache_file)?;
    if !cached.is_empty() {
        *ctx.translations_mut() = cached;
    }

    enter(Phase::BackgroundTasksStarted);
    let cache_refresh = CacheRefreshTask::spawn(ctx.clone());

    enter(Phase::Serving);
    Ok(App {
        router,
        context: ctx,
        cache_refresh,
    })
}

/// Probe the database until it answers or the attempt budget runs out.
pub async fn wait_for_db(ctx: &AppContext) -> Result<(), AppError> {
    let max_tries = ctx.settings.db_max_tries.max(1);
    for attempt in 1..=max_tries {
        match sqlx::query("SELECT 1").execute(&ctx.pool).await {
            Ok(_) => {
                tracing::info!(attempt, "database is ready");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(attempt, max_tries, error = %e, "database not ready yet");
                if attempt < max_tries {
                    tokio::time::sleep(ctx.settings.db_wait).await;
                }
            }
        }
    }
    Err(AppError::Startup(format!(
        "database unavailable after {} attempts",
        max_tries
    )))
}

/// Re-run registration against an updated manifest. The module registry keeps its
/// records (generations bump), the schema registry stays a superset, and the mount
/// table is replaced. Returns the freshly built router.
pub fn reload(ctx: &AppContext, manifest: &Manifest) -> Router {
    register_all_models(ctx, manifest);
    register_routers(ctx, manifest).merge(common_routes(ctx.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_names_are_stable() {
        let order = [
            Phase::Booting,
            Phase::ModelsLoading,
            Phase::RoutesLoading,
            Phase::DbWaiting,
            Phase::Migrating,
            Phase::Seeding,
            Phase::BackgroundTasksStarted,
            Phase::Serving,
        ];
        let names: Vec<String> = order.iter().map(|p| p.to_string()).collect();
        assert_eq!(names[0], "booting");
        assert_eq!(names[7], "serving");
        let unique: std::collections::BTreeSet<_> = names.iter().collect();
        assert_eq!(unique.len(), order.len());
    }

    #[tokio::test]
    async fn reload_replaces_mounts_without_growing_registry() {
        let ctx = crate::state::test_context();
        let manifest = Manifest::core();
        let _ = reload(&ctx, &manifest);
        let modules_after_first = ctx.modules.read().unwrap().len();
        let mounts_first = ctx.mounts_read().len();
        let _ = reload(&ctx, &manifest);
        assert_eq!(ctx.modules.read().unwrap().len(), modules_after_first);
        assert_eq!(ctx.mounts_read().len(), mounts_first);
    }
}
