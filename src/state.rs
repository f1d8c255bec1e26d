//! Shared application context: the explicit owner of every registry the loading
//! subsystem mutates. All writers run on the startup path; request handlers only read.

use crate::i18n::TranslationMap;
use crate::registry::{schema::SchemaRegistry, ModuleRegistry};
use crate::router::MountRecord;
use crate::settings::Settings;
use sqlx::PgPool;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone)]
pub struct AppContext {
    pub pool: PgPool,
    pub settings: Arc<Settings>,
    pub modules: Arc<RwLock<ModuleRegistry>>,
    pub schema: Arc<RwLock<SchemaRegistry>>,
    /// Mount table from the last router registration pass, replaced wholesale each run.
    pub mounts: Arc<RwLock<Vec<MountRecord>>>,
    /// In-memory translation cache, refreshed by the background task.
    pub translations: Arc<RwLock<TranslationMap>>,
}

impl AppContext {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        AppContext {
            pool,
            settings: Arc::new(settings),
            modules: Arc::new(RwLock::new(ModuleRegistry::new())),
            schema: Arc::new(RwLock::new(SchemaRegistry::new())),
            mounts: Arc::new(RwLock::new(Vec::new())),
            translations: Arc::new(RwLock::new(TranslationMap::new())),
        }
    }

    pub fn modules_mut(&self) -> RwLockWriteGuard<'_, ModuleRegistry> {
        self.modules.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schema_read(&self) -> RwLockReadGuard<'_, SchemaRegistry> {
        self.schema.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schema_mut(&self) -> RwLockWriteGuard<'_, SchemaRegistry> {
        self.schema.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mounts_read(&self) -> RwLockReadGuard<'_, Vec<MountRecord>> {
        self.mounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mounts_mut(&self) -> RwLockWriteGuard<'_, Vec<MountRecord>> {
        self.mounts.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn translations_read(&self) -> RwLockReadGuard<'_, TranslationMap> {
        self.translations.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn translations_mut(&self) -> RwLockWriteGuard<'_, TranslationMap> {
        self.translations.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> AppContext {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/manifold_test")
        .expect("lazy pool");
    let settings = Settings {
        project_name: "manifold-api".into(),
        route_prefix: "/api".into(),
        api_versions: vec!["v1".into(), "v2".into()],
        database_url: "postgres://localhost/manifold_test".into(),
        environment: crate::settings::Environment::Local,
        first_superuser: "admin@example.com".into(),
        first_superuser_password: "changethis".into(),
        languages: vec!["en".into(), "cs".into()],
        translation_cache_file: "translation_cache.json".into(),
        translations_seed_file: None,
        cache_refresh_interval: std::time::Duration::from_secs(3600),
        db_max_tries: 1,
        db_wait: std::time::Duration::from_millis(10),
    };
    AppContext::new(pool, settings)
}
