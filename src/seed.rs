//! Initial data: the first superuser and, outside production, the translation
//! seed file. Runs on every start; existing rows are left alone.

use crate::error::AppError;
use crate::models::{language, user};
use crate::settings::Environment;
use crate::state::AppContext;

pub async fn run(ctx: &AppContext) -> Result<(), AppError> {
    init_superuser(ctx).await?;
    seed_translations(ctx).await?;
    Ok(())
}

async fn init_superuser(ctx: &AppContext) -> Result<(), AppError> {
    let email = &ctx.settings.first_superuser;
    if user::find_by_email(&ctx.pool, email).await?.is_some() {
        tracing::debug!(email = %email, "superuser already present");
        return Ok(());
    }
    let created = user::create(
        &ctx.pool,
        &user::UserCreate {
            email: email.clone(),
            password: ctx.settings.first_superuser_password.clone(),
            full_name: None,
            is_superuser: true,
        },
    )
    .await?;
    tracing::info!(email = %created.email, "created first superuser");
    Ok(())
}

async fn seed_translations(ctx: &AppContext) -> Result<(), AppError> {
    let Some(path) = &ctx.settings.translations_seed_file else {
        return Ok(());
    };
    // Seed files are a development fixture; production data comes from the API.
    if ctx.settings.environment == Environment::Production {
        tracing::info!("production environment; skipping translation seed file");
        return Ok(());
    }
    let raw = std::fs::read_to_string(path)?;
    let entries: Vec<language::LanguageCreate> = serde_json::from_str(&raw)
        .map_err(|e| AppError::Startup(format!("parse translation seed file '{}': {}", path, e)))?;

    let mut inserted = 0usize;
    for entry in &entries {
        if language::upsert_missing(&ctx.pool, entry).await? {
            inserted += 1;
        }
    }
    tracing::info!(file = %path, total = entries.len(), inserted, "seeded translations");
    Ok(())
}
