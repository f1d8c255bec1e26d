//! Environment-backed settings. Binaries call `dotenvy::dotenv()` before `Settings::from_env`.

use crate::error::AppError;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(AppError::Settings(format!(
                "ENVIRONMENT must be local, staging or production (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub project_name: String,
    /// Global prefix every mounted router lives under (default `/api`).
    pub route_prefix: String,
    /// API versions in mount order (default `v1,v2`).
    pub api_versions: Vec<String>,
    pub database_url: String,
    pub environment: Environment,
    pub first_superuser: String,
    pub first_superuser_password: String,
    /// Language codes fetched by the translation cache refresh.
    pub languages: Vec<String>,
    pub translation_cache_file: String,
    /// Optional JSON seed file with translation rows.
    pub translations_seed_file: Option<String>,
    pub cache_refresh_interval: Duration,
    /// Database readiness budget: attempts x wait (~5 minutes by default).
    pub db_max_tries: u32,
    pub db_wait: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated env value into trimmed, non-empty entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Settings("DATABASE_URL is required".into()))?;
        let environment = Environment::parse(&env_or("ENVIRONMENT", "local"))?;
        let route_prefix = {
            let raw = env_or("ROUTE_PREFIX", "/api");
            let trimmed = raw.trim().trim_end_matches('/').to_string();
            if trimmed.is_empty() || trimmed.starts_with('/') {
                trimmed
            } else {
                format!("/{}", trimmed)
            }
        };
        let refresh_secs: u64 = env_or("CACHE_REFRESH_SECS", "3600")
            .parse()
            .map_err(|_| AppError::Settings("CACHE_REFRESH_SECS must be an integer".into()))?;

        Ok(Settings {
            project_name: env_or("PROJECT_NAME", "manifold-api"),
            route_prefix,
            api_versions: parse_list(&env_or("API_VERSIONS", "v1,v2")),
            database_url,
            environment,
            first_superuser: env_or("FIRST_SUPERUSER", "admin@example.com"),
            first_superuser_password: env_or("FIRST_SUPERUSER_PASSWORD", "changethis"),
            languages: parse_list(&env_or("LANGUAGES", "en,cs")),
            translation_cache_file: env_or("TRANSLATION_CACHE_FILE", "translation_cache.json"),
            translations_seed_file: std::env::var("TRANSLATIONS_SEED_FILE").ok(),
            cache_refresh_interval: Duration::from_secs(refresh_secs),
            db_max_tries: 300,
            db_wait: Duration::from_secs(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_parsing_trims_and_drops_empty() {
        assert_eq!(parse_list("v1,v2"), vec!["v1", "v2"]);
        assert_eq!(parse_list(" en , cs ,"), vec!["en", "cs"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn environment_parsing() {
        assert_eq!(Environment::parse("local").unwrap(), Environment::Local);
        assert_eq!(Environment::parse("production").unwrap(), Environment::Production);
        assert!(Environment::parse("prod").is_err());
    }
}
