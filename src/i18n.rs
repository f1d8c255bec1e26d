//! Translation cache: bulk fetch per language set, JSON cache file, key lookup.

use crate::error::AppError;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::path::Path;

/// language code -> (key -> translated text).
pub type TranslationMap = BTreeMap<String, BTreeMap<String, String>>;

/// Fetch all translation rows for the given language codes.
pub async fn fetch_bulk(pool: &PgPool, languages: &[String]) -> Result<TranslationMap, AppError> {
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT language_code, key, value FROM language WHERE language_code = ANY($1) ORDER BY language_code, key",
    )
    .bind(languages.to_vec())
    .fetch_all(pool)
    .await?;

    let mut map = TranslationMap::new();
    for (code, key, value) in rows {
        map.entry(code).or_default().insert(key, value);
    }
    Ok(map)
}

/// Write the translation map to the cache file as pretty JSON.
pub fn save_to_cache(path: impl AsRef<Path>, translations: &TranslationMap) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(translations)
        .map_err(|e| AppError::BadRequest(format!("serialize translations: {}", e)))?;
    std::fs::write(path.as_ref(), json)?;
    tracing::info!(file = %path.as_ref().display(), "saved translations to cache file");
    Ok(())
}

/// Load the translation map from the cache file. A missing file is an empty map.
pub fn load_from_cache(path: impl AsRef<Path>) -> Result<TranslationMap, AppError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(file = %path.display(), "translation cache file does not exist yet");
        return Ok(TranslationMap::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let map = serde_json::from_str(&raw)
        .map_err(|e| AppError::BadRequest(format!("parse translation cache: {}", e)))?;
    tracing::info!(file = %path.display(), "loaded translations from cache file");
    Ok(map)
}

/// Look up a key for a language. Falls back to the key itself so a missing
/// translation stays readable.
pub fn translate<'a>(map: &'a TranslationMap, language: &str, key: &'a str) -> &'a str {
    map.get(language)
        .and_then(|by_key| by_key.get(key))
        .map(String::as_str)
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TranslationMap {
        let mut map = TranslationMap::new();
        map.entry("en".into())
            .or_default()
            .insert("welcome_message".into(), "Welcome".into());
        map.entry("cs".into())
            .or_default()
            .insert("welcome_message".into(), "Vítejte".into());
        map
    }

    #[test]
    fn cache_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translation_cache.json");
        let map = sample();
        save_to_cache(&path, &map).unwrap();
        let loaded = load_from_cache(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn missing_cache_file_is_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_from_cache(dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn translate_falls_back_to_key() {
        let map = sample();
        assert_eq!(translate(&map, "cs", "welcome_message"), "Vítejte");
        assert_eq!(translate(&map, "en", "welcome_message"), "Welcome");
        assert_eq!(translate(&map, "de", "welcome_message"), "welcome_message");
        assert_eq!(translate(&map, "en", "unknown_key"), "unknown_key");
    }
}
