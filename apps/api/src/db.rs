use anyhow::{Context, Result};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::info;

use crate::config::{Backend, DbProfile};

const SQLITE_SCHEMA: &str = include_str!("../schema/sqlite.sql");
const POSTGRES_SCHEMA: &str = include_str!("../schema/postgres.sql");
const CATALOG_SEED: &str = include_str!("../schema/seed.sql");

/// Creates a connection pool for the configured backend.
pub async fn create_pool(profile: &DbProfile) -> Result<AnyPool> {
    sqlx::any::install_default_drivers();
    info!("Connecting to {:?} database...", profile.backend);

    if let Some(dir) = sqlite_parent_dir(profile) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database directory {dir}"))?;
    }

    let pool = AnyPoolOptions::new()
        .min_connections(profile.min_connections)
        .max_connections(profile.max_connections)
        .connect(&profile.url)
        .await
        .with_context(|| format!("Failed to connect to {:?} database", profile.backend))?;

    info!("Database connection pool established");
    Ok(pool)
}

/// Directory holding a file-backed SQLite database, if there is one to create.
fn sqlite_parent_dir(profile: &DbProfile) -> Option<&str> {
    if profile.backend != Backend::Sqlite {
        return None;
    }
    let path = profile.url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    let (dir, _file) = path.rsplit_once('/')?;
    (!dir.is_empty() && dir != ".").then_some(dir)
}

/// Creates any missing tables. Every statement is `CREATE ... IF NOT EXISTS`.
pub async fn ensure_schema(pool: &AnyPool, backend: Backend) -> Result<()> {
    let schema = match backend {
        Backend::Sqlite => SQLITE_SCHEMA,
        Backend::Postgres => POSTGRES_SCHEMA,
    };

    for statement in schema.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Schema statement failed: {statement}"))?;
    }

    info!("Schema bootstrap complete");
    Ok(())
}

/// Fills the location and skill catalogs that autocomplete searches.
/// Existing names are left alone, so this is safe on every startup.
pub async fn seed_catalog(pool: &AnyPool) -> Result<()> {
    for statement in CATALOG_SEED.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Catalog seed failed")?;
    }
    info!("Location and skill catalogs seeded");
    Ok(())
}

/// Case-insensitive `LIKE` pattern matching names that start with `value`.
/// Pair with `LOWER(column) LIKE $n ESCAPE '\'`.
pub fn prefix_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 1);
    for c in value.trim().to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_profile(url: &str) -> DbProfile {
        DbProfile {
            url: url.to_string(),
            backend: Backend::Sqlite,
            min_connections: 1,
            max_connections: 1,
            bootstrap_schema: true,
        }
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir(&sqlite_profile("sqlite://./data/dev.sqlite3?mode=rwc")),
            Some("./data")
        );
        assert_eq!(sqlite_parent_dir(&sqlite_profile("sqlite://dev.sqlite3")), None);
        assert_eq!(sqlite_parent_dir(&sqlite_profile("sqlite::memory:")), None);
    }

    #[test]
    fn test_prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("  Ru "), "ru%");
        assert_eq!(prefix_pattern("100%_"), "100\\%\\_%");
    }
}
