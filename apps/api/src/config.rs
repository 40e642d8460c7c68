use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 7000;

/// Which connection profile the gateway runs against, selected by `DB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "development" => Ok(Environment::Development),
            "testing" => Ok(Environment::Testing),
            "production" => Ok(Environment::Production),
            other => bail!("DB must be one of development, testing, production (got '{other}')"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

/// Connection settings for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbProfile {
    pub url: String,
    pub backend: Backend,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Create missing tables at startup. Production schemas are managed externally.
    pub bootstrap_schema: bool,
}

impl DbProfile {
    fn for_environment(env: Environment, database_url: Option<String>) -> Result<Self> {
        let url = match (env, database_url) {
            (Environment::Production, Some(url)) => with_ssl_mode(&url),
            (Environment::Production, None) => {
                bail!("Required environment variable 'DATABASE_URL' is not set")
            }
            (_, Some(url)) => url,
            (Environment::Development, None) => "sqlite://./data/dev.sqlite3?mode=rwc".to_string(),
            (Environment::Testing, None) => "sqlite://./data/devtest.sqlite3?mode=rwc".to_string(),
        };

        let backend = if url.starts_with("sqlite:") {
            Backend::Sqlite
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Backend::Postgres
        } else {
            bail!("Unsupported database URL scheme in '{url}'");
        };

        let (min_connections, max_connections) = match backend {
            Backend::Sqlite => (1, 1),
            Backend::Postgres => (2, 10),
        };

        Ok(DbProfile {
            url,
            backend,
            min_connections,
            max_connections,
            bootstrap_schema: env != Environment::Production,
        })
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database: DbProfile,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = match non_empty(lookup("DB")) {
            Some(value) => Environment::parse(&value)?,
            None => Environment::Development,
        };

        let port = match non_empty(lookup("PORT")) {
            Some(value) => value
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            environment,
            database: DbProfile::for_environment(environment, non_empty(lookup("DATABASE_URL")))?,
            port,
            rust_log: non_empty(lookup("RUST_LOG")).unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Hosted Postgres needs TLS but its certificate is not verified.
fn with_ssl_mode(url: &str) -> String {
    if url.contains("sslmode=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}sslmode=require")
}
