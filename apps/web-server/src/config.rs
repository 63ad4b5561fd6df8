//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use yatube_core::DEFAULT_PAGE_SIZE;
use yatube_infra::database::DatabaseConfig;

/// Default lifetime of a cached index page.
const DEFAULT_INDEX_CACHE_TTL_SECS: u64 = 20;

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Send the cookie over HTTPS only.
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "yatube_session".to_string(),
            secure: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub posts_per_page: usize,
    pub index_cache_ttl: Duration,
    pub session: SessionConfig,
    /// JSON file of groups created at startup when missing.
    pub groups_fixture: Option<PathBuf>,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 20),
            min_connections: parsed("DB_MIN_CONNECTIONS", 2),
        });

        let session_defaults = SessionConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            posts_per_page: parsed("POSTS_PER_PAGE", DEFAULT_PAGE_SIZE).max(1),
            index_cache_ttl: Duration::from_secs(parsed(
                "INDEX_CACHE_TTL_SECS",
                DEFAULT_INDEX_CACHE_TTL_SECS,
            )),
            session: SessionConfig {
                cookie_name: env::var("SESSION_COOKIE_NAME")
                    .unwrap_or(session_defaults.cookie_name),
                secure: env::var("SESSION_COOKIE_SECURE")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(session_defaults.secure),
            },
            groups_fixture: env::var("GROUPS_FIXTURE").ok().map(PathBuf::from),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            posts_per_page: DEFAULT_PAGE_SIZE,
            index_cache_ttl: Duration::from_secs(DEFAULT_INDEX_CACHE_TTL_SECS),
            session: SessionConfig::default(),
            groups_fixture: None,
        }
    }
}
