//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{
    Cache, CommentRepository, FollowRepository, GroupRepository, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use yatube_infra::{Argon2PasswordService, InMemoryCache, InMemoryStore, JwtTokenService, PageCache};

use crate::config::{AppConfig, SessionConfig};
use crate::seed;

#[cfg(feature = "postgres")]
use yatube_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresFollowRepository,
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub page_cache: PageCache,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub session: SessionConfig,
    pub posts_per_page: usize,
}

/// The five repositories, however they are backed.
struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            follows: store,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            follows: Arc::new(PostgresFollowRepository::new(db.clone())),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let repos = Self::repositories(config).await;
        let cache = Self::cache().await?;

        if let Some(path) = config.groups_fixture.as_deref() {
            let seeds = seed::load_groups(path)?;
            let created = seed::seed_groups(repos.groups.as_ref(), seeds)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            tracing::info!(fixture = %path.display(), created, "Group fixture applied");
        }

        tracing::info!(
            posts_per_page = config.posts_per_page,
            index_cache_ttl_secs = config.index_cache_ttl.as_secs(),
            "Application state initialized"
        );

        Ok(Self::assemble(
            repos,
            cache,
            Arc::new(JwtTokenService::from_env()),
            config,
        ))
    }

    /// State backed entirely by `store` and an in-process cache.
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        cache: Arc<dyn Cache>,
        tokens: Arc<dyn TokenService>,
        config: &AppConfig,
    ) -> Self {
        Self::assemble(Repositories::in_memory(store), cache, tokens, config)
    }

    fn assemble(
        repos: Repositories,
        cache: Arc<dyn Cache>,
        tokens: Arc<dyn TokenService>,
        config: &AppConfig,
    ) -> Self {
        Self {
            users: repos.users,
            groups: repos.groups,
            posts: repos.posts,
            comments: repos.comments,
            follows: repos.follows,
            page_cache: PageCache::new(cache, config.index_cache_ttl),
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
            session: config.session.clone(),
            posts_per_page: config.posts_per_page,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory(Arc::new(InMemoryStore::new()));
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => Repositories::postgres(&connections),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                Repositories::in_memory(Arc::new(InMemoryStore::new()))
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> Repositories {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Using in-memory repositories");
        Repositories::in_memory(Arc::new(InMemoryStore::new()))
    }

    #[cfg(feature = "redis")]
    async fn cache() -> std::io::Result<Arc<dyn Cache>> {
        use yatube_infra::{RedisCache, RedisConfig};

        if std::env::var("REDIS_URL").is_err() {
            return Ok(Arc::new(InMemoryCache::new()));
        }

        let config = RedisConfig::from_env();
        let fallback = config.fallback_to_memory;
        match RedisCache::new(config).await {
            Ok(cache) => Ok(Arc::new(cache)),
            Err(e) if fallback => {
                tracing::warn!(error = %e, "Redis unavailable. Using in-memory page cache.");
                Ok(Arc::new(InMemoryCache::new()))
            }
            Err(e) => Err(std::io::Error::other(e.to_string())),
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn cache() -> std::io::Result<Arc<dyn Cache>> {
        Ok(Arc::new(InMemoryCache::new()))
    }
}
