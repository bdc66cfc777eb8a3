//! Dependency injection module using Shaku.

use emporium_config::{AppConfig, DatabaseConfig, RedisConfig};
use emporium_core::{EmporiumError, EmporiumResult};
use emporium_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, PgAddressRepository,
    PgCartItemRepository, PgCategoryRepository, PgOrderItemRepository, PgOrderRepository,
    PgProductRepository, PgUserRepository,
};
use emporium_security::{ApiKeyAuthenticator, ApiKeyAuthenticatorParameters};
use emporium_service::{
    AddressServiceComponent, CartServiceComponent, CategoryServiceComponent,
    OrderServiceComponent, ProductServiceComponent, RedisCacheService,
    RedisCacheServiceParameters, UserServiceComponent,
};
use shaku::module;
use std::sync::Arc;
use tracing::info;

// Single-process deployment: PostgreSQL stores, the Redis cache, the API
// key authenticator and the cache-aside services.
module! {
    pub EmporiumModule {
        components = [
            DatabasePool,
            PgCartItemRepository,
            PgOrderRepository,
            PgOrderItemRepository,
            PgProductRepository,
            PgCategoryRepository,
            PgUserRepository,
            PgAddressRepository,
            RedisCacheService,
            ApiKeyAuthenticator,
            CartServiceComponent,
            OrderServiceComponent,
            ProductServiceComponent,
            CategoryServiceComponent,
            UserServiceComponent,
            AddressServiceComponent,
        ],
        providers = [],
    }
}

/// Connects the database pool and applies migrations when configured.
pub async fn connect_database(config: &DatabaseConfig) -> EmporiumResult<DatabasePool> {
    let pool = DatabasePool::new(config).await?;
    if config.run_migrations {
        pool.run_migrations().await?;
    } else {
        info!("Skipping database migrations");
    }
    Ok(pool)
}

/// Creates the Redis pool, or `None` when the cache is disabled.
pub fn create_redis_pool(config: &RedisConfig) -> EmporiumResult<Option<Arc<deadpool_redis::Pool>>> {
    if !config.enabled {
        info!("Redis cache disabled: every read goes to the database");
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size));
    let pool = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| EmporiumError::cache(format!("Failed to create Redis pool: {e}")))?;

    info!("Redis cache pool created");
    Ok(Some(Arc::new(pool)))
}

/// Builds the application module with every dependency.
pub async fn build_module(config: &AppConfig) -> EmporiumResult<Arc<EmporiumModule>> {
    let db_pool = connect_database(&config.database).await?;
    let cache_pool = create_redis_pool(&config.redis)?;
    let authenticator = ApiKeyAuthenticator::from_config(&config.security);

    let module = EmporiumModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.pg_pool(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: cache_pool,
        })
        .with_component_parameters::<ApiKeyAuthenticator>(ApiKeyAuthenticatorParameters {
            api_key: authenticator.api_key().to_string(),
        })
        .build();

    Ok(Arc::new(module))
}
