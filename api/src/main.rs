use std::sync::Arc;

use anyhow::Result;
use api::{app, AppState};
use shared::{
    database::redact, get_pool, get_redis_client, Cache, Config, DataSource, DbRepo,
    MySqlPriceStore, RedisCache, SnapshotLoader,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    info!("Starting nof0 API server...");
    info!(data_path = %config.data_path, "serving snapshots");

    let source = build_source(&config).await;
    let app = app(AppState::new(source));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("API server listening on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Snapshot files only, unless a database is configured and reachable.
async fn build_source(config: &Config) -> Arc<dyn DataSource> {
    let loader = SnapshotLoader::new(&config.data_path);

    let Some(database_url) = config.database_url.as_deref() else {
        info!("DATABASE_URL not set, using snapshot files");
        return Arc::new(loader);
    };

    let pool = match get_pool(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, dsn = %redact(database_url), "database unavailable, using snapshot files");
            return Arc::new(loader);
        }
    };
    info!(dsn = %redact(database_url), "Connected to database");

    let cache: Option<Arc<dyn Cache>> = match config.redis_url.as_deref() {
        Some(redis_url) => match get_redis_client(redis_url) {
            Ok(client) => Some(Arc::new(RedisCache::new(client))),
            Err(e) => {
                warn!(error = %e, "invalid REDIS_URL, price cache disabled");
                None
            }
        },
        None => None,
    };

    Arc::new(DbRepo::new(
        Arc::new(MySqlPriceStore::new(pool)),
        cache,
        loader,
        config.cache_ttls,
    ))
}
