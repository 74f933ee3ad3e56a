use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::{DataSource, SnapshotLoader};
use crate::config::CacheTtls;
use crate::database::DbPool;
use crate::error::{DataError, DataResult};
use crate::models::*;
use crate::redis::Cache;
use crate::time::now_millis;

pub const CRYPTO_PRICES_KEY: &str = "nof0:crypto_prices";

/// Latest price per symbol, maintained by the importer.
pub const LATEST_PRICES_SQL: &str = "SELECT symbol, price, ts_ms FROM v_crypto_prices_latest";

/// Relational read side for current prices.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn latest_prices(&self) -> DataResult<Vec<PriceRow>>;
}

pub struct MySqlPriceStore {
    pool: DbPool,
}

impl MySqlPriceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceStore for MySqlPriceStore {
    async fn latest_prices(&self) -> DataResult<Vec<PriceRow>> {
        let rows = sqlx::query_as::<_, PriceRow>(LATEST_PRICES_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Serves current prices from cache, then the database, then the snapshot
/// files. Every other resource goes straight to the snapshot files.
pub struct DbRepo {
    store: Arc<dyn PriceStore>,
    cache: Option<Arc<dyn Cache>>,
    fallback: SnapshotLoader,
    ttls: CacheTtls,
}

impl DbRepo {
    pub fn new(
        store: Arc<dyn PriceStore>,
        cache: Option<Arc<dyn Cache>>,
        fallback: SnapshotLoader,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            store,
            cache,
            fallback,
            ttls,
        }
    }

    /// Cached prices, if present and decodable. Errors count as a miss.
    async fn cached_prices(&self) -> Option<CryptoPricesResponse> {
        let cache = self.cache.as_ref()?;
        match cache.get(CRYPTO_PRICES_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(resp) => {
                    debug!(key = CRYPTO_PRICES_KEY, "cache hit");
                    Some(resp)
                }
                Err(e) => {
                    warn!(key = CRYPTO_PRICES_KEY, error = %DataError::CacheCodec(e), "discarding cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(key = CRYPTO_PRICES_KEY, "cache miss");
                None
            }
            Err(e) => {
                warn!(key = CRYPTO_PRICES_KEY, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn store_prices(&self, resp: &CryptoPricesResponse) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        if self.ttls.short == 0 {
            return;
        }
        let raw = match serde_json::to_string(resp) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key = CRYPTO_PRICES_KEY, error = %e, "failed to encode cache entry");
                return;
            }
        };
        if let Err(e) = cache.set_ex(CRYPTO_PRICES_KEY, &raw, self.ttls.short).await {
            warn!(key = CRYPTO_PRICES_KEY, error = %e, "cache write failed");
        }
    }
}

#[async_trait]
impl DataSource for DbRepo {
    async fn load_crypto_prices(&self) -> DataResult<CryptoPricesResponse> {
        if let Some(cached) = self.cached_prices().await {
            return Ok(cached);
        }

        let rows = match self.store.latest_prices().await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "db crypto_prices failed, falling back to snapshot");
                return self.fallback.load_crypto_prices().await;
            }
        };

        let prices: BTreeMap<String, CryptoPrice> = rows
            .into_iter()
            .map(|row| (row.symbol.clone(), CryptoPrice::from(row)))
            .collect();
        let resp = CryptoPricesResponse {
            prices,
            server_time: now_millis(),
        };
        self.store_prices(&resp).await;
        Ok(resp)
    }

    // Nested resources have no relational model yet and always read the snapshot.

    async fn load_account_totals(&self) -> DataResult<AccountTotalsResponse> {
        self.fallback.load_account_totals().await
    }

    async fn load_trades(&self) -> DataResult<TradesResponse> {
        self.fallback.load_trades().await
    }

    async fn load_since_inception(&self) -> DataResult<SinceInceptionResponse> {
        self.fallback.load_since_inception().await
    }

    async fn load_leaderboard(&self) -> DataResult<LeaderboardResponse> {
        self.fallback.load_leaderboard().await
    }

    async fn load_analytics(&self) -> DataResult<AnalyticsResponse> {
        self.fallback.load_analytics().await
    }

    async fn load_model_analytics(&self, model_id: &str) -> DataResult<ModelAnalyticsResponse> {
        if model_id.is_empty() {
            return Err(DataError::InvalidArgument("modelId required".to_string()));
        }
        self.fallback.load_model_analytics(model_id).await
    }

    async fn load_positions(&self, limit: Option<u32>) -> DataResult<PositionsResponse> {
        self.fallback.load_positions(limit).await
    }

    async fn load_conversations(&self) -> DataResult<ConversationsResponse> {
        self.fallback.load_conversations().await
    }
}
