//! Data sources behind the API.
//!
//! [`SnapshotLoader`] reads the JSON snapshot files directly. [`DbRepo`] serves
//! current prices through cache → database → snapshot and delegates every other
//! resource to the loader. Which one backs the API is decided once at startup.

mod loader;
mod repo;

pub use loader::{
    SnapshotLoader, ACCOUNT_TOTALS_FILE, ANALYTICS_FILE, CONVERSATIONS_FILE, CRYPTO_PRICES_FILE,
    LEADERBOARD_FILE, POSITIONS_FILE, SINCE_INCEPTION_FILE, TRADES_FILE,
};
pub use repo::{DbRepo, MySqlPriceStore, PriceStore, CRYPTO_PRICES_KEY, LATEST_PRICES_SQL};

use async_trait::async_trait;

use crate::error::DataResult;
use crate::models::*;

/// Read capability over the nine published resources.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn load_crypto_prices(&self) -> DataResult<CryptoPricesResponse>;
    async fn load_account_totals(&self) -> DataResult<AccountTotalsResponse>;
    async fn load_trades(&self) -> DataResult<TradesResponse>;
    async fn load_since_inception(&self) -> DataResult<SinceInceptionResponse>;
    async fn load_leaderboard(&self) -> DataResult<LeaderboardResponse>;
    async fn load_analytics(&self) -> DataResult<AnalyticsResponse>;
    /// Never fails for an unknown model: a zero-valued record is returned instead.
    async fn load_model_analytics(&self, model_id: &str) -> DataResult<ModelAnalyticsResponse>;
    /// `limit` is accepted for API compatibility but not applied.
    async fn load_positions(&self, limit: Option<u32>) -> DataResult<PositionsResponse>;
    async fn load_conversations(&self) -> DataResult<ConversationsResponse>;
}
