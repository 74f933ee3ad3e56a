use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::DataSource;
use crate::error::{DataError, DataResult};
use crate::models::*;
use crate::time::now_millis;

pub const CRYPTO_PRICES_FILE: &str = "crypto-prices.json";
pub const ACCOUNT_TOTALS_FILE: &str = "account-totals.json";
pub const TRADES_FILE: &str = "trades.json";
pub const SINCE_INCEPTION_FILE: &str = "since-inception-values.json";
pub const LEADERBOARD_FILE: &str = "leaderboard.json";
pub const ANALYTICS_FILE: &str = "analytics.json";
pub const POSITIONS_FILE: &str = "positions.json";
pub const CONVERSATIONS_FILE: &str = "conversations.json";

#[derive(Deserialize)]
struct ModelAnalyticsDocument {
    analytics: ModelAnalytics,
}

/// Reads one fixed-named JSON document per resource from a directory.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    data_path: PathBuf,
}

impl SnapshotLoader {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Per-model analytics file name, or `None` if the id cannot name a file
    /// inside the snapshot directory.
    pub fn model_analytics_file(model_id: &str) -> Option<String> {
        let usable = !model_id.is_empty()
            && !model_id.contains(|c: char| c == '/' || c == '\\')
            && !model_id.starts_with('.');
        usable.then(|| format!("analytics-{model_id}.json"))
    }

    /// Read and decode `filename` from the snapshot directory.
    pub async fn load_json<T: DeserializeOwned>(&self, filename: &str) -> DataResult<T> {
        let path = self.data_path.join(filename);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DataError::NotFound { path });
            }
            Err(source) => return Err(DataError::Io { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| DataError::Parse { path, source })
    }
}

#[async_trait]
impl DataSource for SnapshotLoader {
    async fn load_crypto_prices(&self) -> DataResult<CryptoPricesResponse> {
        // Published either as {"prices": {...}} or as a bare symbol map.
        let doc: Value = self.load_json(CRYPTO_PRICES_FILE).await?;
        let body = match doc {
            Value::Object(mut map) if map.contains_key("prices") => {
                map.remove("prices").unwrap_or_default()
            }
            other => other,
        };
        let mut prices: BTreeMap<String, CryptoPrice> =
            serde_json::from_value(body).map_err(|source| DataError::Parse {
                path: self.data_path.join(CRYPTO_PRICES_FILE),
                source,
            })?;
        for (symbol, price) in prices.iter_mut() {
            if price.symbol.is_empty() {
                price.symbol = symbol.clone();
            }
        }
        Ok(CryptoPricesResponse {
            prices,
            server_time: now_millis(),
        })
    }

    async fn load_account_totals(&self) -> DataResult<AccountTotalsResponse> {
        let mut resp: AccountTotalsResponse = self.load_json(ACCOUNT_TOTALS_FILE).await?;
        resp.server_time = now_millis();
        Ok(resp)
    }

    async fn load_trades(&self) -> DataResult<TradesResponse> {
        let mut resp: TradesResponse = self.load_json(TRADES_FILE).await?;
        resp.server_time = now_millis();
        Ok(resp)
    }

    async fn load_since_inception(&self) -> DataResult<SinceInceptionResponse> {
        let mut resp: SinceInceptionResponse = self.load_json(SINCE_INCEPTION_FILE).await?;
        resp.server_time = now_millis();
        Ok(resp)
    }

    async fn load_leaderboard(&self) -> DataResult<LeaderboardResponse> {
        let mut resp: LeaderboardResponse = self.load_json(LEADERBOARD_FILE).await?;
        resp.server_time = now_millis();
        Ok(resp)
    }

    async fn load_analytics(&self) -> DataResult<AnalyticsResponse> {
        let mut resp: AnalyticsResponse = self.load_json(ANALYTICS_FILE).await?;
        resp.server_time = now_millis();
        Ok(resp)
    }

    async fn load_model_analytics(&self, model_id: &str) -> DataResult<ModelAnalyticsResponse> {
        if let Some(filename) = Self::model_analytics_file(model_id) {
            match self.load_json::<ModelAnalyticsDocument>(&filename).await {
                Ok(doc) => {
                    return Ok(ModelAnalyticsResponse {
                        analytics: doc.analytics,
                        server_time: now_millis(),
                    })
                }
                Err(err) => debug!(model_id, error = %err, "per-model analytics unavailable, scanning aggregate"),
            }
        }

        let all = self.load_analytics().await?;
        let analytics = all
            .analytics
            .into_iter()
            .find(|a| a.model_id == model_id)
            .unwrap_or_else(|| ModelAnalytics::empty(model_id));

        Ok(ModelAnalyticsResponse {
            analytics,
            server_time: now_millis(),
        })
    }

    async fn load_positions(&self, limit: Option<u32>) -> DataResult<PositionsResponse> {
        if let Some(limit) = limit {
            debug!(limit, "positions limit is not applied to snapshot data");
        }
        let mut resp: PositionsResponse = self.load_json(POSITIONS_FILE).await?;
        resp.server_time = now_millis();
        Ok(resp)
    }

    async fn load_conversations(&self) -> DataResult<ConversationsResponse> {
        let mut resp: ConversationsResponse = self.load_json(CONVERSATIONS_FILE).await?;
        resp.server_time = now_millis();
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_bare_price_map_is_normalized() {
        let dir = fixture(&[(
            CRYPTO_PRICES_FILE,
            r#"{"BTC": {"price": 65000, "timestamp": 1700000000}}"#,
        )]);
        let started = now_millis();
        let resp = SnapshotLoader::new(dir.path()).load_crypto_prices().await.unwrap();

        let btc = &resp.prices["BTC"];
        assert_eq!(btc.symbol, "BTC");
        assert_eq!(btc.price, 65000.0);
        assert_eq!(btc.timestamp, 1_700_000_000_000);
        assert!(resp.server_time >= started);
    }

    #[tokio::test]
    async fn test_wrapped_price_map() {
        let dir = fixture(&[(
            CRYPTO_PRICES_FILE,
            r#"{"prices": {"ETH": {"symbol": "ETH", "price": 3200.5, "timestamp": 1700000000000}}, "serverTime": 1}"#,
        )]);
        let resp = SnapshotLoader::new(dir.path()).load_crypto_prices().await.unwrap();

        assert_eq!(resp.prices.len(), 1);
        assert_eq!(resp.prices["ETH"].timestamp, 1_700_000_000_000);
        assert_ne!(resp.server_time, 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = fixture(&[]);
        let err = SnapshotLoader::new(dir.path()).load_trades().await.unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = fixture(&[(TRADES_FILE, "{not json")]);
        let err = SnapshotLoader::new(dir.path()).load_trades().await.unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_every_resource_sets_server_time() {
        let dir = fixture(&[
            (CRYPTO_PRICES_FILE, r#"{"prices": {}}"#),
            (ACCOUNT_TOTALS_FILE, r#"{"accountTotals": [], "lastHourlyMarkerRead": 3}"#),
            (TRADES_FILE, r#"{"trades": []}"#),
            (SINCE_INCEPTION_FILE, r#"{"sinceInceptionValues": []}"#),
            (LEADERBOARD_FILE, r#"{"leaderboard": []}"#),
            (ANALYTICS_FILE, r#"{"analytics": []}"#),
            (POSITIONS_FILE, r#"{"accountTotals": []}"#),
            (CONVERSATIONS_FILE, r#"{"conversations": []}"#),
        ]);
        let loader = SnapshotLoader::new(dir.path());
        let started = now_millis();

        let times = [
            loader.load_crypto_prices().await.unwrap().server_time,
            loader.load_account_totals().await.unwrap().server_time,
            loader.load_trades().await.unwrap().server_time,
            loader.load_since_inception().await.unwrap().server_time,
            loader.load_leaderboard().await.unwrap().server_time,
            loader.load_analytics().await.unwrap().server_time,
            loader.load_model_analytics("gpt-5").await.unwrap().server_time,
            loader.load_positions(Some(10)).await.unwrap().server_time,
            loader.load_conversations().await.unwrap().server_time,
        ];
        for ts in times {
            assert!(ts >= started, "server time {ts} older than {started}");
        }
        assert_eq!(loader.load_account_totals().await.unwrap().last_hourly_marker_read, 3);
    }

    #[tokio::test]
    async fn test_model_analytics_prefers_per_model_file() {
        let dir = fixture(&[
            (
                "analytics-gpt-5.json",
                r#"{"analytics": {"model_id": "gpt-5", "updated_at": 2.0}}"#,
            ),
            (ANALYTICS_FILE, r#"{"analytics": [{"model_id": "gpt-5", "updated_at": 1.0}]}"#),
        ]);
        let resp = SnapshotLoader::new(dir.path())
            .load_model_analytics("gpt-5")
            .await
            .unwrap();
        assert_eq!(resp.analytics.updated_at, 2.0);
    }

    #[tokio::test]
    async fn test_model_analytics_scans_aggregate() {
        let dir = fixture(&[(
            ANALYTICS_FILE,
            r#"{"analytics": [
                {"model_id": "grok-4", "updated_at": 1.0},
                {"model_id": "qwen3-max", "updated_at": 5.0, "win_rate": 0.4}
            ]}"#,
        )]);
        let resp = SnapshotLoader::new(dir.path())
            .load_model_analytics("qwen3-max")
            .await
            .unwrap();
        assert_eq!(resp.analytics.model_id, "qwen3-max");
        assert_eq!(resp.analytics.updated_at, 5.0);
        assert_eq!(resp.analytics.tables["win_rate"], 0.4);
    }

    #[tokio::test]
    async fn test_unknown_model_gets_zero_valued_analytics() {
        let dir = fixture(&[(ANALYTICS_FILE, r#"{"analytics": [{"model_id": "grok-4"}]}"#)]);
        let resp = SnapshotLoader::new(dir.path())
            .load_model_analytics("nobody")
            .await
            .unwrap();
        assert_eq!(resp.analytics, ModelAnalytics::empty("nobody"));
        assert!(resp.server_time > 0);
    }

    #[tokio::test]
    async fn test_broken_per_model_file_falls_back() {
        let dir = fixture(&[
            ("analytics-grok-4.json", "oops"),
            (ANALYTICS_FILE, r#"{"analytics": [{"model_id": "grok-4", "updated_at": 7.0}]}"#),
        ]);
        let resp = SnapshotLoader::new(dir.path())
            .load_model_analytics("grok-4")
            .await
            .unwrap();
        assert_eq!(resp.analytics.updated_at, 7.0);
    }

    #[tokio::test]
    async fn test_model_analytics_without_aggregate_propagates() {
        let dir = fixture(&[]);
        let err = SnapshotLoader::new(dir.path())
            .load_model_analytics("grok-4")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_model_analytics_file_rejects_paths() {
        assert_eq!(
            SnapshotLoader::model_analytics_file("gpt-5").as_deref(),
            Some("analytics-gpt-5.json")
        );
        assert_eq!(SnapshotLoader::model_analytics_file("../etc/passwd"), None);
        assert_eq!(SnapshotLoader::model_analytics_file("a/b"), None);
        assert_eq!(SnapshotLoader::model_analytics_file(""), None);
    }
}
